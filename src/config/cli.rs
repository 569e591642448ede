use crate::config::toml_config::SiteConfig;
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "packages.toml";

#[derive(Debug, Parser)]
#[command(name = "packages")]
#[command(about = "Registration gate and purchase flow for the packages page")]
pub struct CliConfig {
    /// Path to the TOML configuration (falls back to ./packages.toml, then built-in defaults)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show whether registration is open and the state of the purchase buttons
    Status,

    /// Click the purchase button of a package
    Buy {
        package: String,

        /// Price shown on the button (defaults to the button's own price)
        #[arg(long)]
        price: Option<Decimal>,

        /// Answer yes to the confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Load the return page the gateway redirected to
    Return { url: String },

    /// Print a chat link
    Chat {
        #[arg(long)]
        number: Option<String>,

        #[arg(long)]
        message: Option<String>,
    },

    /// Submit a contact form to the configured relay
    Contact {
        /// Form field as key=value, repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

impl CliConfig {
    pub fn load_site_config(&self) -> Result<SiteConfig> {
        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            return SiteConfig::from_file(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            tracing::info!("📁 Loading configuration from: {}", DEFAULT_CONFIG_FILE);
            SiteConfig::from_file(default_path)
        } else {
            tracing::info!("📁 No {} found, using built-in configuration", DEFAULT_CONFIG_FILE);
            SiteConfig::builtin()
        }
    }
}
