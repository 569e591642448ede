pub mod toml_config;

#[cfg(feature = "cli")]
mod cli;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

pub use toml_config::SiteConfig;
