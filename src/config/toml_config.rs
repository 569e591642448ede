use crate::adapters::chat::ChatConfig;
use crate::adapters::relay::RelayConfig;
use crate::core::gate::{GateConfig, RegistrationWindow};
use crate::core::gateway::{GatewayConfig, RedirectUrls};
use crate::domain::model::{Catalog, PackageOffering};
use crate::utils::error::{PackagesError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// 內建設定，與專案根目錄的 packages.toml 相同
pub const BUILTIN_CONFIG: &str = include_str!("../../packages.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub registration: RegistrationConfig,
    pub site: SiteSection,
    #[serde(default)]
    pub packages: Vec<PackageOffering>,
    #[serde(default)]
    pub gateway: GatewayConfig,
    pub contact: Option<RelayConfig>,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    pub closing_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSection {
    pub origin: String,
    #[serde(default = "default_return_path")]
    pub return_path: String,
    #[serde(default = "default_notify_path")]
    pub notify_path: String,
}

fn default_return_path() -> String {
    "/models.html".to_string()
}

fn default_notify_path() -> String {
    "/ozow-notify.php".to_string()
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONFIG)
    }

    /// 替換環境變數 (例如 ${OZOW_PRIVATE_KEY})，找不到的保留原樣
    ///
    /// Placeholders are expected inside double-quoted TOML strings, so the
    /// substituted value is escaped for a basic string.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name)
                .map(|value| escape_basic_string(&value))
                .unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn closing_date(&self) -> Result<NaiveDate> {
        validation::validate_required_field("registration.closing_date", &self.registration.closing_date)
            .copied()
    }

    pub fn origin(&self) -> Result<Url> {
        Ok(Url::parse(&self.site.origin)?)
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.packages.clone())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.closing_date()?;

        validation::validate_url("site.origin", &self.site.origin)?;
        validation::validate_site_path("site.return_path", &self.site.return_path)?;
        validation::validate_site_path("site.notify_path", &self.site.notify_path)?;

        if self.packages.is_empty() {
            return Err(PackagesError::ConfigError {
                message: "At least one package must be configured".to_string(),
            });
        }
        validation::validate_unique("packages.id", self.packages.iter().map(|p| p.id))?;
        for package in &self.packages {
            let field = format!("packages.{}", package.id);
            validation::validate_non_empty_string(&format!("{}.name", field), &package.name)?;
            validation::validate_positive_amount(&format!("{}.price", field), package.price)?;
        }

        validation::validate_non_empty_string("gateway.currency", &self.gateway.currency)?;
        validation::validate_non_empty_string(
            "gateway.reference_prefix",
            &self.gateway.reference_prefix,
        )?;

        if let Some(contact) = &self.contact {
            validation::validate_url("contact.endpoint", &contact.endpoint)?;
        }

        if self.chat.default_number.is_empty()
            || !self.chat.default_number.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PackagesError::InvalidConfigValueError {
                field: "chat.default_number".to_string(),
                value: self.chat.default_number.clone(),
                reason: "Number must be digits only, in international format".to_string(),
            });
        }

        Ok(())
    }

    pub fn gate_config(&self) -> Result<GateConfig> {
        let redirects =
            RedirectUrls::build(&self.origin()?, &self.site.return_path, &self.site.notify_path)?;

        Ok(GateConfig {
            window: RegistrationWindow::closing_on(self.closing_date()?),
            catalog: self.catalog(),
            gateway: self.gateway.clone(),
            redirects,
        })
    }
}

/// 跳脫成 TOML basic string 內容
fn escape_basic_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
