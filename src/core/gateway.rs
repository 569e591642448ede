use crate::domain::model::{format_amount, PackageOffering, PaymentRequestRecord, PaymentStatus};
use crate::utils::error::Result;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::OnceLock;
use url::Url;

/// A gateway secret as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credential {
    #[default]
    Placeholder,
    Value(String),
}

impl Credential {
    /// Empty strings, `YOUR_..._HERE`, `TST-TST-TST`, `<...>` and unresolved `${VAR}`
    /// all count as placeholders.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || placeholder_pattern().is_match(trimmed) {
            Credential::Placeholder
        } else {
            Credential::Value(trimmed.to_string())
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Credential::Placeholder)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Credential::Placeholder => "",
            Credential::Value(value) => value.as_str(),
        }
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Credential::parse(&raw))
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:your[_-].*[_-]here|tst(?:-tst)+|<[^>]*>|\$\{[^}]*\}|x+|changeme)$")
            .expect("placeholder pattern is valid")
    })
}

fn default_country_code() -> String {
    "ZA".to_string()
}

fn default_currency() -> String {
    "ZAR".to_string()
}

fn default_bank_reference() -> String {
    "ISP-MODEL".to_string()
}

fn default_reference_prefix() -> String {
    "ISP".to_string()
}

fn default_is_test() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub site_code: Credential,
    #[serde(default)]
    pub private_key: Credential,
    #[serde(default)]
    pub api_key: Credential,
    #[serde(default = "default_is_test")]
    pub is_test: bool,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_bank_reference")]
    pub bank_reference: String,
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            site_code: Credential::Placeholder,
            private_key: Credential::Placeholder,
            api_key: Credential::Placeholder,
            is_test: default_is_test(),
            country_code: default_country_code(),
            currency: default_currency(),
            bank_reference: default_bank_reference(),
            reference_prefix: default_reference_prefix(),
        }
    }
}

/// A deployment can only take payments once the site code and private key are real.
pub fn is_configured(config: &GatewayConfig) -> bool {
    !config.site_code.is_placeholder() && !config.private_key.is_placeholder()
}

/// Where the gateway sends the visitor back to, and where it posts notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success: Url,
    pub cancel: Url,
    pub error: Url,
    pub notify: Url,
}

impl RedirectUrls {
    pub fn build(origin: &Url, return_path: &str, notify_path: &str) -> Result<Self> {
        let return_page = origin.join(return_path)?;
        let with_status = |status: PaymentStatus| {
            let mut url = return_page.clone();
            url.query_pairs_mut()
                .append_pair(PaymentStatus::QUERY_KEY, status.as_query_value());
            url
        };

        Ok(Self {
            success: with_status(PaymentStatus::Success),
            cancel: with_status(PaymentStatus::Cancelled),
            error: with_status(PaymentStatus::Error),
            notify: origin.join(notify_path)?,
        })
    }
}

pub fn build_payment_request(
    config: &GatewayConfig,
    redirects: &RedirectUrls,
    offering: &PackageOffering,
    transaction_reference: String,
) -> PaymentRequestRecord {
    PaymentRequestRecord {
        site_code: config.site_code.as_str().to_string(),
        country_code: config.country_code.clone(),
        currency_code: config.currency.clone(),
        amount: format_amount(offering.price),
        transaction_reference,
        bank_reference: format!(
            "{}-{}",
            config.bank_reference,
            offering.id.as_str().to_uppercase()
        ),
        customer: String::new(),
        cancel_url: redirects.cancel.to_string(),
        error_url: redirects.error.to_string(),
        success_url: redirects.success.to_string(),
        notify_url: redirects.notify.to_string(),
        is_test: config.is_test,
    }
}
