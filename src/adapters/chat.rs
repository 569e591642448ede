use serde::Deserialize;
use url::Url;

const CHAT_BASE: &str = "https://wa.me/";
const FALLBACK_MESSAGE: &str = "Hello!";

fn default_number() -> String {
    "27747394461".to_string()
}

fn default_country_prefix() -> String {
    "27".to_string()
}

fn default_message() -> String {
    "Hi! I'd like a quick quote.".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatConfig {
    /// International format, digits only.
    #[serde(default = "default_number")]
    pub default_number: String,
    /// Replaces a leading trunk `0`.
    #[serde(default = "default_country_prefix")]
    pub country_prefix: String,
    #[serde(default = "default_message")]
    pub default_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_number: default_number(),
            country_prefix: default_country_prefix(),
            default_message: default_message(),
        }
    }
}

impl ChatConfig {
    pub fn normalize_number(&self, raw: Option<&str>) -> String {
        let digits: String = raw
            .unwrap_or_default()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();

        if digits.is_empty() {
            self.default_number.clone()
        } else if let Some(local) = digits.strip_prefix('0') {
            format!("{}{}", self.country_prefix, local)
        } else {
            digits
        }
    }

    /// Builds `https://wa.me/<number>?text=<message>`.
    pub fn compose_link(&self, number: Option<&str>, message: Option<&str>) -> Url {
        let phone = self.normalize_number(number);
        let text = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_MESSAGE);

        let mut url = Url::parse(CHAT_BASE)
            .and_then(|base| base.join(&phone))
            .unwrap_or_else(|_| Url::parse(CHAT_BASE).expect("chat base URL is valid"));
        url.query_pairs_mut().append_pair("text", text);

        tracing::debug!("💬 Chat link composed for {}", phone);
        url
    }
}
