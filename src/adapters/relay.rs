use crate::core::gateway::Credential;
use crate::domain::ports::{FormSubmitter, RelayReply};
use crate::utils::error::{PackagesError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const SENT_MESSAGE: &str = "Thank you! Your message has been sent successfully.";
pub const FAILED_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please try again or contact us directly.";

fn default_timeout_seconds() -> u64 {
    15
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayConfig {
    pub endpoint: String,
    /// Sent as the `access_key` field unless it is a placeholder.
    #[serde(default)]
    pub access_key: Credential,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Posts contact and quote forms to a third-party relay such as Web3Forms.
pub struct FormRelay {
    client: Client,
    config: RelayConfig,
}

impl FormRelay {
    pub fn new(config: RelayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl FormSubmitter for FormRelay {
    async fn submit(&self, fields: &[(String, String)]) -> Result<RelayReply> {
        let mut body: Vec<(&str, &str)> = fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Credential::Value(key) = &self.config.access_key {
            body.push(("access_key", key.as_str()));
        }

        tracing::debug!("📨 Posting {} form fields to {}", fields.len(), self.config.endpoint);
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("📨 Relay responded with status {}", status);

        // 失敗時 relay 也會回 JSON，先嘗試解析
        match serde_json::from_str::<RelayReply>(&text) {
            Ok(reply) => Ok(reply),
            Err(_) if !status.is_success() => Ok(RelayReply {
                success: false,
                message: Some(format!("Relay returned HTTP {}", status)),
            }),
            Err(e) => Err(PackagesError::SerializationError(e)),
        }
    }
}

/// What the form's status line ends up showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Sent,
    Failed { reason: String },
}

impl FormStatus {
    pub fn message(&self) -> &'static str {
        match self {
            FormStatus::Sent => SENT_MESSAGE,
            FormStatus::Failed { .. } => FAILED_MESSAGE,
        }
    }
}

/// Submits the form and turns every failure into [`FormStatus::Failed`].
pub async fn handle_form_submission<S: FormSubmitter + ?Sized>(
    submitter: &S,
    fields: &[(String, String)],
) -> FormStatus {
    match submitter.submit(fields).await {
        Ok(reply) if reply.success => {
            tracing::info!("✅ Form submitted");
            FormStatus::Sent
        }
        Ok(reply) => {
            let reason = reply
                .message
                .unwrap_or_else(|| "Submission failed".to_string());
            tracing::error!("❌ Form submission rejected: {}", reason);
            FormStatus::Failed { reason }
        }
        Err(e) => {
            tracing::error!("❌ Form submission error: {}", e);
            FormStatus::Failed {
                reason: e.to_string(),
            }
        }
    }
}
