use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Blocking user dialogs (the browser's alert/confirm pair).
pub trait Dialog {
    fn notify(&mut self, message: &str);
    fn confirm(&mut self, message: &str) -> bool;
}

/// Wall clock in the visitor's local time zone.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Everything on the page that reflects whether registration is open.
pub trait GateSurface {
    fn set_purchase_enabled(&mut self, enabled: bool);
    fn set_closed_notices_visible(&mut self, visible: bool);
    fn set_closing_date_label(&mut self, label: &str);
    fn set_deadline_closed(&mut self, closed: bool);
}

/// Sends submitted form fields to a remote relay.
#[async_trait]
pub trait FormSubmitter: Send + Sync {
    async fn submit(&self, fields: &[(String, String)]) -> Result<RelayReply>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct RelayReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
