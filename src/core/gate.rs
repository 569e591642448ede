//! Registration deadline gate and the confirm-then-initiate purchase flow.
//!
//! All dates are evaluated in the visitor's local time zone, as reported by the
//! [`Clock`]. The closing date is inclusive: the whole closing day counts as open.

use crate::core::gateway::{build_payment_request, is_configured, GatewayConfig, RedirectUrls};
use crate::core::notice::Notice;
use crate::core::reference::ReferenceGenerator;
use crate::core::return_status::handle_return_status;
use crate::domain::model::{format_amount, Catalog, PaymentRequestRecord, PaymentStatus, PurchaseIntent};
use crate::domain::ports::{Clock, Dialog, GateSurface};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    #[error("Registration closed on {closing_date}")]
    RegistrationClosed { closing_date: NaiveDate },

    #[error("Payment gateway not configured (selected {package} for {amount})")]
    GatewayNotConfigured { package: String, amount: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationWindow {
    closing_date: NaiveDate,
}

impl RegistrationWindow {
    pub fn closing_on(closing_date: NaiveDate) -> Self {
        Self { closing_date }
    }

    pub fn closing_date(&self) -> NaiveDate {
        self.closing_date
    }

    /// Today at midnight against the closing day at end-of-day, which reduces to
    /// comparing calendar dates.
    pub fn is_open_at(&self, now: NaiveDateTime) -> bool {
        now.date() <= self.closing_date
    }

    /// Long form used on the page, e.g. `28 February 2026`.
    pub fn closing_label(&self) -> String {
        self.closing_date.format("%-d %B %Y").to_string()
    }
}

/// Everything the gate needs, built once at startup.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub window: RegistrationWindow,
    pub catalog: Catalog,
    pub gateway: GatewayConfig,
    pub redirects: RedirectUrls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Declined,
    /// Ready to be handed to a gateway submitter.
    Prepared(PaymentRequestRecord),
}

pub struct RegistrationGate<C: Clock> {
    config: GateConfig,
    references: ReferenceGenerator,
    clock: C,
}

impl<C: Clock> RegistrationGate<C> {
    pub fn new(config: GateConfig, clock: C) -> Self {
        let references = ReferenceGenerator::new(config.gateway.reference_prefix.clone());
        Self {
            config,
            references,
            clock,
        }
    }

    pub fn is_registration_open(&self) -> bool {
        self.config.window.is_open_at(self.clock.now())
    }

    /// Applies the current open/closed state to the page. Returns whether it is open.
    pub fn refresh_gate_ui<S: GateSurface>(&self, surface: &mut S) -> bool {
        let open = self.is_registration_open();

        surface.set_closing_date_label(&self.config.window.closing_label());
        surface.set_purchase_enabled(open);
        surface.set_closed_notices_visible(!open);
        surface.set_deadline_closed(!open);

        tracing::debug!(
            "Gate refreshed: open={}, closing={}",
            open,
            self.config.window.closing_date()
        );
        open
    }

    /// Runs the first gate evaluation; purchase handlers only exist after this.
    pub fn mount<S: GateSurface>(self, surface: &mut S) -> MountedGate<C> {
        let open = self.refresh_gate_ui(surface);
        if open {
            tracing::info!(
                "🟢 Registration open until {}",
                self.config.window.closing_label()
            );
        } else {
            tracing::info!(
                "🔴 Registration closed since {}",
                self.config.window.closing_label()
            );
        }
        MountedGate { gate: self }
    }
}

/// A gate whose page has been evaluated at least once.
pub struct MountedGate<C: Clock> {
    gate: RegistrationGate<C>,
}

impl<C: Clock> MountedGate<C> {
    pub fn is_registration_open(&self) -> bool {
        self.gate.is_registration_open()
    }

    pub fn refresh_gate_ui<S: GateSurface>(&self, surface: &mut S) -> bool {
        self.gate.refresh_gate_ui(surface)
    }

    pub fn on_page_load<D: Dialog>(&self, location: &mut Url, dialog: &mut D) -> Option<PaymentStatus> {
        handle_return_status(location, dialog)
    }

    /// Click handler for a purchase button carrying `package_id` and `displayed_price`.
    pub fn on_purchase_button_activated<D: Dialog>(
        &self,
        package_id: &str,
        displayed_price: Decimal,
        dialog: &mut D,
    ) -> Result<PurchaseOutcome, GateError> {
        // 頁面可能在截止前載入，點擊時要重新判斷
        if !self.gate.is_registration_open() {
            tracing::warn!("🔴 Purchase of '{}' blocked: registration closed", package_id);
            dialog.notify(&Notice::RegistrationClosed.to_string());
            return Err(GateError::RegistrationClosed {
                closing_date: self.gate.config.window.closing_date(),
            });
        }

        let intent = PurchaseIntent {
            package_id: package_id.to_string(),
            requested_price: displayed_price,
        };

        let Some(offering) = self.gate.config.catalog.resolve(&intent.package_id) else {
            return Err(self.unknown_package(&intent.package_id, dialog));
        };

        if offering.price != intent.requested_price {
            tracing::warn!(
                "Displayed price {} for '{}' differs from catalogue price {}",
                intent.requested_price,
                intent.package_id,
                offering.price
            );
        }

        let question = Notice::ConfirmPurchase {
            name: offering.name.clone(),
            currency: self.gate.config.gateway.currency.clone(),
            price: format_amount(intent.requested_price),
            description: offering.description.clone(),
        };

        if !dialog.confirm(&question.to_string()) {
            tracing::info!("Purchase of '{}' declined at confirmation", intent.package_id);
            return Ok(PurchaseOutcome::Declined);
        }

        self.initiate_purchase(&intent.package_id, dialog)
            .map(PurchaseOutcome::Prepared)
    }

    pub fn initiate_purchase<D: Dialog>(
        &self,
        package_id: &str,
        dialog: &mut D,
    ) -> Result<PaymentRequestRecord, GateError> {
        let config = &self.gate.config;
        let Some(offering) = config.catalog.resolve(package_id) else {
            return Err(self.unknown_package(package_id, dialog));
        };

        let reference = self.gate.references.generate();
        let record = build_payment_request(&config.gateway, &config.redirects, offering, reference);

        if !is_configured(&config.gateway) {
            tracing::warn!(
                "⚠️ Gateway not configured, refusing {} ({} {})",
                offering.name,
                record.currency_code,
                record.amount
            );
            dialog.notify(
                &Notice::GatewayNotConfigured {
                    name: offering.name.clone(),
                    currency: record.currency_code.clone(),
                    amount: record.amount.clone(),
                }
                .to_string(),
            );
            return Err(GateError::GatewayNotConfigured {
                package: offering.name.clone(),
                amount: record.amount,
            });
        }

        match serde_json::to_string(&record) {
            Ok(json) => tracing::info!("💳 Payment request prepared: {}", json),
            Err(e) => tracing::warn!("Could not encode payment request for logging: {}", e),
        }

        dialog.notify(
            &Notice::PaymentPrepared {
                name: offering.name.clone(),
                currency: record.currency_code.clone(),
                amount: record.amount.clone(),
                reference: record.transaction_reference.clone(),
            }
            .to_string(),
        );

        Ok(record)
    }

    fn unknown_package<D: Dialog>(&self, package_id: &str, dialog: &mut D) -> GateError {
        tracing::warn!("Unknown package requested: '{}'", package_id);
        dialog.notify(&Notice::UnknownPackage.to_string());
        GateError::UnknownPackage(package_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::gateway::Credential;
    use crate::domain::model::{PackageId, PackageOffering};

    #[derive(Default)]
    struct ScriptedDialog {
        answer: bool,
        notices: Vec<String>,
        questions: Vec<String>,
    }

    impl Dialog for ScriptedDialog {
        fn notify(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }

        fn confirm(&mut self, message: &str) -> bool {
            self.questions.push(message.to_string());
            self.answer
        }
    }

    #[derive(Default)]
    struct NullSurface;

    impl GateSurface for NullSurface {
        fn set_purchase_enabled(&mut self, _enabled: bool) {}
        fn set_closed_notices_visible(&mut self, _visible: bool) {}
        fn set_closing_date_label(&mut self, _label: &str) {}
        fn set_deadline_closed(&mut self, _closed: bool) {}
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, s).unwrap()
    }

    fn config(gateway: GatewayConfig) -> GateConfig {
        let origin = Url::parse("https://isp.example.co.za").unwrap();
        GateConfig {
            window: RegistrationWindow::closing_on(date(2026, 2, 28)),
            catalog: Catalog::new(vec![PackageOffering {
                id: PackageId::Standard,
                name: "Standard Package".to_string(),
                price: Decimal::new(5000, 0),
                description: "Comprehensive package for serious models".to_string(),
            }]),
            gateway,
            redirects: RedirectUrls::build(&origin, "/models.html", "/ozow-notify.php").unwrap(),
        }
    }

    fn mounted(now: NaiveDateTime, gateway: GatewayConfig) -> MountedGate<FixedClock> {
        RegistrationGate::new(config(gateway), FixedClock(now)).mount(&mut NullSurface)
    }

    #[test]
    fn test_window_boundaries() {
        let window = RegistrationWindow::closing_on(date(2026, 2, 28));

        assert!(window.is_open_at(at(2026, 1, 1, 12, 0, 0)));
        assert!(window.is_open_at(at(2026, 2, 28, 0, 0, 0)));
        assert!(window.is_open_at(at(2026, 2, 28, 23, 59, 59)));
        assert!(!window.is_open_at(at(2026, 3, 1, 0, 0, 0)));
        assert!(!window.is_open_at(at(2027, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_last_millisecond_of_closing_day() {
        let window = RegistrationWindow::closing_on(date(2026, 2, 28));
        let last = date(2026, 2, 28).and_hms_milli_opt(23, 59, 59, 999).unwrap();

        assert!(window.is_open_at(last));
        assert!(!window.is_open_at(last + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_time_of_day_does_not_matter() {
        let window = RegistrationWindow::closing_on(date(2026, 3, 1));
        let day = date(2026, 3, 1);
        let results: Vec<bool> = (0..24)
            .map(|h| window.is_open_at(day.and_hms_opt(h, 30, 0).unwrap()))
            .collect();
        assert!(results.iter().all(|open| *open));
    }

    #[test]
    fn test_closing_label() {
        let window = RegistrationWindow::closing_on(date(2026, 2, 28));
        assert_eq!(window.closing_label(), "28 February 2026");
    }

    #[test]
    fn test_closed_activation_asks_nothing() {
        let gate = mounted(at(2026, 3, 1, 0, 0, 0), GatewayConfig::default());
        let mut dialog = ScriptedDialog {
            answer: true,
            ..Default::default()
        };

        let result = gate.on_purchase_button_activated("standard", Decimal::new(5000, 0), &mut dialog);

        assert_eq!(
            result,
            Err(GateError::RegistrationClosed {
                closing_date: date(2026, 2, 28)
            })
        );
        assert!(dialog.questions.is_empty());
        assert_eq!(dialog.notices.len(), 1);
        assert!(dialog.notices[0].contains("Registration is now closed"));
    }

    #[test]
    fn test_unknown_package_is_reported_before_confirmation() {
        let gate = mounted(at(2026, 2, 1, 9, 0, 0), GatewayConfig::default());
        let mut dialog = ScriptedDialog {
            answer: true,
            ..Default::default()
        };

        let result = gate.on_purchase_button_activated("gold", Decimal::new(1, 0), &mut dialog);

        assert_eq!(result, Err(GateError::UnknownPackage("gold".to_string())));
        assert!(dialog.questions.is_empty());
        assert_eq!(dialog.notices, vec![Notice::UnknownPackage.to_string()]);
    }

    #[test]
    fn test_initiate_unknown_package() {
        let gate = mounted(at(2026, 2, 1, 9, 0, 0), GatewayConfig::default());
        let mut dialog = ScriptedDialog::default();

        // premium 是合法代號，但這份目錄沒有上架
        let result = gate.initiate_purchase("premium", &mut dialog);

        assert_eq!(result, Err(GateError::UnknownPackage("premium".to_string())));
        assert_eq!(dialog.notices.len(), 1);
    }

    #[test]
    fn test_unconfigured_gateway_fails_closed() {
        let gate = mounted(at(2026, 2, 28, 23, 59, 59), GatewayConfig::default());
        let mut dialog = ScriptedDialog {
            answer: true,
            ..Default::default()
        };

        let result = gate.on_purchase_button_activated("standard", Decimal::new(5000, 0), &mut dialog);

        assert_eq!(
            result,
            Err(GateError::GatewayNotConfigured {
                package: "Standard Package".to_string(),
                amount: "5000.00".to_string(),
            })
        );
        assert_eq!(dialog.questions.len(), 1);
        assert!(dialog.questions[0].contains("Standard Package"));
        assert!(dialog.questions[0].contains("5000.00"));
        assert!(dialog.questions[0].contains("Comprehensive package for serious models"));
        assert_eq!(dialog.notices.len(), 1);
        assert!(dialog.notices[0].contains("Standard Package"));
        assert!(dialog.notices[0].contains("5000.00"));
    }

    #[test]
    fn test_declined_confirmation_changes_nothing() {
        let gate = mounted(at(2026, 2, 1, 9, 0, 0), GatewayConfig::default());
        let mut dialog = ScriptedDialog::default();

        let result = gate.on_purchase_button_activated("standard", Decimal::new(5000, 0), &mut dialog);

        assert_eq!(result, Ok(PurchaseOutcome::Declined));
        assert_eq!(dialog.questions.len(), 1);
        assert!(dialog.notices.is_empty());
    }

    #[test]
    fn test_configured_gateway_prepares_record() {
        let gateway = GatewayConfig {
            site_code: Credential::parse("ISP-ABC-001"),
            private_key: Credential::parse("9f8a7b6c5d"),
            ..GatewayConfig::default()
        };
        let gate = mounted(at(2026, 2, 1, 9, 0, 0), gateway);
        let mut dialog = ScriptedDialog {
            answer: true,
            ..Default::default()
        };

        let outcome = gate
            .on_purchase_button_activated("standard", Decimal::new(5000, 0), &mut dialog)
            .unwrap();

        let PurchaseOutcome::Prepared(record) = outcome else {
            panic!("expected a prepared record, got {:?}", outcome);
        };
        assert_eq!(record.site_code, "ISP-ABC-001");
        assert_eq!(record.amount, "5000.00");
        assert_eq!(record.bank_reference, "ISP-MODEL-STANDARD");
        assert!(record.transaction_reference.starts_with("ISP-"));
        assert!(dialog.notices[0].contains(&record.transaction_reference));
    }

    #[test]
    fn test_double_activation_gets_two_dialogs() {
        let gateway = GatewayConfig {
            site_code: Credential::parse("ISP-ABC-001"),
            private_key: Credential::parse("9f8a7b6c5d"),
            ..GatewayConfig::default()
        };
        let gate = mounted(at(2026, 2, 1, 9, 0, 0), gateway);
        let mut dialog = ScriptedDialog {
            answer: true,
            ..Default::default()
        };

        let first = gate.initiate_purchase("standard", &mut dialog).unwrap();
        let second = gate.initiate_purchase("standard", &mut dialog).unwrap();

        assert_ne!(first.transaction_reference, second.transaction_reference);
        assert_eq!(dialog.notices.len(), 2);
    }
}
