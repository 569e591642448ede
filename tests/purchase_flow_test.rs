use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use package_gate::core::gateway::Credential;
use package_gate::core::Dialog;
use package_gate::{
    FixedClock, GateError, MountedGate, Page, PurchaseOutcome, RegistrationGate, SiteConfig,
};
use rust_decimal::Decimal;

#[derive(Default)]
struct FakeDialog {
    answer: bool,
    notices: Vec<String>,
    questions: Vec<String>,
}

impl FakeDialog {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Default::default()
        }
    }
}

impl Dialog for FakeDialog {
    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.questions.push(message.to_string());
        self.answer
    }
}

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S").unwrap()
}

fn site_config() -> SiteConfig {
    SiteConfig::from_toml_str(package_gate::config::toml_config::BUILTIN_CONFIG).unwrap()
}

fn mount(now: NaiveDateTime, config: &SiteConfig) -> Result<(MountedGate<FixedClock>, Page)> {
    let gate_config = config.gate_config()?;
    let mut page = Page::for_catalog(&gate_config.catalog);
    let gate = RegistrationGate::new(gate_config, FixedClock(now)).mount(&mut page);
    Ok((gate, page))
}

/// 截止日當天 23:59:59 仍開放，隔天 00:00:00 關閉
#[test]
fn test_closing_day_boundary() -> Result<()> {
    let config = site_config();

    let (gate, page) = mount(at("2026-02-28", "23:59:59"), &config)?;
    assert!(gate.is_registration_open());
    assert!(page.buttons.iter().all(|b| b.visible && !b.disabled));
    assert!(page.closed_notices.iter().all(|n| !n.visible));
    assert_eq!(page.deadline_text(), "Registration closes on 28 February 2026");

    let (gate, page) = mount(at("2026-03-01", "00:00:00"), &config)?;
    assert!(!gate.is_registration_open());
    assert!(page.buttons.iter().all(|b| !b.visible && b.disabled));
    assert!(page.closed_notices.iter().all(|n| n.visible));
    assert_eq!(page.deadline_text(), "Registration is now closed");

    Ok(())
}

#[test]
fn test_refresh_is_idempotent() -> Result<()> {
    let config = site_config();

    for now in [at("2026-01-10", "08:00:00"), at("2026-06-01", "08:00:00")] {
        let (gate, page_after_mount) = mount(now, &config)?;

        let mut page = page_after_mount.clone();
        for _ in 0..5 {
            gate.refresh_gate_ui(&mut page);
        }
        assert_eq!(page, page_after_mount);
    }

    Ok(())
}

/// 頁面載入時還開放，但點擊時已過截止日
#[test]
fn test_stale_page_is_rechecked_on_click() -> Result<()> {
    let config = site_config();
    let gate_config = config.gate_config()?;
    let mut page = Page::for_catalog(&gate_config.catalog);

    let open_gate = RegistrationGate::new(gate_config.clone(), FixedClock(at("2026-02-28", "23:59:00")))
        .mount(&mut page);
    assert!(open_gate.is_registration_open());
    let button = page.button("standard").unwrap().clone();
    assert!(!button.disabled);

    let later_gate = RegistrationGate::new(gate_config, FixedClock(at("2026-03-01", "00:00:01")));
    let mut untouched = page.clone();
    let later_gate = later_gate.mount(&mut untouched);

    let mut dialog = FakeDialog::answering(true);
    let result = later_gate.on_purchase_button_activated(
        &button.package,
        button.displayed_price().unwrap(),
        &mut dialog,
    );

    assert!(matches!(result, Err(GateError::RegistrationClosed { .. })));
    assert!(dialog.questions.is_empty());
    assert_eq!(dialog.notices.len(), 1);
    Ok(())
}

#[test]
fn test_standard_package_confirmed_without_credentials() -> Result<()> {
    let config = site_config();
    let (gate, page) = mount(at("2026-02-01", "10:00:00"), &config)?;
    let button = page.button("standard").unwrap();
    assert_eq!(button.displayed_price(), Some(Decimal::new(5000, 0)));

    let mut dialog = FakeDialog::answering(true);
    let result =
        gate.on_purchase_button_activated(&button.package, button.displayed_price().unwrap(), &mut dialog);

    assert_eq!(
        result,
        Err(GateError::GatewayNotConfigured {
            package: "Standard Package".to_string(),
            amount: "5000.00".to_string(),
        })
    );
    assert_eq!(dialog.notices.len(), 1);
    assert!(dialog.notices[0].contains("Standard Package"));
    assert!(dialog.notices[0].contains("5000.00"));
    Ok(())
}

#[test]
fn test_standard_package_declined() -> Result<()> {
    let config = site_config();
    let (gate, _page) = mount(at("2026-02-01", "10:00:00"), &config)?;

    let mut dialog = FakeDialog::answering(false);
    let result = gate.on_purchase_button_activated("standard", Decimal::new(5000, 0), &mut dialog);

    assert_eq!(result, Ok(PurchaseOutcome::Declined));
    assert_eq!(dialog.questions.len(), 1);
    assert!(dialog.notices.is_empty());
    Ok(())
}

#[test]
fn test_unknown_package_button() -> Result<()> {
    let config = site_config();
    let (gate, _page) = mount(at("2026-02-01", "10:00:00"), &config)?;

    let mut dialog = FakeDialog::answering(true);
    let result = gate.on_purchase_button_activated("platinum", Decimal::new(99, 0), &mut dialog);

    assert_eq!(result, Err(GateError::UnknownPackage("platinum".to_string())));
    assert!(dialog.questions.is_empty());
    assert_eq!(dialog.notices.len(), 1);
    Ok(())
}

#[test]
fn test_configured_gateway_hands_back_record() -> Result<()> {
    let mut config = site_config();
    config.gateway.site_code = Credential::parse("ISP-LIVE-42");
    config.gateway.private_key = Credential::parse("0a1b2c3d4e5f");
    config.gateway.is_test = false;

    let (gate, _page) = mount(at("2026-02-01", "10:00:00"), &config)?;
    let mut dialog = FakeDialog::answering(true);

    let outcome = gate.on_purchase_button_activated("premium", Decimal::new(10000, 0), &mut dialog)?;
    let PurchaseOutcome::Prepared(record) = outcome else {
        panic!("expected a prepared record");
    };

    assert_eq!(record.amount, "10000.00");
    assert_eq!(record.bank_reference, "ISP-MODEL-PREMIUM");
    assert_eq!(record.success_url, "https://isp-models.co.za/models.html?payment=success");
    assert_eq!(record.notify_url, "https://isp-models.co.za/ozow-notify.php");
    assert!(!record.is_test);
    Ok(())
}

#[test]
fn test_custom_closing_date_from_config() -> Result<()> {
    let content = package_gate::config::toml_config::BUILTIN_CONFIG
        .replace("closing_date = \"2026-02-28\"", "closing_date = \"2030-12-31\"");
    let config = SiteConfig::from_toml_str(&content)?;

    assert_eq!(config.closing_date()?, NaiveDate::from_ymd_opt(2030, 12, 31).unwrap());
    let (gate, _page) = mount(at("2030-12-31", "18:00:00"), &config)?;
    assert!(gate.is_registration_open());
    Ok(())
}
