use crate::domain::model::{format_amount, Catalog};
use crate::domain::ports::GateSurface;
use rust_decimal::Decimal;
use std::fmt;

/// A purchase affordance with the attributes the page carries for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseButton {
    pub package: String,
    pub price: String,
    pub visible: bool,
    pub disabled: bool,
}

impl PurchaseButton {
    pub fn new(package: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            price: price.into(),
            visible: true,
            disabled: false,
        }
    }

    pub fn displayed_price(&self) -> Option<Decimal> {
        self.price.trim().parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedNotice {
    pub package: String,
    pub visible: bool,
}

/// In-memory model of the packages page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub buttons: Vec<PurchaseButton>,
    pub closed_notices: Vec<ClosedNotice>,
    pub closing_date_label: Option<String>,
    pub deadline_closed: bool,
}

impl Page {
    /// One button and one closed notice per offering, as the pricing cards lay them out.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let buttons = catalog
            .offerings()
            .iter()
            .map(|o| PurchaseButton::new(o.id.as_str(), o.price.to_string()))
            .collect();
        let closed_notices = catalog
            .offerings()
            .iter()
            .map(|o| ClosedNotice {
                package: o.id.as_str().to_string(),
                visible: false,
            })
            .collect();

        Self {
            buttons,
            closed_notices,
            closing_date_label: None,
            deadline_closed: false,
        }
    }

    pub fn button(&self, package: &str) -> Option<&PurchaseButton> {
        self.buttons.iter().find(|b| b.package == package)
    }

    pub fn deadline_text(&self) -> String {
        match (&self.closing_date_label, self.deadline_closed) {
            (_, true) => "Registration is now closed".to_string(),
            (Some(label), false) => format!("Registration closes on {}", label),
            (None, false) => "Registration open".to_string(),
        }
    }
}

impl GateSurface for Page {
    fn set_purchase_enabled(&mut self, enabled: bool) {
        for button in &mut self.buttons {
            button.visible = enabled;
            button.disabled = !enabled;
        }
    }

    fn set_closed_notices_visible(&mut self, visible: bool) {
        for notice in &mut self.closed_notices {
            notice.visible = visible;
        }
    }

    fn set_closing_date_label(&mut self, label: &str) {
        self.closing_date_label = Some(label.to_string());
    }

    fn set_deadline_closed(&mut self, closed: bool) {
        self.deadline_closed = closed;
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.deadline_text())?;
        for button in &self.buttons {
            let price = button
                .displayed_price()
                .map(format_amount)
                .unwrap_or_else(|| button.price.clone());
            let state = if button.visible && !button.disabled {
                "available"
            } else {
                "closed"
            };
            writeln!(f, "  {:<10} {:>10}  {}", button.package, price, state)?;
        }
        Ok(())
    }
}
