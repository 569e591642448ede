use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Package tiers sold on the packages page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageId {
    Basic,
    Standard,
    Premium,
}

impl PackageId {
    pub const ALL: [PackageId; 3] = [PackageId::Basic, PackageId::Standard, PackageId::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageId::Basic => "basic",
            PackageId::Standard => "standard",
            PackageId::Premium => "premium",
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOffering {
    pub id: PackageId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

/// The fixed set of offerings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    offerings: Vec<PackageOffering>,
}

impl Catalog {
    pub fn new(offerings: Vec<PackageOffering>) -> Self {
        Self { offerings }
    }

    pub fn get(&self, id: PackageId) -> Option<&PackageOffering> {
        self.offerings.iter().find(|o| o.id == id)
    }

    /// Resolves a raw identifier, as read from a button attribute.
    pub fn resolve(&self, raw_id: &str) -> Option<&PackageOffering> {
        raw_id.parse::<PackageId>().ok().and_then(|id| self.get(id))
    }

    pub fn offerings(&self) -> &[PackageOffering] {
        &self.offerings
    }
}

/// One click on a purchase button. Lives only until the confirmation step answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseIntent {
    pub package_id: String,
    pub requested_price: Decimal,
}

/// What would be handed to the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestRecord {
    pub site_code: String,
    pub country_code: String,
    pub currency_code: String,
    pub amount: String,
    pub transaction_reference: String,
    pub bank_reference: String,
    pub customer: String,
    pub cancel_url: String,
    pub error_url: String,
    pub success_url: String,
    pub notify_url: String,
    pub is_test: bool,
}

/// Terminal outcome reported back by the gateway through the `payment` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Success,
    Cancelled,
    Error,
}

impl PaymentStatus {
    pub const QUERY_KEY: &'static str = "payment";

    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "success" => Some(PaymentStatus::Success),
            "cancelled" => Some(PaymentStatus::Cancelled),
            "error" => Some(PaymentStatus::Error),
            _ => None,
        }
    }

    pub fn as_query_value(&self) -> &'static str {
        match self {
            PaymentStatus::Success => "success",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Error => "error",
        }
    }
}

/// Amounts are always shown with exactly two decimals, e.g. `5000.00`.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
