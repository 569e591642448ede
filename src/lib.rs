pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::page::Page;
pub use crate::config::SiteConfig;
pub use crate::core::clock::{FixedClock, SystemClock};
pub use crate::core::gate::{GateConfig, GateError, MountedGate, PurchaseOutcome, RegistrationGate};
pub use crate::utils::error::{PackagesError, Result};
