pub mod clock;
pub mod gate;
pub mod gateway;
pub mod notice;
pub mod reference;
pub mod return_status;

pub use crate::domain::model::{Catalog, PackageId, PackageOffering, PaymentRequestRecord, PaymentStatus};
pub use crate::domain::ports::{Clock, Dialog, GateSurface};
pub use crate::utils::error::Result;
