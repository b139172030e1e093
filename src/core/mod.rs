pub mod bill;
pub mod formatters;
pub mod payments;
pub mod postal_codes;
pub mod service;

pub use crate::domain::model::{Address, BillFormat, Language, PostalCode, QrBill};
pub use crate::domain::ports::{FieldFormatter, PostalCodeSource, Storage};
pub use crate::utils::error::Result;
