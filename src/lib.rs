pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FilePostalCodeSource, HttpPostalCodeSource};
pub use config::{cli::LocalStorage, toml_config::AppConfig};
pub use crate::core::bill::{
    clone_bill, update_bill_field, update_bill_field_from_text, validate_bill, ValidationResult,
};
pub use crate::core::formatters::{ReferenceKind, AMOUNT_FORMATTER, IBAN_FORMATTER, REFERENCE_FORMATTER};
pub use crate::core::postal_codes::PostalCodeIndex;
pub use crate::core::service::PostalCodeService;
pub use domain::model::{Address, BillFormat, PostalCode, QrBill};
pub use domain::ports::FieldFormatter;
pub use utils::error::{QrBillError, Result};
