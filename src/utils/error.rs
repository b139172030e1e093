use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrBillError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid bill field path '{path}': {reason}")]
    InvalidFieldPath { path: String, reason: String },

    #[error("Invalid value for bill field '{path}': {reason}")]
    InvalidFieldValue { path: String, reason: String },

    #[error("Payment validation failed for '{field}': {message}")]
    PaymentValidation { field: String, message: String },

    #[error("Postal code data error: {message}")]
    PostalCodeData { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Validation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QrBillError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QrBillError::HttpError(_) => ErrorCategory::Network,
            QrBillError::ZipError(_)
            | QrBillError::CsvError(_)
            | QrBillError::SerializationError(_)
            | QrBillError::PostalCodeData { .. } => ErrorCategory::Data,
            QrBillError::ConfigValidationError { .. }
            | QrBillError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            QrBillError::InvalidFieldPath { .. }
            | QrBillError::InvalidFieldValue { .. }
            | QrBillError::PaymentValidation { .. } => ErrorCategory::Validation,
            QrBillError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者輸入錯誤，修正後重試即可
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            QrBillError::HttpError(_) => {
                "Check the network connection and the postal_codes.source_url setting".to_string()
            }
            QrBillError::ZipError(_) | QrBillError::CsvError(_) => {
                "The postal code archive looks corrupt; delete the cache directory and retry"
                    .to_string()
            }
            QrBillError::PostalCodeData { .. } => {
                "Verify that the source provides the Swiss postal code directory (zip with CSV)"
                    .to_string()
            }
            QrBillError::SerializationError(_) => {
                "Check that the bill file contains valid JSON".to_string()
            }
            QrBillError::ConfigValidationError { .. } | QrBillError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line arguments".to_string()
            }
            QrBillError::InvalidFieldPath { .. } => {
                "Use a dot-separated path of existing bill fields, e.g. creditor.name".to_string()
            }
            QrBillError::InvalidFieldValue { path, .. } => {
                format!("Pass a value of the type '{}' expects; text fields take strings", path)
            }
            QrBillError::PaymentValidation { field, .. } => {
                format!("Correct the value of '{}' and validate again", field)
            }
            QrBillError::IoError(_) => {
                "Check file permissions and available disk space".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QrBillError::HttpError(_) => "Could not download the postal code data".to_string(),
            QrBillError::ZipError(_) | QrBillError::CsvError(_) => {
                "Could not read the postal code data".to_string()
            }
            QrBillError::PaymentValidation { field, message } => {
                format!("The bill is invalid: {} ({})", field, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QrBillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_low_severity() {
        let error = QrBillError::PaymentValidation {
            field: "account".to_string(),
            message: "account_is_valid_iban".to_string(),
        };
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.severity(), ErrorSeverity::Low);
        assert!(error.recovery_suggestion().contains("account"));
        assert!(error.user_friendly_message().contains("account_is_valid_iban"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let error = QrBillError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(error.category(), ErrorCategory::System);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_field_value_error_points_at_the_value() {
        let error = QrBillError::InvalidFieldValue {
            path: "amount".to_string(),
            reason: "invalid type: string \"lots\", expected f64".to_string(),
        };
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.severity(), ErrorSeverity::Low);
        assert!(error.recovery_suggestion().contains("'amount'"));
        assert!(!error.recovery_suggestion().contains("dot-separated"));
    }
}
