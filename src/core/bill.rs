//! Bill helpers: immutable field updates and payment field validation.

use crate::core::payments::{
    is_qr_iban, is_valid_iban, is_valid_iso_reference, is_valid_qr_reference,
    whitespace_removed_and_upper_case,
};
use crate::domain::model::{Address, QrBill};
use crate::utils::error::{QrBillError, Result};
use crate::utils::validation::Validate;
use serde::Serialize;
use serde_json::{Map, Value};

const MAX_ADDITIONAL_INFO_LENGTH: usize = 140;
const MIN_AMOUNT: f64 = 0.01;
const MAX_AMOUNT: f64 = 999_999_999.99;

const BILL_FIELDS: &[&str] = &[
    "version",
    "amount",
    "currency",
    "account",
    "creditor",
    "reference",
    "unstructuredMessage",
    "billInformation",
    "debtor",
    "format",
];
const ADDRESS_FIELDS: &[&str] = &["name", "street", "houseNo", "postalCode", "town", "countryCode"];
const FORMAT_FIELDS: &[&str] = &[
    "language",
    "outputSize",
    "graphicsFormat",
    "separatorType",
    "fontFamily",
];

/// Returns an independent copy of `bill`.
pub fn clone_bill(bill: &QrBill) -> QrBill {
    bill.clone()
}

/// Returns a new bill with the field at the dot-separated `path` set to `value`.
///
/// Missing intermediate objects are created, `null` clears an optional field.
/// The given bill is left untouched.
pub fn update_bill_field(bill: &QrBill, path: &str, value: Value) -> Result<QrBill> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(invalid_path(path, "path must not contain empty segments"));
    }
    check_path(path, &segments)?;

    let mut tree = serde_json::to_value(bill)?;
    set_at_path(&mut tree, path, &segments, value)?;

    // 路徑已確認存在，解碼失敗只可能是值的型別不符
    let updated = serde_json::from_value(tree).map_err(|e| QrBillError::InvalidFieldValue {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!("Updated bill field {}", path);
    Ok(updated)
}

/// Like [`update_bill_field`], but takes the new value as command line text.
///
/// Text that parses as JSON is used as JSON. A number or boolean the field
/// does not accept is retried as a plain string, so `8001` sets a postal code.
pub fn update_bill_field_from_text(bill: &QrBill, path: &str, text: &str) -> Result<QrBill> {
    let parsed = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) => return update_bill_field(bill, path, Value::String(text.to_string())),
    };

    let retry_as_text = parsed.is_number() || parsed.is_boolean();
    match update_bill_field(bill, path, parsed) {
        Err(QrBillError::InvalidFieldValue { .. }) if retry_as_text => {
            tracing::debug!("Field {} takes text, using '{}' as a string", path, text);
            update_bill_field(bill, path, Value::String(text.to_string()))
        }
        other => other,
    }
}

fn check_path(path: &str, segments: &[&str]) -> Result<()> {
    let mut fields = BILL_FIELDS;
    for (depth, segment) in segments.iter().enumerate() {
        if !fields.contains(segment) {
            return Err(invalid_path(path, &format!("unknown field '{}'", segment)));
        }
        if depth + 1 < segments.len() {
            fields = match *segment {
                "creditor" | "debtor" => ADDRESS_FIELDS,
                "format" => FORMAT_FIELDS,
                _ => return Err(invalid_path(path, &format!("'{}' is not an object", segment))),
            };
        }
    }
    Ok(())
}

fn set_at_path(tree: &mut Value, path: &str, segments: &[&str], value: Value) -> Result<()> {
    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| invalid_path(path, "path is empty"))?;

    let mut current = tree;
    for segment in parents {
        let object = current
            .as_object_mut()
            .ok_or_else(|| invalid_path(path, &format!("'{}' is not an object", segment)))?;
        let child = object
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        // 缺少的中間物件以空物件補上
        if child.is_null() {
            *child = Value::Object(Map::new());
        }
        current = child;
    }

    let object = current
        .as_object_mut()
        .ok_or_else(|| invalid_path(path, &format!("cannot set '{}' on a non-object value", last)))?;
    object.insert(last.to_string(), value);
    Ok(())
}

fn invalid_path(path: &str, reason: &str) -> QrBillError {
    QrBillError::InvalidFieldPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    pub level: MessageLevel,
    pub field: String,
    pub key: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub messages: Vec<ValidationMessage>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Warning)
    }

    pub fn first_error(&self) -> Option<&ValidationMessage> {
        self.messages.iter().find(|m| m.level == MessageLevel::Error)
    }

    fn error(&mut self, field: impl Into<String>, key: &'static str) {
        self.messages.push(ValidationMessage {
            level: MessageLevel::Error,
            field: field.into(),
            key,
        });
    }

    fn warning(&mut self, field: impl Into<String>, key: &'static str) {
        self.messages.push(ValidationMessage {
            level: MessageLevel::Warning,
            field: field.into(),
            key,
        });
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn validate_bill(bill: &QrBill) -> ValidationResult {
    let mut result = ValidationResult::default();

    match non_empty(&bill.currency) {
        Some("CHF") | Some("EUR") => {}
        Some(_) => result.error("currency", "currency_not_chf_or_eur"),
        None => result.error("currency", "field_value_missing"),
    }

    if let Some(amount) = bill.amount {
        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
            result.error("amount", "amount_outside_valid_range");
        }
    }

    let account = non_empty(&bill.account).map(whitespace_removed_and_upper_case);
    let qr_iban = match &account {
        None => {
            result.error("account", "field_value_missing");
            false
        }
        Some(account) => {
            if !(account.starts_with("CH") || account.starts_with("LI")) {
                result.error("account", "account_is_ch_li_iban");
            } else if !is_valid_iban(account) {
                result.error("account", "account_is_valid_iban");
            }
            is_qr_iban(account)
        }
    };

    validate_reference(bill, qr_iban, &mut result);

    match &bill.creditor {
        Some(creditor) => validate_address(creditor, "creditor", &mut result),
        None => result.error("creditor", "field_value_missing"),
    }
    if let Some(debtor) = &bill.debtor {
        validate_address(debtor, "debtor", &mut result);
    }

    validate_additional_info(bill, &mut result);

    result
}

fn validate_reference(bill: &QrBill, qr_iban: bool, result: &mut ValidationResult) {
    let reference = non_empty(&bill.reference);
    match (qr_iban, reference) {
        (true, None) => result.error("reference", "mandatory_for_qr_iban"),
        (true, Some(reference)) => {
            if !is_valid_qr_reference(reference) {
                result.error("reference", "valid_qr_ref_no");
            }
        }
        (false, None) => {}
        (false, Some(reference)) => {
            let cleaned = whitespace_removed_and_upper_case(reference);
            if cleaned.starts_with("RF") {
                if !is_valid_iso_reference(&cleaned) {
                    result.error("reference", "valid_iso11649_creditor_ref");
                }
            } else if cleaned.chars().all(|c| c.is_ascii_digit()) {
                result.error("reference", "qr_ref_not_allowed");
            } else {
                result.error("reference", "valid_iso11649_creditor_ref");
            }
        }
    }
}

fn validate_address(address: &Address, prefix: &str, result: &mut ValidationResult) {
    let required = [
        ("name", &address.name),
        ("postalCode", &address.postal_code),
        ("town", &address.town),
        ("countryCode", &address.country_code),
    ];
    for (field, value) in required {
        if non_empty(value).is_none() {
            result.error(format!("{}.{}", prefix, field), "field_value_missing");
        }
    }

    if let Some(country) = non_empty(&address.country_code) {
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_uppercase()) {
            result.error(format!("{}.countryCode", prefix), "valid_country_code");
        }
    }

    let limits = [
        ("name", &address.name, 70),
        ("street", &address.street, 70),
        ("houseNo", &address.house_no, 16),
        ("postalCode", &address.postal_code, 16),
        ("town", &address.town, 35),
    ];
    for (field, value, max_len) in limits {
        if non_empty(value).is_some_and(|v| v.chars().count() > max_len) {
            result.warning(format!("{}.{}", prefix, field), "field_value_too_long");
        }
    }
}

fn validate_additional_info(bill: &QrBill, result: &mut ValidationResult) {
    let message_len = non_empty(&bill.unstructured_message).map_or(0, |m| m.chars().count());
    let bill_info = non_empty(&bill.bill_information);
    let bill_info_len = bill_info.map_or(0, |b| b.chars().count());

    if message_len + bill_info_len > MAX_ADDITIONAL_INFO_LENGTH {
        let field = if bill_info_len > 0 {
            "billInformation"
        } else {
            "unstructuredMessage"
        };
        result.error(field, "additional_info_too_long");
    }

    if bill_info.is_some_and(|info| !info.starts_with("//")) {
        result.error("billInformation", "bill_info_invalid");
    }
}

impl Validate for QrBill {
    fn validate(&self) -> Result<()> {
        let result = validate_bill(self);
        for message in result.messages.iter().filter(|m| m.level == MessageLevel::Warning) {
            tracing::warn!("Bill field {}: {}", message.field, message.key);
        }

        match result.first_error() {
            Some(error) => Err(QrBillError::PaymentValidation {
                field: error.field.clone(),
                message: error.key.to_string(),
            }),
            None => Ok(()),
        }
    }
}
