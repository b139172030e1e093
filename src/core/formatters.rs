use crate::core::payments::{
    format_iban, format_iso_reference, format_qr_reference, whitespace_removed,
    whitespace_removed_and_upper_case,
};
use crate::domain::ports::FieldFormatter;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct IbanFormatter;

impl FieldFormatter for IbanFormatter {
    fn formatted_value(&self, raw_value: Option<&str>) -> String {
        raw_value.map(format_iban).unwrap_or_default()
    }

    fn raw_value(&self, formatted_value: &str) -> String {
        whitespace_removed(formatted_value)
    }
}

pub static IBAN_FORMATTER: IbanFormatter = IbanFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Empty,
    Iso,
    Qr,
    Unstructured,
}

impl ReferenceKind {
    pub fn classify(raw_value: Option<&str>) -> Self {
        let Some(raw_value) = raw_value else {
            return ReferenceKind::Empty;
        };

        let cleaned = whitespace_removed_and_upper_case(raw_value);
        if cleaned.is_empty() {
            ReferenceKind::Empty
        } else if cleaned.starts_with("RF") {
            ReferenceKind::Iso
        } else if cleaned.chars().all(|c| c.is_ascii_digit()) {
            ReferenceKind::Qr
        } else {
            ReferenceKind::Unstructured
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceFormatter;

impl FieldFormatter for ReferenceFormatter {
    fn formatted_value(&self, raw_value: Option<&str>) -> String {
        match (ReferenceKind::classify(raw_value), raw_value) {
            (ReferenceKind::Iso, Some(value)) => format_iso_reference(value),
            (ReferenceKind::Qr, Some(value)) => format_qr_reference(value),
            (ReferenceKind::Unstructured, Some(value)) => value.trim().to_string(),
            _ => String::new(),
        }
    }

    fn raw_value(&self, formatted_value: &str) -> String {
        whitespace_removed(formatted_value)
    }
}

pub static REFERENCE_FORMATTER: ReferenceFormatter = ReferenceFormatter;

/// Amounts are displayed with two decimals and a space as thousands separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountFormatter;

impl FieldFormatter for AmountFormatter {
    fn formatted_value(&self, raw_value: Option<&str>) -> String {
        let Some(raw_value) = raw_value else {
            return String::new();
        };

        let cleaned = self.raw_value(raw_value);
        if cleaned.is_empty() {
            return String::new();
        }

        match cleaned.parse::<f64>() {
            Ok(amount) if amount.is_finite() => group_thousands(&format!("{:.2}", amount)),
            _ => raw_value.trim().to_string(),
        }
    }

    fn raw_value(&self, formatted_value: &str) -> String {
        formatted_value
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\'')
            .map(|c| if c == ',' { '.' } else { c })
            .collect()
    }
}

pub static AMOUNT_FORMATTER: AmountFormatter = AmountFormatter;

fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
    grouped.push_str(sign);
    let len = integer.len();
    for (i, c) in integer.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
