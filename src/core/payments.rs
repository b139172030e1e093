//! Payment field primitives: whitespace handling, display grouping and the
//! checksums of IBANs, QR references and ISO 11649 creditor references.

use regex::Regex;
use std::sync::LazyLock;

static ISO_REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^RF[0-9]{2}[A-Z0-9]{1,21}$").unwrap());

const MOD10_TABLE: [u32; 10] = [0, 9, 4, 6, 8, 2, 7, 1, 3, 5];

pub fn whitespace_removed(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn whitespace_removed_and_upper_case(value: &str) -> String {
    whitespace_removed(value).to_uppercase()
}

/// Groups of four characters from the left, e.g. `CH44 3199 9123 0008 8901 2`.
pub fn format_iban(iban: &str) -> String {
    group_from_left(&whitespace_removed(iban), 4)
}

/// Groups of five digits counted from the right, e.g. `21 00000 00003 13947 14300 09017`.
pub fn format_qr_reference(reference: &str) -> String {
    let cleaned = whitespace_removed(reference);
    let len = cleaned.chars().count();
    let mut formatted = String::with_capacity(len + len / 5);
    for (i, c) in cleaned.chars().enumerate() {
        if i != 0 && (len - i) % 5 == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }
    formatted
}

/// Upper case, groups of four characters from the left, e.g. `RF18 5390 0754 7034`.
pub fn format_iso_reference(reference: &str) -> String {
    group_from_left(&whitespace_removed_and_upper_case(reference), 4)
}

fn group_from_left(value: &str, group_size: usize) -> String {
    let mut formatted = String::with_capacity(value.len() + value.len() / group_size);
    for (i, c) in value.chars().enumerate() {
        if i != 0 && i % group_size == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }
    formatted
}

/// ISO 7064 mod 97-10 over an alphanumeric string (letters count as 10..35).
/// Returns `None` for characters outside `0-9A-Z`.
fn mod97(value: &str) -> Option<u32> {
    let mut remainder = 0u32;
    for c in value.chars() {
        let digit = c.to_digit(36)?;
        if c.is_ascii_lowercase() {
            return None;
        }
        remainder = if digit < 10 {
            (remainder * 10 + digit) % 97
        } else {
            (remainder * 100 + digit) % 97
        };
    }
    Some(remainder)
}

/// Moves the first four characters to the end and checks mod 97 == 1.
fn has_valid_mod97_checksum(value: &str) -> bool {
    if value.len() < 5 || !value.is_ascii() {
        return false;
    }
    let rearranged = format!("{}{}", &value[4..], &value[..4]);
    mod97(&rearranged) == Some(1)
}

/// Recursive mod 10 carry; a complete reference ends with carry 0.
fn mod10_carry(digits: &str) -> Option<u32> {
    let mut carry = 0u32;
    for c in digits.chars() {
        let digit = c.to_digit(10)?;
        carry = MOD10_TABLE[((carry + digit) % 10) as usize];
    }
    Some(carry)
}

pub fn is_valid_iban(iban: &str) -> bool {
    let iban = whitespace_removed_and_upper_case(iban);
    let len = iban.len();
    if !(5..=34).contains(&len) || !iban.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let bytes = iban.as_bytes();
    if !bytes[0].is_ascii_uppercase()
        || !bytes[1].is_ascii_uppercase()
        || !bytes[2].is_ascii_digit()
        || !bytes[3].is_ascii_digit()
    {
        return false;
    }

    has_valid_mod97_checksum(&iban)
}

/// Swiss or Liechtenstein IBAN with an institution id in the QR-IID range 30000–31999.
pub fn is_qr_iban(iban: &str) -> bool {
    let iban = whitespace_removed_and_upper_case(iban);
    if !(iban.starts_with("CH") || iban.starts_with("LI")) || !is_valid_iban(&iban) {
        return false;
    }
    iban.get(4..9)
        .and_then(|iid| iid.parse::<u32>().ok())
        .is_some_and(|iid| (30000..=31999).contains(&iid))
}

pub fn is_valid_qr_reference(reference: &str) -> bool {
    let reference = whitespace_removed(reference);
    reference.len() == 27
        && reference.chars().all(|c| c.is_ascii_digit())
        && mod10_carry(&reference) == Some(0)
}

pub fn is_valid_iso_reference(reference: &str) -> bool {
    let reference = whitespace_removed_and_upper_case(reference);
    ISO_REFERENCE_PATTERN.is_match(&reference) && has_valid_mod97_checksum(&reference)
}

/// Creates a QR reference from a numeric customer reference of up to 26 digits.
/// Returns `None` if the input is not numeric or too long.
pub fn create_qr_reference(customer_reference: &str) -> Option<String> {
    let cleaned = whitespace_removed(customer_reference);
    if cleaned.is_empty() || cleaned.len() > 26 || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let padded = format!("{:0>26}", cleaned);
    let carry = mod10_carry(&padded)?;
    let check_digit = (10 - carry) % 10;
    Some(format!("{}{}", padded, check_digit))
}

/// Creates an ISO 11649 creditor reference (`RF` + check digits) from up to
/// 21 alphanumeric characters. Returns `None` for invalid input.
pub fn create_iso_reference(raw_reference: &str) -> Option<String> {
    let cleaned = whitespace_removed_and_upper_case(raw_reference);
    if cleaned.is_empty() || cleaned.len() > 21 || !cleaned.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let remainder = mod97(&format!("{}RF00", cleaned))?;
    Some(format!("RF{:02}{}", 98 - remainder, cleaned))
}
