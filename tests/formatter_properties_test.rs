use qrbill_tools::core::payments::whitespace_removed;
use qrbill_tools::{FieldFormatter, ReferenceKind, IBAN_FORMATTER, REFERENCE_FORMATTER};

const IBANS: &[&str] = &[
    "CH4431999123000889012",
    "CH93 0076 2011 6238 5295 7",
    "LI21088100002324013AA",
    "  DE89370400440532013000 ",
    "ch9300762011623852957",
    "",
];

/// 格式化後再解析 IBAN，應得到去除空白的原始值
#[test]
fn test_iban_format_then_parse_returns_whitespace_free_value() {
    for &iban in IBANS {
        let formatted = IBAN_FORMATTER.formatted_value(Some(iban));
        assert_eq!(IBAN_FORMATTER.raw_value(&formatted), whitespace_removed(iban), "{}", iban);
    }
}

#[test]
fn test_numeric_references_are_qr_references() {
    let cases = [
        ("210000000003139471430009017", "21 00000 00003 13947 14300 09017"),
        ("21 00000 00003 13947 14300 09017", "21 00000 00003 13947 14300 09017"),
        ("000000000000000000000012347", "00 00000 00000 00000 00000 12347"),
        ("7", "7"),
    ];
    for (raw, expected) in cases {
        assert_eq!(ReferenceKind::classify(Some(raw)), ReferenceKind::Qr, "{}", raw);
        assert_eq!(REFERENCE_FORMATTER.formatted_value(Some(raw)), expected);
    }
}

#[test]
fn test_rf_references_are_iso_references() {
    let cases = [
        ("RF18539007547034", "RF18 5390 0754 7034"),
        ("rf18 5390 0754 7034", "RF18 5390 0754 7034"),
        ("RF", "RF"),
        ("RFX", "RFX"),
    ];
    for (raw, expected) in cases {
        assert_eq!(ReferenceKind::classify(Some(raw)), ReferenceKind::Iso, "{}", raw);
        assert_eq!(REFERENCE_FORMATTER.formatted_value(Some(raw)), expected);
    }
}

#[test]
fn test_other_references_pass_through_trimmed() {
    for raw in ["Invoice 2020-17", "  12 34a ", "A", "12.50"] {
        assert_eq!(ReferenceKind::classify(Some(raw)), ReferenceKind::Unstructured, "{}", raw);
        assert_eq!(REFERENCE_FORMATTER.formatted_value(Some(raw)), raw.trim());
    }
}

#[test]
fn test_empty_references_format_to_empty_string() {
    assert_eq!(REFERENCE_FORMATTER.formatted_value(None), "");
    assert_eq!(REFERENCE_FORMATTER.formatted_value(Some("")), "");
    assert_eq!(REFERENCE_FORMATTER.formatted_value(Some(" \t ")), "");
}

#[test]
fn test_reference_parse_strips_whitespace() {
    for raw in ["RF18539007547034", "210000000003139471430009017"] {
        let formatted = REFERENCE_FORMATTER.formatted_value(Some(raw));
        assert_eq!(REFERENCE_FORMATTER.raw_value(&formatted), raw);
    }
}
