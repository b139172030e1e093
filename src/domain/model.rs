use serde::{Deserialize, Serialize};

/// Payment data of a Swiss QR bill, as exchanged with the bill generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QrBill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creditor: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unstructured_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debtor: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<BillFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Display settings of the payment slip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BillFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphics_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    Fr,
    It,
    Rm,
    En,
}

/// A single postal code suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalCode {
    pub postal_code: String,
    pub town: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_json_uses_camel_case() {
        let json = serde_json::json!({
            "version": "V2_0",
            "amount": 199.95,
            "currency": "CHF",
            "account": "CH4431999123000889012",
            "creditor": {
                "name": "Robert Schneider AG",
                "street": "Rue du Lac",
                "houseNo": "1268",
                "postalCode": "2501",
                "town": "Biel",
                "countryCode": "CH"
            },
            "reference": "210000000003139471430009017",
            "unstructuredMessage": "Abonnement für 2020",
            "format": { "language": "fr", "outputSize": "qr-bill-only" }
        });

        let bill: QrBill = serde_json::from_value(json).unwrap();
        assert_eq!(bill.amount, Some(199.95));
        assert_eq!(
            bill.creditor.as_ref().unwrap().house_no.as_deref(),
            Some("1268")
        );
        assert_eq!(bill.format.as_ref().unwrap().language, Some(Language::Fr));
        assert!(bill.debtor.is_none());

        let back = serde_json::to_value(&bill).unwrap();
        assert_eq!(back["unstructuredMessage"], "Abonnement für 2020");
        assert!(back.get("debtor").is_none());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let json = serde_json::json!({ "currency": "CHF", "iban": "CH93" });
        assert!(serde_json::from_value::<QrBill>(json).is_err());
    }
}
