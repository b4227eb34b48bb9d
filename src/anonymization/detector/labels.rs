//! Model label mapping
//!
//! Maps the entity labels emitted by the recognizer model onto [`PiiType`].
//! Token-level labels carry a BIO prefix (`B-PERSON`, `I-PERSON`) which is
//! stripped before lookup; labels outside the table map to
//! [`PiiType::Custom`].

use crate::anonymization::models::PiiType;

/// Version of the mapping table, bumped whenever an entry changes
pub const LABEL_TABLE_VERSION: u32 = 1;

/// Model label to PII type table
pub const LABEL_TABLE: &[(&str, PiiType)] = &[
    ("EMAIL_ADDRESS", PiiType::Email),
    ("PHONE_NUMBER", PiiType::Phone),
    ("PERSON", PiiType::Name),
    ("CREDIT_CARD_NUMBER", PiiType::CreditCard),
    ("LOCATION", PiiType::Address),
    ("IP_ADDRESS", PiiType::IpAddress),
    ("SSN", PiiType::Ssn),
    ("DATE_TIME", PiiType::DateOfBirth),
    ("PASSPORT_NUMBER", PiiType::Passport),
];

/// Strip a leading BIO prefix (`B-` or `I-`)
pub fn strip_prefix(label: &str) -> &str {
    label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .unwrap_or(label)
}

/// PII type for a raw model label
pub fn map_label(label: &str) -> PiiType {
    let stripped = strip_prefix(label);
    LABEL_TABLE
        .iter()
        .find(|(tag, _)| *tag == stripped)
        .map(|(_, pii_type)| *pii_type)
        .unwrap_or(PiiType::Custom)
}
