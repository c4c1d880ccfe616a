//! PII entity detection and masking.
//!
//! Entities are matched with regular expressions in a fixed order. Each match
//! is replaced by `<ENTITY_TYPE>` before the next entity runs, so a span is
//! claimed by at most one entity and masked output never re-matches.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A kind of personally identifiable information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiEntity {
    EmailAddress,
    CreditCard,
    IbanCode,
    UsSsn,
    PhoneNumber,
    IpAddress,
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email pattern")
});

static CREDIT_CARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{4}[ -]?){3}\d{4}\b").expect("valid credit card pattern")
});

static IBAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z]{2}\d{2}(?: ?[A-Z0-9]{4}){2,7}(?: ?[A-Z0-9]{1,3})?\b")
        .expect("valid iban pattern")
});

static US_SSN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("valid ssn pattern"));

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[ .-]?)?(?:\(\d{3}\)|\b\d{3})[ .-]?\d{3}[ .-]?\d{4}\b")
        .expect("valid phone pattern")
});

static IP_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|1?\d?\d)\.){3}(?:25[0-5]|2[0-4]\d|1?\d?\d)\b")
        .expect("valid ip pattern")
});

impl PiiEntity {
    /// Every entity, in detection order.
    ///
    /// IBANs run before credit cards: a spaced IBAN body contains a
    /// card-shaped digit run.
    pub fn all() -> Vec<PiiEntity> {
        vec![
            PiiEntity::EmailAddress,
            PiiEntity::IbanCode,
            PiiEntity::CreditCard,
            PiiEntity::UsSsn,
            PiiEntity::PhoneNumber,
            PiiEntity::IpAddress,
        ]
    }

    /// The entity label used in reports and placeholders.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EmailAddress => "EMAIL_ADDRESS",
            Self::CreditCard => "CREDIT_CARD",
            Self::IbanCode => "IBAN_CODE",
            Self::UsSsn => "US_SSN",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::IpAddress => "IP_ADDRESS",
        }
    }

    /// The text that replaces a detected span.
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.label())
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::EmailAddress => &EMAIL,
            Self::CreditCard => &CREDIT_CARD,
            Self::IbanCode => &IBAN,
            Self::UsSsn => &US_SSN,
            Self::PhoneNumber => &PHONE,
            Self::IpAddress => &IP_ADDRESS,
        }
    }
}

/// Result of scanning a text for PII.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiiScan {
    /// Detected spans grouped by entity label. Only entities with matches appear.
    pub detected: BTreeMap<String, Vec<String>>,
    /// The input with every detected span replaced by its placeholder.
    pub masked_text: String,
}

impl PiiScan {
    /// Returns true if any entity was found.
    pub fn found_any(&self) -> bool {
        !self.detected.is_empty()
    }
}

/// Scans `text` for the requested entities and masks what it finds.
pub fn scan(text: &str, entities: &[PiiEntity]) -> PiiScan {
    let mut detected = BTreeMap::new();
    let mut masked_text = text.to_string();

    for entity in PiiEntity::all() {
        if !entities.contains(&entity) {
            continue;
        }

        let pattern = entity.pattern();
        let matches: Vec<String> = pattern
            .find_iter(&masked_text)
            .map(|m| m.as_str().to_string())
            .collect();

        if matches.is_empty() {
            continue;
        }

        masked_text = pattern
            .replace_all(&masked_text, NoExpand(&entity.placeholder()))
            .into_owned();
        detected.insert(entity.label().to_string(), matches);
    }

    PiiScan {
        detected,
        masked_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn masks_email_address() {
        let result = scan("My email is jane@example.com", &PiiEntity::all());

        assert_eq!(result.masked_text, "My email is <EMAIL_ADDRESS>");
        assert_eq!(result.detected["EMAIL_ADDRESS"], vec!["jane@example.com"]);
    }

    #[test]
    fn masks_several_entities() {
        let result = scan(
            "Call 555-123-4567 or pay with 4111 1111 1111 1111, SSN 123-45-6789",
            &PiiEntity::all(),
        );

        assert!(result.masked_text.contains("<PHONE_NUMBER>"));
        assert!(result.masked_text.contains("<CREDIT_CARD>"));
        assert!(result.masked_text.contains("<US_SSN>"));
        assert!(!result.masked_text.contains("4111"));
        assert_eq!(result.detected.len(), 3);
    }

    #[test]
    fn masks_iban_and_ip() {
        let result = scan(
            "IBAN DE89 3704 0044 0532 0130 00 from 192.168.10.4",
            &PiiEntity::all(),
        );

        assert_eq!(result.masked_text, "IBAN <IBAN_CODE> from <IP_ADDRESS>");
        assert_eq!(
            result.detected["IBAN_CODE"],
            vec!["DE89 3704 0044 0532 0130 00"]
        );
        assert!(!result.detected.contains_key("CREDIT_CARD"));
    }

    #[test]
    fn card_number_next_to_iban_keeps_its_own_label() {
        let result = scan(
            "card 4111 1111 1111 1111 or IBAN GB29 NWBK 6016 1331 9268 19",
            &PiiEntity::all(),
        );

        assert_eq!(result.masked_text, "card <CREDIT_CARD> or IBAN <IBAN_CODE>");
    }

    #[test]
    fn only_requested_entities_are_masked() {
        let result = scan(
            "jane@example.com 555-123-4567",
            &[PiiEntity::PhoneNumber],
        );

        assert!(result.masked_text.contains("jane@example.com"));
        assert!(result.masked_text.contains("<PHONE_NUMBER>"));
        assert!(!result.detected.contains_key("EMAIL_ADDRESS"));
    }

    #[test]
    fn clean_text_is_unchanged() {
        let text = "What are your office locations?";
        let result = scan(text, &PiiEntity::all());

        assert!(!result.found_any());
        assert_eq!(result.masked_text, text);
    }

    #[test]
    fn repeated_matches_are_all_recorded() {
        let result = scan("a@b.io and c@d.io", &[PiiEntity::EmailAddress]);

        assert_eq!(result.detected["EMAIL_ADDRESS"].len(), 2);
        assert_eq!(result.masked_text, "<EMAIL_ADDRESS> and <EMAIL_ADDRESS>");
    }

    #[test]
    fn entity_serializes_as_label() {
        for entity in PiiEntity::all() {
            let json = serde_json::to_string(&entity).unwrap();
            assert_eq!(json, format!("\"{}\"", entity.label()));
        }
    }

    proptest! {
        #[test]
        fn masking_is_idempotent(text in "[a-z0-9@. -]{0,60}") {
            let once = scan(&text, &PiiEntity::all());
            let twice = scan(&once.masked_text, &PiiEntity::all());

            prop_assert_eq!(&twice.masked_text, &once.masked_text);
            prop_assert!(!twice.found_any());
        }
    }
}
