//! Contact form validation and normalization.

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `local@domain.tld`, no whitespace, exactly one `@`.
static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub(crate) const NAME_TOO_SHORT: &str = "Name must be at least 2 characters long";
pub(crate) const INVALID_EMAIL: &str = "Please provide a valid email address";
pub(crate) const SUBJECT_TOO_SHORT: &str = "Subject must be at least 3 characters long";
pub(crate) const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters long";

/// Shown on success.
pub const THANK_YOU: &str = "Thank you for your message! I'll get back to you soon.";

const MIN_NAME: usize = 2;
const MIN_SUBJECT: usize = 3;
const MIN_MESSAGE: usize = 10;

/// Raw form fields as posted. Missing and `null` fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    /// Sender name.
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    /// Reply address.
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    /// Subject line.
    #[serde(deserialize_with = "null_as_empty")]
    pub subject: String,
    /// Message body.
    #[serde(deserialize_with = "null_as_empty")]
    pub message: String,
}

impl ContactSubmission {
    /// Parses a request body.
    ///
    /// Fields are read by name from a JSON object. Any other non-null JSON
    /// value has no named fields and reads as an empty submission.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, a `null` body, or a field that is neither a
    /// string nor `null`.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Null => Err(serde::de::Error::custom("request body is null")),
            object @ Value::Object(_) => serde_json::from_value(object),
            _ => Ok(Self::default()),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A submission that passed every rule, trimmed and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContact {
    /// Trimmed name.
    pub name: String,
    /// Trimmed, lower-cased email.
    pub email: String,
    /// Trimmed subject.
    pub subject: String,
    /// Trimmed message.
    pub message: String,
    /// When the submission was accepted.
    pub submitted_at: DateTime<Utc>,
}

impl ValidatedContact {
    /// `submitted_at` as ISO-8601 UTC with milliseconds, e.g.
    /// `2024-05-01T12:00:00.000Z`.
    #[must_use]
    pub fn submitted_at_iso(&self) -> String {
        self.submitted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Checks every rule and normalizes the fields.
///
/// # Errors
///
/// Returns every failed rule's message, in field order.
pub fn validate(submission: &ContactSubmission) -> Result<ValidatedContact, Vec<String>> {
    validate_at(submission, Utc::now())
}

/// As [`validate`], stamping the result with `now`.
///
/// # Errors
///
/// Returns every failed rule's message, in field order.
pub fn validate_at(
    submission: &ContactSubmission,
    now: DateTime<Utc>,
) -> Result<ValidatedContact, Vec<String>> {
    let name = submission.name.trim();
    let email = submission.email.trim();
    let subject = submission.subject.trim();
    let message = submission.message.trim();

    let mut errors = Vec::new();
    if name.chars().count() < MIN_NAME {
        errors.push(NAME_TOO_SHORT.to_owned());
    }
    if !is_valid_email(email) {
        errors.push(INVALID_EMAIL.to_owned());
    }
    if subject.chars().count() < MIN_SUBJECT {
        errors.push(SUBJECT_TOO_SHORT.to_owned());
    }
    if message.chars().count() < MIN_MESSAGE {
        errors.push(MESSAGE_TOO_SHORT.to_owned());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedContact {
        name: name.to_owned(),
        email: email.to_lowercase(),
        subject: subject.to_owned(),
        message: message.to_owned(),
        submitted_at: now,
    })
}

fn is_valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|pattern| pattern.is_match(email))
}

/// Echo of the accepted fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    /// Trimmed name.
    pub name: String,
    /// Normalized email.
    pub email: String,
    /// ISO-8601 acceptance time.
    pub submitted_at: String,
}

/// Body of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReceipt {
    /// Always true.
    pub success: bool,
    /// Thank-you line.
    pub message: String,
    /// What was accepted.
    pub data: ReceiptData,
}

impl From<&ValidatedContact> for ContactReceipt {
    fn from(contact: &ValidatedContact) -> Self {
        Self {
            success: true,
            message: THANK_YOU.to_owned(),
            data: ReceiptData {
                name: contact.name.clone(),
                email: contact.email.clone(),
                submitted_at: contact.submitted_at_iso(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission(name: &str, email: &str, subject: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    #[test]
    fn test_minimal_valid_submission() {
        let contact = validate(&submission("Al", "a@b.co", "Hi!", "1234567890")).unwrap();
        assert_eq!(contact.name, "Al");
        assert_eq!(contact.email, "a@b.co");
    }

    #[test]
    fn test_fields_are_trimmed_and_email_lowercased() {
        let contact = validate(&submission(
            "  Ada Lovelace ",
            " Ada@Example.ORG\n",
            "\tEngines ",
            "  Let us talk numbers.  ",
        ))
        .unwrap();
        assert_eq!(contact.name, "Ada Lovelace");
        assert_eq!(contact.email, "ada@example.org");
        assert_eq!(contact.subject, "Engines");
        assert_eq!(contact.message, "Let us talk numbers.");
    }

    #[test]
    fn test_every_failure_reported_in_order() {
        let errors = validate(&submission("A", "bad", "", "short")).unwrap_err();
        assert_eq!(
            errors,
            vec![NAME_TOO_SHORT, INVALID_EMAIL, SUBJECT_TOO_SHORT, MESSAGE_TOO_SHORT]
        );
    }

    #[test]
    fn test_whitespace_does_not_count_toward_length() {
        let errors = validate(&submission(" A ", "a@b.co", "  ab  ", "123456789 ")).unwrap_err();
        assert_eq!(errors, vec![NAME_TOO_SHORT, SUBJECT_TOO_SHORT, MESSAGE_TOO_SHORT]);
    }

    #[test]
    fn test_lengths_count_characters() {
        // Two characters, six bytes.
        assert!(validate(&submission("李明", "li@example.cn", "你好吗", "一二三四五六七八九十")).is_ok());
    }

    #[test]
    fn test_email_pattern() {
        for bad in ["", "plain", "a@b", "a b@c.d", "a@@b.c", "@b.co", "a@.co"] {
            let errors = validate(&submission("Al", bad, "Hi!", "1234567890")).unwrap_err();
            assert_eq!(errors, vec![INVALID_EMAIL], "{bad:?} should be rejected");
        }
        for good in ["a@b.co", "first.last+tag@sub.example.io", "x@y.z.w"] {
            assert!(validate(&submission("Al", good, "Hi!", "1234567890")).is_ok());
        }
    }

    #[test]
    fn test_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap();
        let contact = validate_at(&submission("Al", "a@b.co", "Hi!", "1234567890"), now).unwrap();
        assert_eq!(contact.submitted_at_iso(), "2024-05-01T12:30:05.000Z");
    }

    #[test]
    fn test_missing_fields_read_as_empty() {
        let parsed: ContactSubmission = serde_json::from_str(r#"{"name":"Al"}"#).unwrap();
        assert_eq!(parsed.email, "");
        assert_eq!(validate(&parsed).unwrap_err().len(), 3);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let parsed = ContactSubmission::from_json(
            br#"{"name":null,"email":"a@b.co","subject":"Hi!","message":"1234567890"}"#,
        )
        .unwrap();
        assert_eq!(parsed.name, "");
        assert_eq!(validate(&parsed).unwrap_err(), vec![NAME_TOO_SHORT]);
    }

    #[test]
    fn test_fields_are_read_by_name_only() {
        let parsed =
            ContactSubmission::from_json(br#"["Al","a@b.co","Hi!","1234567890"]"#).unwrap();
        assert_eq!(parsed, ContactSubmission::default());
        let parsed = ContactSubmission::from_json(br#""Al""#).unwrap();
        assert_eq!(parsed, ContactSubmission::default());
    }

    #[test]
    fn test_unusable_bodies_fail_to_parse() {
        let bodies: [&[u8]; 4] = [b"null", b"not json", br#"{"name": 42}"#, br#"{"name": "#];
        for body in bodies {
            assert!(ContactSubmission::from_json(body).is_err());
        }
    }
}
