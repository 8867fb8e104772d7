//! Email address value object.

use serde::{Deserialize, Serialize};

use lms_core::{DomainError, DomainResult};

/// Maximum stored length of an email address (column width).
pub const MAX_EMAIL_LEN: usize = 100;

/// A syntactically plausible email address.
///
/// Validation is structural only: one `@`, a non-empty local part, and a
/// dotted domain without empty labels. Deliverability is not checked.
///
/// Addresses are stored lowercased, so lookups and uniqueness are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let value = raw.trim().to_lowercase();

        if value.is_empty() {
            return Err(DomainError::validation("email must not be empty"));
        }
        if value.chars().count() > MAX_EMAIL_LEN {
            return Err(DomainError::validation(format!(
                "email must be at most {MAX_EMAIL_LEN} characters"
            )));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("email must not contain whitespace"));
        }

        let (local, domain) = value
            .split_once('@')
            .ok_or_else(|| DomainError::validation("email must contain '@'"))?;

        if local.is_empty() || domain.contains('@') {
            return Err(DomainError::validation("email is not a valid address"));
        }
        if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            return Err(DomainError::validation("email domain is not valid"));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_ordinary_addresses() {
        let email = Email::parse("  ada@example.com ").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn addresses_are_lowercased() {
        let email = Email::parse("Ada@EXAMPLE.COM").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
        assert_eq!(email, Email::parse("ada@example.com").unwrap());
    }

    #[test]
    fn length_cap_counts_characters() {
        let local = "é".repeat(MAX_EMAIL_LEN - "@example.com".len());
        let raw = format!("{local}@example.com");
        assert!(raw.len() > MAX_EMAIL_LEN);
        assert!(Email::parse(&raw).is_ok());
    }

    #[test]
    fn rejects_structurally_broken_addresses() {
        for raw in ["", "ada", "@example.com", "ada@", "ada@example", "ada@@example.com", "a da@x.io", "ada@example..com"] {
            assert!(Email::parse(raw).is_err(), "expected '{raw}' to be rejected");
        }
    }

    #[test]
    fn rejects_overlong_addresses() {
        let raw = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
        assert!(Email::parse(&raw).is_err());
    }

    proptest! {
        /// Property: anything of the shape `local@label.tld` within the length cap parses
        /// and round-trips unchanged.
        #[test]
        fn well_formed_addresses_round_trip(
            local in "[a-z0-9._+-]{1,30}",
            label in "[a-z0-9-]{1,20}",
            tld in "[a-z]{2,6}"
        ) {
            let raw = format!("{local}@{label}.{tld}");
            let email = Email::parse(&raw).unwrap();
            prop_assert_eq!(email.as_str(), raw.as_str());
        }
    }
}
