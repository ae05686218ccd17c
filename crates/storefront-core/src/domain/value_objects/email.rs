//! Account email address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::ValidateEmail;

/// Why an address was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Enter a valid email address.")]
    Empty,
    #[error("Enter a valid email address: {0}")]
    Malformed(String),
}

/// Normalized address: surrounding whitespace removed, lowercased.
///
/// Accounts log in with it, so two spellings of one mailbox must compare
/// equal. The position of the `@` is kept to split local part and domain
/// without rescanning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email {
    address: String,
    at: usize,
}

impl Email {
    /// Normalizes and validates an address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailError> {
        let address = raw.as_ref().trim().to_lowercase();
        if address.is_empty() {
            return Err(EmailError::Empty);
        }
        if !address.validate_email() {
            return Err(EmailError::Malformed(address));
        }
        match address.rfind('@') {
            Some(at) => Ok(Self { address, at }),
            None => Err(EmailError::Malformed(address)),
        }
    }

    /// Rebuilds an address loaded from storage, where it was validated on write.
    #[must_use]
    pub fn new_unchecked(raw: impl AsRef<str>) -> Self {
        let address = raw.as_ref().trim().to_lowercase();
        let at = address.rfind('@').unwrap_or(address.len());
        Self { address, at }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Mailbox name before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        &self.address[..self.at]
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        self.address.get(self.at + 1..).unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_on_construction() {
        let email = Email::new("  Buyer@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "buyer@example.com");
        assert_eq!(email.local_part(), "buyer");
        assert_eq!(email.domain(), "example.com");
        assert_eq!(email, "buyer@example.com".parse().unwrap());
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Email::new("   "), Err(EmailError::Empty));
        assert!(matches!(Email::new("invalid"), Err(EmailError::Malformed(_))));
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("test@").is_err());
    }

    #[test]
    fn test_stored_value_round_trips_through_serde() {
        let email: Email = serde_json::from_str("\"A@B.io\"").unwrap();
        assert_eq!(email.as_str(), "a@b.io");
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"a@b.io\"");
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }
}
