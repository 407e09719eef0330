//! Email address newtype.

use crate::error::{ModelError, ModelResult};
use crate::row::FromValue;
use mbmi_filter::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters never valid in the domain part.
const DOMAIN_REJECT: &[char] = &[
    ' ', ',', '!', '_', '@', '#', '%', '^', '&', '*', '(', ')', '[', ']', '}', '{', '/', '|',
    '\\', '?', '`',
];

/// A mailbox address as stored in `aliases`, `sender_bcc` and friends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(login, domain)`.
    ///
    /// Surrounding spaces are ignored. Exactly one `@` with a non-empty login
    /// and domain is required, and the domain may not contain punctuation
    /// other than `.` and `-`.
    pub fn split(&self) -> ModelResult<(&str, &str)> {
        let address = self.0.trim_matches(' ');
        let invalid = || ModelError::InvalidEmail(self.0.clone());

        let (login, domain) = address.split_once('@').ok_or_else(invalid)?;
        if login.is_empty() || domain.is_empty() || domain.contains(DOMAIN_REJECT) {
            return Err(invalid());
        }
        Ok((login, domain))
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Email {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Email {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&Email> for Value {
    fn from(e: &Email) -> Self {
        Value::Text(e.0.clone())
    }
}

impl FromValue for Email {
    fn from_value(value: &Value) -> Result<Self, String> {
        String::from_value(value).map(Email)
    }
}
