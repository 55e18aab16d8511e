//! Identifier types for the user registry.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque caller identity issued by the external identity provider.
///
/// Principals are treated as validated text: the registry never inspects
/// their structure beyond the well-formedness checks applied here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Longest principal text accepted for storage.
    const MAX_LEN: usize = 63;

    /// Creates a validated principal.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidPrincipal`] when the value is
    /// empty after trimming, contains whitespace, or exceeds the storage
    /// length bound.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let is_valid = !normalized.is_empty()
            && normalized.len() <= Self::MAX_LEN
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(RegistryDomainError::InvalidPrincipal(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the principal as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
