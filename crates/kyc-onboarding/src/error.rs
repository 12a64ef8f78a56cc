//! Error types for onboarding
//!
//! Field validation failures are data, not errors: the validator returns a
//! [`FieldErrors`] map and the session hands it back to the caller. The
//! `thiserror` enums below cover everything else:
//! - Store updates addressing something that does not exist
//! - Submission failures from the organization gateway
//! - Session misuse (acting on a finished session)
//! - Configuration loading

use indexmap::IndexMap;
use kyc_catalog::{CatalogError, JourneyKind};
use serde::{Deserialize, Serialize};

/// Per-field validation messages, in the order the checks ran
///
/// An empty map means the step passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, String>);

impl FieldErrors {
    /// Create an empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failing field, replacing any earlier message for it
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Drop the message for `field`, returning it if present
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.shift_remove(field)
    }

    /// Message recorded for `field`
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` failed
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// True when no field failed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failing field names in check order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(field, message)` pairs in check order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Remove every message
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Form store update errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Journey-scoped update on a journey that is not enabled
    #[error("journey not enabled: {0}")]
    JourneyNotEnabled(JourneyKind),

    /// Identifier rejected by the catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Bulk toggle on a category whose services have their own sub-screens
    #[error("category '{0}' is configured per service and cannot be bulk-toggled")]
    ConfigurableCategory(String),

    /// Pricing entry does not exist
    #[error("no pricing entry for '{0}'")]
    UnknownPricingKey(String),
}

/// Errors from the organization-creation collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// The backend refused the organization
    #[error("organization rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached
    #[error("organization service unavailable: {0}")]
    Unavailable(String),
}

impl SubmissionError {
    /// Whether submitting the same draft again may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Session-level errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Session already completed or exited
    #[error("onboarding session has ended")]
    Ended,

    /// A submission is still awaiting its result
    #[error("organization submission already in flight")]
    SubmissionInFlight,

    /// Submission failed; the draft is kept and the session stays on the last step
    #[error("submission failed: {0}")]
    Submission(#[from] SubmissionError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`crate::OnboardingConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A validation rule does not compile into a pattern
    #[error("invalid validation rule: {0}")]
    InvalidRule(String),
}
