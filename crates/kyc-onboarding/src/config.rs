//! Onboarding configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file yields the
//! standard UAE onboarding rules.
//!
//! ```toml
//! demo_defaults = true
//!
//! [validation]
//! phone_country_code = "+971"
//! phone_digits = 9
//!
//! [gateway]
//! delay_ms = 1000
//! id_prefix = "pvt"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level onboarding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingConfig {
    /// Field validation rules
    pub validation: ValidationRules,
    /// Mount the wizard with the demo organization instead of a blank form
    pub demo_defaults: bool,
    /// In-memory gateway behaviour
    pub gateway: GatewayConfig,
}

impl OnboardingConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML or mistyped fields
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        tracing::debug!(demo_defaults = config.demo_defaults, "parsed onboarding config");
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "loading onboarding config");
        Self::from_toml_str(&raw)
    }

    /// With demo defaults switched on or off
    #[inline]
    #[must_use]
    pub fn with_demo_defaults(mut self, demo: bool) -> Self {
        self.demo_defaults = demo;
        self
    }

    /// With a gateway delay
    #[inline]
    #[must_use]
    pub fn with_gateway_delay(mut self, delay: Duration) -> Self {
        self.gateway.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            validation: ValidationRules::default(),
            demo_defaults: true,
            gateway: GatewayConfig::default(),
        }
    }
}

/// Organization-details validation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Minimum organization name length in characters
    pub name_min_length: usize,
    /// Required phone prefix
    pub phone_country_code: String,
    /// Exact number of digits after the prefix
    pub phone_digits: usize,
    /// Minimum root password length in characters
    pub password_min_length: usize,
    /// Accepted password symbols; at least one is required
    pub password_symbols: String,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            name_min_length: 2,
            phone_country_code: "+971".to_string(),
            phone_digits: 9,
            password_min_length: 8,
            password_symbols: "!@#$%^&*(),.?\":{}|<>".to_string(),
        }
    }
}

/// Behaviour of the in-memory organization gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Simulated round-trip latency
    pub delay_ms: u64,
    /// Prefix of generated organization ids
    pub id_prefix: String,
}

impl GatewayConfig {
    /// Simulated latency as a duration
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            id_prefix: "pvt".to_string(),
        }
    }
}
