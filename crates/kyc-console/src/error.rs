//! Console errors

use kyc_onboarding::{ConfigError, SessionError};

/// Errors loading or replaying a script
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Script is not valid YAML for a [`crate::Script`]
    #[error("invalid script: {0}")]
    Script(#[from] serde_yaml::Error),

    /// Draft is not valid JSON for an organization draft
    #[error("invalid draft: {0}")]
    Draft(#[from] serde_json::Error),

    /// Onboarding configuration failed to load
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Script kept acting on a session that had already ended
    #[error("step {index}: {source}")]
    Session {
        /// Zero-based script step
        index: usize,
        /// Underlying error
        #[source]
        source: SessionError,
    },
}

impl ConsoleError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
