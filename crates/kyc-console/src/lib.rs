//! KYC onboarding console
//!
//! Drives the onboarding wizard without a UI:
//! - `catalog`: print the service catalog
//! - `validate`: check a draft JSON file against one wizard screen
//! - `replay`: run a YAML script of wizard actions and report the outcome

#![warn(missing_docs)]

pub mod error;
pub mod render;
pub mod script;

pub use error::ConsoleError;
pub use render::{catalog_text, errors_text, stepper_line, CatalogDump};
pub use script::{replay, run_script, ReplayReport, Script, ScriptStep, StepReport, StepResult};

use kyc_onboarding::OrganizationDraft;
use std::path::Path;

/// Read an organization draft from a JSON file
///
/// Missing fields take their blank-form defaults.
///
/// # Errors
/// [`ConsoleError::Io`] if unreadable, [`ConsoleError::Draft`] if not a draft
pub fn load_draft(path: impl AsRef<Path>) -> Result<OrganizationDraft, ConsoleError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| ConsoleError::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
