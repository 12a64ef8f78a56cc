//! Private-organization onboarding
//!
//! Collects a private organization's details through a four-step wizard and
//! hands the finished draft to an organization backend.
//!
//! # Architecture
//!
//! ```text
//! OnboardingSession
//! ├── FormStore ─────── OrganizationDraft + FieldErrors
//! ├── Cursor ────────── (step, sub_step), moved by progression::{forward, backward}
//! ├── Validator ─────── per-step checks from ValidationRules
//! ├── OrganizationGateway (async) ── creates the organization on step 4
//! ├── WizardHooks ───── on_exit / on_complete
//! └── SessionJournal ── every action with cursor before/after
//! ```
//!
//! # Example
//!
//! ```rust
//! use kyc_onboarding::prelude::*;
//! use std::sync::Arc;
//!
//! let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! rt.block_on(async {
//!     let mut session = OnboardingSession::new(
//!         &OnboardingConfig::default(),
//!         Arc::new(InMemoryGateway::new()),
//!         Arc::new(NoopHooks),
//!     )
//!     .unwrap();
//!
//!     // demo organization passes step 1
//!     let advance = session.next().await.unwrap();
//!     assert_eq!(advance, Advance::Moved(Cursor::new(Step::ModuleConfiguration, 0)));
//!     assert_eq!(session.config_count(), 1);
//! });
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod journal;
pub mod progression;
pub mod session;
pub mod store;
pub mod validator;

// Re-exports
pub use config::{GatewayConfig, OnboardingConfig, ValidationRules};
pub use draft::{
    DocumentRule, JourneyConfig, JourneyConfigId, OrganizationDraft, PricingEntry,
    ResponseTemplate, ValidationApiConfig, VALIDATION_PRICING_KEY,
};
pub use error::{ConfigError, FieldErrors, SessionError, StoreError, SubmissionError};
pub use gateway::{InMemoryGateway, NoopHooks, OrganizationGateway, OrganizationRecord, WizardHooks};
pub use journal::{Action, JournalEntry, Outcome, SessionJournal};
pub use progression::{
    backward, clamp, config_count, config_targets, current_target, forward, progress_percent,
    step_status, substep_groups, Backward, ConfigTarget, Cursor, Forward, Step, StepStatus,
    SubStepGroup,
};
pub use session::{Advance, OnboardingSession, Retreat, SessionStatus};
pub use store::{format_phone, FormStore, PricingUpdate, TextField, ValidationApiParam, SERVICES_FIELD};
pub use validator::{is_valid_email, Validator};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a session
    pub use crate::{
        Advance, Cursor, FieldErrors, FormStore, InMemoryGateway, NoopHooks, OnboardingConfig,
        OnboardingSession, OrganizationDraft, OrganizationGateway, Retreat, SessionError,
        SessionStatus, Step, TextField, Validator, WizardHooks,
    };
    pub use kyc_catalog::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
