//! Scripted wizard runs
//!
//! A script is a YAML list of user actions replayed against an
//! [`OnboardingSession`]:
//!
//! ```yaml
//! demo_defaults: true
//! steps:
//!   - action: next
//!   - action: toggle_validation_api
//!     api: eid_validation
//!   - action: set_text
//!     field: city
//!     value: Abu Dhabi
//!   - action: next
//! ```
//!
//! Validation failures, rejected edits and failed submissions are recorded
//! in the report and the replay continues. Acting on a session that has
//! already ended stops it.

use crate::error::ConsoleError;
use kyc_catalog::{
    Channel, DocumentType, InputMethod, JourneyKind, ProcessingMode, ValidationApiKind,
    VerificationMethod,
};
use kyc_onboarding::{
    Advance, Cursor, FieldErrors, InMemoryGateway, JournalEntry, NoopHooks, OnboardingConfig,
    OnboardingSession, OrganizationDraft, OrganizationRecord, PricingUpdate, Retreat,
    SessionError, SessionStatus, StoreError, TextField, ValidationApiParam,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// A replayable sequence of wizard actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Overrides the configured choice between demo and blank form
    pub demo_defaults: Option<bool>,
    /// Actions in order
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Parse from YAML
    ///
    /// # Errors
    /// [`ConsoleError::Script`] on malformed YAML or unknown actions
    pub fn from_yaml_str(input: &str) -> Result<Self, ConsoleError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    /// [`ConsoleError::Io`] if unreadable, otherwise as [`Self::from_yaml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConsoleError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConsoleError::io(path, e))?;
        Self::from_yaml_str(&raw)
    }
}

/// One user action
///
/// Edit variants mirror the [`kyc_onboarding::FormStore`] setter of the same
/// name.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    Next,
    Back,
    ToggleJourney {
        journey: JourneyKind,
    },
    ToggleValidationApi {
        api: ValidationApiKind,
    },
    SetText {
        field: TextField,
        value: String,
    },
    SetPhone {
        field: TextField,
        value: String,
    },
    SetRootUserSameAsContact {
        same: bool,
    },
    SetInitialCredits {
        credits: i64,
    },
    ToggleChannel {
        journey: JourneyKind,
        channel: Channel,
    },
    ToggleDocument {
        journey: JourneyKind,
        document: DocumentType,
    },
    SetDocumentInputMethod {
        journey: JourneyKind,
        document: DocumentType,
        method: InputMethod,
    },
    ToggleVerificationMethod {
        journey: JourneyKind,
        method: VerificationMethod,
    },
    ToggleResponseField {
        journey: JourneyKind,
        category: String,
        field: String,
    },
    SetAllFieldsInCategory {
        journey: JourneyKind,
        category: String,
        select_all: bool,
    },
    SetWebhookUrl {
        journey: JourneyKind,
        url: String,
    },
    SetPricing {
        key: String,
        update: PricingUpdate,
    },
    SetOrgConfig {
        key: String,
        on: bool,
    },
    ToggleService {
        service: String,
    },
    SetCategoryServices {
        category: String,
        enable: bool,
    },
    ToggleProcessingMode {
        api: ValidationApiKind,
        mode: ProcessingMode,
    },
    SetValidationApiParam {
        api: ValidationApiKind,
        param: ValidationApiParam,
    },
}

impl ScriptStep {
    /// Journal label for edits
    fn label(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Back => "back",
            Self::ToggleJourney { .. } => "toggle_journey",
            Self::ToggleValidationApi { .. } => "toggle_validation_api",
            Self::SetText { .. } => "set_text",
            Self::SetPhone { .. } => "set_phone",
            Self::SetRootUserSameAsContact { .. } => "set_root_user_same_as_contact",
            Self::SetInitialCredits { .. } => "set_initial_credits",
            Self::ToggleChannel { .. } => "toggle_channel",
            Self::ToggleDocument { .. } => "toggle_document",
            Self::SetDocumentInputMethod { .. } => "set_document_input_method",
            Self::ToggleVerificationMethod { .. } => "toggle_verification_method",
            Self::ToggleResponseField { .. } => "toggle_response_field",
            Self::SetAllFieldsInCategory { .. } => "set_all_fields_in_category",
            Self::SetWebhookUrl { .. } => "set_webhook_url",
            Self::SetPricing { .. } => "set_pricing",
            Self::SetOrgConfig { .. } => "set_org_config",
            Self::ToggleService { .. } => "toggle_service",
            Self::SetCategoryServices { .. } => "set_category_services",
            Self::ToggleProcessingMode { .. } => "toggle_processing_mode",
            Self::SetValidationApiParam { .. } => "set_validation_api_param",
        }
    }
}

/// What one script step did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepResult {
    /// Cursor moved
    Moved,
    /// Validation failed
    Blocked {
        /// Failing fields and messages
        errors: FieldErrors,
    },
    /// Form edited
    Edited,
    /// Edit refused by the store
    Rejected {
        /// Store error text
        reason: String,
    },
    /// Submission failed; the session stays on step 4
    SubmissionFailed {
        /// Gateway error text
        reason: String,
    },
    /// Organization created
    Completed {
        /// Backend id
        id: String,
    },
    /// Wizard left
    Exited,
}

/// Per-step line of a replay report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// Zero-based script position
    pub index: usize,
    /// Action name
    pub action: &'static str,
    /// Cursor once the step ran
    pub cursor: Cursor,
    /// Result
    pub result: StepResult,
}

/// Outcome of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Every step in order
    pub steps: Vec<StepReport>,
    /// Final cursor
    pub cursor: Cursor,
    /// Final session state
    pub status: SessionStatus,
    /// Final progress in whole percent
    pub progress: u8,
    /// Errors still shown on the form
    pub errors: FieldErrors,
    /// Created organization, if the run completed
    pub record: Option<OrganizationRecord>,
    /// Draft as the run left it
    pub draft: OrganizationDraft,
    /// Session journal
    pub journal: Vec<JournalEntry>,
}

impl ReplayReport {
    /// Whether the organization was created
    #[must_use]
    pub fn completed(&self) -> bool {
        self.record.is_some()
    }

    /// Human-readable summary
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Onboarding Replay ===\n\n");
        for step in &self.steps {
            let result = match &step.result {
                StepResult::Moved => "moved".to_string(),
                StepResult::Edited => "edited".to_string(),
                StepResult::Exited => "exited".to_string(),
                StepResult::Blocked { errors } => format!("blocked ({errors})"),
                StepResult::Rejected { reason } => format!("rejected ({reason})"),
                StepResult::SubmissionFailed { reason } => format!("submission failed ({reason})"),
                StepResult::Completed { id } => format!("completed ({id})"),
            };
            report.push_str(&format!(
                "{:>3}. {:<30} {} {}\n",
                step.index + 1,
                step.action,
                step.cursor,
                result
            ));
        }

        report.push_str(&format!("\nFinal cursor: {}\n", self.cursor));
        report.push_str(&format!("Progress: {}%\n", self.progress));
        if !self.errors.is_empty() {
            report.push_str("\n=== Open Errors ===\n");
            for (field, message) in self.errors.iter() {
                report.push_str(&format!("{field}: {message}\n"));
            }
        }
        match &self.record {
            Some(record) => report.push_str(&format!("\n=== Result: CREATED {} ===\n", record.id)),
            None => report.push_str(&format!("\n=== Result: {:?} ===\n", self.status)),
        }

        report
    }
}

/// Replay `script` against `session`
///
/// # Errors
/// [`ConsoleError::Session`] when a step acts on an ended session
pub async fn replay(
    script: &Script,
    session: &mut OnboardingSession,
) -> Result<Vec<StepReport>, ConsoleError> {
    let mut steps = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        let result = match run_step(step, session).await {
            Ok(result) => result,
            Err(SessionError::Submission(e)) => StepResult::SubmissionFailed {
                reason: e.to_string(),
            },
            Err(source) => {
                tracing::error!(index, action = step.label(), error = %source, "replay stopped");
                return Err(ConsoleError::Session { index, source });
            }
        };
        tracing::debug!(index, action = step.label(), ?result, "script step");
        steps.push(StepReport {
            index,
            action: step.label(),
            cursor: session.cursor(),
            result,
        });
    }

    Ok(steps)
}

/// Build a session from `config`, replay `script` on it and report
///
/// # Errors
/// As [`replay`], plus [`ConsoleError::Config`] for invalid rules
pub async fn run_script(
    script: &Script,
    config: &OnboardingConfig,
) -> Result<ReplayReport, ConsoleError> {
    let mut config = config.clone();
    if let Some(demo) = script.demo_defaults {
        config.demo_defaults = demo;
    }

    let gateway = Arc::new(InMemoryGateway::from_config(&config.gateway));
    let mut session = OnboardingSession::new(&config, gateway.clone(), Arc::new(NoopHooks))?;
    let steps = replay(script, &mut session).await?;
    let record = gateway.records().await.into_iter().last();

    Ok(ReplayReport {
        steps,
        cursor: session.cursor(),
        status: session.status(),
        progress: session.progress(),
        errors: session.errors().clone(),
        record,
        journal: session.journal().entries().to_vec(),
        draft: session.into_draft(),
    })
}

async fn run_step(step: &ScriptStep, session: &mut OnboardingSession) -> Result<StepResult, SessionError> {
    let label = step.label();
    let edited = |r: Result<(), StoreError>| match r {
        Ok(()) => StepResult::Edited,
        Err(e) => StepResult::Rejected {
            reason: e.to_string(),
        },
    };

    let result = match step {
        ScriptStep::Next => match session.next().await? {
            Advance::Moved(_) => StepResult::Moved,
            Advance::Blocked(errors) => StepResult::Blocked { errors },
            Advance::Completed(record) => StepResult::Completed { id: record.id },
        },
        ScriptStep::Back => match session.back()? {
            Retreat::Moved(_) => StepResult::Moved,
            Retreat::Exited => StepResult::Exited,
        },
        ScriptStep::ToggleJourney { journey } => {
            session.toggle_journey(*journey)?;
            StepResult::Edited
        }
        ScriptStep::ToggleValidationApi { api } => {
            session.toggle_validation_api(*api)?;
            StepResult::Edited
        }
        ScriptStep::SetText { field, value } => {
            session.edit(label, |s| s.set_text(*field, value.clone()))?;
            StepResult::Edited
        }
        ScriptStep::SetPhone { field, value } => {
            session.set_phone(*field, value)?;
            StepResult::Edited
        }
        ScriptStep::SetRootUserSameAsContact { same } => {
            session.edit(label, |s| s.set_root_user_same_as_contact(*same))?;
            StepResult::Edited
        }
        ScriptStep::SetInitialCredits { credits } => {
            session.edit(label, |s| s.set_initial_credits(*credits))?;
            StepResult::Edited
        }
        ScriptStep::ToggleChannel { journey, channel } => {
            edited(session.edit(label, |s| s.toggle_channel(*journey, *channel).map(drop))?)
        }
        ScriptStep::ToggleDocument { journey, document } => {
            edited(session.edit(label, |s| s.toggle_document(*journey, *document).map(drop))?)
        }
        ScriptStep::SetDocumentInputMethod {
            journey,
            document,
            method,
        } => edited(session.edit(label, |s| {
            s.set_document_input_method(*journey, *document, *method)
        })?),
        ScriptStep::ToggleVerificationMethod { journey, method } => edited(session.edit(label, |s| {
            s.toggle_verification_method(*journey, *method).map(drop)
        })?),
        ScriptStep::ToggleResponseField {
            journey,
            category,
            field,
        } => edited(session.edit(label, |s| {
            s.toggle_response_field(*journey, category, field).map(drop)
        })?),
        ScriptStep::SetAllFieldsInCategory {
            journey,
            category,
            select_all,
        } => edited(session.edit(label, |s| {
            s.set_all_fields_in_category(*journey, category, *select_all)
        })?),
        ScriptStep::SetWebhookUrl { journey, url } => {
            edited(session.edit(label, |s| s.set_webhook_url(*journey, url.clone()))?)
        }
        ScriptStep::SetPricing { key, update } => {
            edited(session.edit(label, |s| s.set_pricing(key, *update))?)
        }
        ScriptStep::SetOrgConfig { key, on } => {
            session.edit(label, |s| s.set_org_config(key.clone(), *on))?;
            StepResult::Edited
        }
        ScriptStep::ToggleService { service } => {
            session.edit(label, |s| s.toggle_service(service))?;
            StepResult::Edited
        }
        ScriptStep::SetCategoryServices { category, enable } => {
            edited(session.edit(label, |s| s.set_category_services(category, *enable))?)
        }
        ScriptStep::ToggleProcessingMode { api, mode } => {
            session.edit(label, |s| s.toggle_processing_mode(*api, *mode))?;
            StepResult::Edited
        }
        ScriptStep::SetValidationApiParam { api, param } => {
            session.edit(label, |s| s.set_validation_api_param(*api, *param))?;
            StepResult::Edited
        }
    };
    Ok(result)
}
