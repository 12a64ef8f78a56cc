//! Onboarding session
//!
//! One [`OnboardingSession`] drives one run of the wizard:
//! - Owns the form store and the `(step, sub_step)` cursor
//! - Validates the current screen before every forward move
//! - Hands the finished draft to the [`OrganizationGateway`] on step 4
//! - Notifies [`WizardHooks`] when the wizard is left or completed
//! - Keeps a [`SessionJournal`] of every action
//!
//! The session is discarded on completion or exit; nothing is persisted
//! unless the gateway accepts the draft.

use crate::config::OnboardingConfig;
use crate::draft::OrganizationDraft;
use crate::error::{ConfigError, FieldErrors, SessionError};
use crate::gateway::{OrganizationGateway, OrganizationRecord, WizardHooks};
use crate::journal::{Action, Outcome, SessionJournal};
use crate::progression::{
    self, backward, clamp, config_count, forward, Backward, ConfigTarget, Cursor, Forward, Step,
    StepStatus, SubStepGroup,
};
use crate::store::{FormStore, TextField};
use crate::validator::Validator;
use kyc_catalog::{JourneyKind, ValidationApiKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepting actions
    Active,
    /// Organization created
    Completed,
    /// Wizard left from the first step
    Exited,
}

/// Result of Next
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Cursor moved to this position
    Moved(Cursor),
    /// Current screen failed validation; cursor unchanged
    Blocked(FieldErrors),
    /// Organization created; the session has ended
    Completed(OrganizationRecord),
}

/// Result of Back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    /// Cursor moved to this position
    Moved(Cursor),
    /// Wizard left; the session has ended
    Exited,
}

/// A single run of the onboarding wizard
pub struct OnboardingSession {
    store: FormStore,
    cursor: Cursor,
    validator: Validator,
    gateway: Arc<dyn OrganizationGateway>,
    hooks: Arc<dyn WizardHooks>,
    status: SessionStatus,
    submitting: bool,
    journal: SessionJournal,
}

impl std::fmt::Debug for OnboardingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingSession")
            .field("cursor", &self.cursor)
            .field("status", &self.status)
            .field("submitting", &self.submitting)
            .field("errors", self.store.errors())
            .field("journal_len", &self.journal.len())
            .finish_non_exhaustive()
    }
}

impl OnboardingSession {
    /// Session mounted as configured: demo organization or blank form
    ///
    /// # Errors
    /// [`ConfigError::InvalidRule`] if the validation rules do not compile
    pub fn new(
        config: &OnboardingConfig,
        gateway: Arc<dyn OrganizationGateway>,
        hooks: Arc<dyn WizardHooks>,
    ) -> Result<Self, ConfigError> {
        let draft = if config.demo_defaults {
            OrganizationDraft::demo()
        } else {
            OrganizationDraft::new()
        };
        let validator = Validator::new(config.validation.clone())?;
        Ok(Self::with_draft(draft, validator, gateway, hooks))
    }

    /// Session over an explicit draft
    #[must_use]
    pub fn with_draft(
        draft: OrganizationDraft,
        validator: Validator,
        gateway: Arc<dyn OrganizationGateway>,
        hooks: Arc<dyn WizardHooks>,
    ) -> Self {
        tracing::info!(organization = %draft.name, "onboarding session started");
        Self {
            store: FormStore::new(draft),
            cursor: Cursor::start(),
            validator,
            gateway,
            hooks,
            status: SessionStatus::Active,
            submitting: false,
            journal: SessionJournal::new(),
        }
    }

    // -- read side -------------------------------------------------------------

    /// Current position
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &OrganizationDraft {
        self.store.draft()
    }

    /// Errors from the last blocked Next, minus fields edited since
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        self.store.errors()
    }

    /// Lifecycle state
    #[inline]
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether a submission is awaiting the gateway
    ///
    /// Stays set if a submitting `next()` future is dropped before it
    /// resolves, since the gateway outcome is then unknown.
    #[inline]
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Everything that happened so far
    #[inline]
    #[must_use]
    pub fn journal(&self) -> &SessionJournal {
        &self.journal
    }

    /// Validator in use
    #[inline]
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// K for the draft as it is now
    #[must_use]
    pub fn config_count(&self) -> usize {
        config_count(self.store.draft())
    }

    /// Configuration sub-screen under the cursor
    #[must_use]
    pub fn current_target(&self) -> Option<ConfigTarget> {
        progression::current_target(self.cursor, self.store.draft())
    }

    /// Completed share of the wizard in whole percent
    #[must_use]
    pub fn progress(&self) -> u8 {
        progression::progress_percent(self.cursor)
    }

    /// Status of every step relative to the cursor
    #[must_use]
    pub fn step_statuses(&self) -> Vec<(Step, StepStatus)> {
        Step::ALL
            .iter()
            .map(|s| (*s, progression::step_status(self.cursor, *s)))
            .collect()
    }

    /// Sidebar grouping of the configuration sub-screens
    #[must_use]
    pub fn substep_groups(&self) -> Vec<SubStepGroup> {
        progression::substep_groups(self.store.draft())
    }

    /// End the session and keep the draft
    #[must_use]
    pub fn into_draft(self) -> OrganizationDraft {
        self.store.into_draft()
    }

    // -- transitions -----------------------------------------------------------

    /// Next: validate the current screen, then move or submit
    ///
    /// # Errors
    /// - [`SessionError::Ended`] after completion or exit
    /// - [`SessionError::SubmissionInFlight`] while a submission is pending
    /// - [`SessionError::Submission`] when the gateway fails; the draft and
    ///   the step-4 cursor are kept so the user can resubmit
    pub async fn next(&mut self) -> Result<Advance, SessionError> {
        self.ensure_accepting()?;
        let before = self.cursor;

        let errors = self.validator.validate(self.store.draft(), before);
        if !errors.is_empty() {
            let fields = errors.fields().map(str::to_string).collect();
            self.store.set_errors(errors.clone());
            self.journal
                .append(Action::Next, before, before, Outcome::Blocked { fields });
            return Ok(Advance::Blocked(errors));
        }
        self.store.clear_errors();

        match forward(before, self.config_count()) {
            Forward::To(after) => {
                self.cursor = after;
                tracing::info!(from = %before, to = %after, "next");
                self.journal.append(Action::Next, before, after, Outcome::Moved);
                Ok(Advance::Moved(after))
            }
            Forward::Submit => self.submit(before).await,
        }
    }

    async fn submit(&mut self, at: Cursor) -> Result<Advance, SessionError> {
        let draft = self.store.draft().clone();
        let gateway = Arc::clone(&self.gateway);

        self.submitting = true;
        tracing::info!(organization = %draft.name, "submitting organization");
        let result = gateway.create_organization(&draft).await;
        self.submitting = false;

        match result {
            Ok(record) => {
                tracing::info!(id = %record.id, "onboarding completed");
                self.status = SessionStatus::Completed;
                self.journal.append(
                    Action::Next,
                    at,
                    at,
                    Outcome::Submitted {
                        id: record.id.clone(),
                    },
                );
                self.hooks.on_complete(&record);
                Ok(Advance::Completed(record))
            }
            Err(e) => {
                tracing::error!(error = %e, retryable = e.is_retryable(), "organization submission failed");
                self.journal.append(
                    Action::Next,
                    at,
                    at,
                    Outcome::SubmissionFailed {
                        reason: e.to_string(),
                    },
                );
                Err(e.into())
            }
        }
    }

    /// Back: step back one screen, or exit from step 1
    ///
    /// # Errors
    /// [`SessionError::Ended`] after completion or exit,
    /// [`SessionError::SubmissionInFlight`] while a submission is pending
    pub fn back(&mut self) -> Result<Retreat, SessionError> {
        self.ensure_accepting()?;
        let before = self.cursor;

        match backward(before, self.config_count()) {
            Backward::To(after) => {
                self.cursor = after;
                self.store.clear_errors();
                tracing::info!(from = %before, to = %after, "back");
                self.journal.append(Action::Back, before, after, Outcome::Moved);
                Ok(Retreat::Moved(after))
            }
            Backward::Exit => {
                tracing::info!("onboarding exited");
                self.status = SessionStatus::Exited;
                self.journal.append(Action::Back, before, before, Outcome::Exited);
                self.hooks.on_exit();
                Ok(Retreat::Exited)
            }
        }
    }

    // -- edits -----------------------------------------------------------------

    /// Switch a journey on or off; returns whether it is now enabled
    ///
    /// # Errors
    /// [`SessionError::Ended`] after completion or exit
    pub fn toggle_journey(&mut self, journey: JourneyKind) -> Result<bool, SessionError> {
        self.apply(Action::ToggleJourney(journey), |store| store.toggle_journey(journey))
    }

    /// Switch a validation API on or off; returns whether it is now enabled
    ///
    /// # Errors
    /// [`SessionError::Ended`] after completion or exit
    pub fn toggle_validation_api(&mut self, api: ValidationApiKind) -> Result<bool, SessionError> {
        self.apply(Action::ToggleValidationApi(api), |store| {
            store.toggle_validation_api(api)
        })
    }

    /// Set a phone field, normalised with the session's phone rule
    ///
    /// # Errors
    /// [`SessionError::Ended`] after completion or exit
    pub fn set_phone(&mut self, field: TextField, raw: &str) -> Result<(), SessionError> {
        let rules = self.validator.rules().clone();
        self.apply(Action::Edit(field.as_str().to_string()), |store| {
            store.set_phone(field, raw, &rules);
        })
    }

    /// Any other form edit, journalled under `label`
    ///
    /// # Errors
    /// [`SessionError::Ended`] after completion or exit
    pub fn edit<R>(
        &mut self,
        label: impl Into<String>,
        f: impl FnOnce(&mut FormStore) -> R,
    ) -> Result<R, SessionError> {
        self.apply(Action::Edit(label.into()), f)
    }

    fn apply<R>(
        &mut self,
        action: Action,
        f: impl FnOnce(&mut FormStore) -> R,
    ) -> Result<R, SessionError> {
        self.ensure_accepting()?;
        let before = self.cursor;
        let out = f(&mut self.store);

        let k = self.config_count();
        let after = clamp(before, k);
        let outcome = if after == before {
            Outcome::Moved
        } else {
            tracing::warn!(from = %before, to = %after, config_count = k, "substep clamped");
            self.cursor = after;
            Outcome::Clamped
        };
        self.journal.append(action, before, after, outcome);
        Ok(out)
    }

    fn ensure_accepting(&self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Active {
            return Err(SessionError::Ended);
        }
        if self.submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        Ok(())
    }
}
