//! Testing utilities for the KYC console workspace
//!
//! Shared fixtures, recording hooks and scripted gateways.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::Utc;
use kyc_catalog::{JourneyKind, ValidationApiKind};
use kyc_onboarding::{
    FormStore, InMemoryGateway, NoopHooks, OnboardingConfig, OnboardingSession,
    OrganizationDraft, OrganizationGateway, OrganizationRecord, SubmissionError, Validator,
    WizardHooks,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Demo draft that passes every step
pub fn valid_draft() -> OrganizationDraft {
    OrganizationDraft::demo()
}

/// Blank draft
pub fn blank_draft() -> OrganizationDraft {
    OrganizationDraft::new()
}

/// Demo details with exactly these services enabled, in this order
pub fn draft_with(journeys: &[JourneyKind], apis: &[ValidationApiKind]) -> OrganizationDraft {
    let mut store = FormStore::new(OrganizationDraft::demo());
    for journey in store.draft().enabled_journeys.clone() {
        store.toggle_journey(journey);
    }
    for journey in journeys {
        store.toggle_journey(*journey);
    }
    for api in apis {
        store.toggle_validation_api(*api);
    }
    store.into_draft()
}

/// Hooks that count their calls
#[derive(Debug, Default)]
pub struct RecordingHooks {
    exits: AtomicUsize,
    completions: Mutex<Vec<OrganizationRecord>>,
}

impl RecordingHooks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn exits(&self) -> usize {
        self.exits.load(Ordering::SeqCst)
    }

    pub fn completions(&self) -> Vec<OrganizationRecord> {
        self.completions.lock().unwrap().clone()
    }
}

impl WizardHooks for RecordingHooks {
    fn on_exit(&self) {
        self.exits.fetch_add(1, Ordering::SeqCst);
    }

    fn on_complete(&self, record: &OrganizationRecord) {
        self.completions.lock().unwrap().push(record.clone());
    }
}

/// Gateway that fails a fixed number of times before succeeding
#[derive(Debug)]
pub struct FlakyGateway {
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl FlakyGateway {
    pub fn failing(times: usize) -> Arc<Self> {
        Arc::new(Self {
            failures_left: AtomicUsize::new(times),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn always_failing() -> Arc<Self> {
        Self::failing(usize::MAX)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrganizationGateway for FlakyGateway {
    async fn create_organization(
        &self,
        draft: &OrganizationDraft,
    ) -> Result<OrganizationRecord, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(SubmissionError::Unavailable("backend offline".to_string()));
        }
        Ok(OrganizationRecord {
            id: format!("pvt-flaky-{}", self.calls()),
            created_at: Utc::now(),
            organization: draft.clone(),
        })
    }
}

/// Session over `draft` with an instant in-memory gateway
pub fn session_with(draft: OrganizationDraft) -> (OnboardingSession, Arc<InMemoryGateway>) {
    let gateway = Arc::new(InMemoryGateway::new());
    let session = OnboardingSession::with_draft(
        draft,
        Validator::default(),
        gateway.clone(),
        Arc::new(NoopHooks),
    );
    (session, gateway)
}

/// Demo session with instant gateway and recording hooks
pub fn setup_session() -> (OnboardingSession, Arc<InMemoryGateway>, Arc<RecordingHooks>) {
    let gateway = Arc::new(InMemoryGateway::new());
    let hooks = RecordingHooks::new();
    let config = OnboardingConfig::default();
    let session = OnboardingSession::new(&config, gateway.clone(), hooks.clone())
        .expect("default config is valid");
    (session, gateway, hooks)
}
