//! Collaborators at the edge of the wizard
//!
//! - [`OrganizationGateway`]: creates the organization from a finished draft
//! - [`WizardHooks`]: notified when the wizard is left or completed
//! - [`InMemoryGateway`]: stand-in backend that keeps records in memory

use crate::config::GatewayConfig;
use crate::draft::OrganizationDraft;
use crate::error::SubmissionError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A created organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    /// Backend-assigned identifier
    pub id: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// The submitted draft
    pub organization: OrganizationDraft,
}

/// Backend that turns a finished draft into an organization
#[async_trait]
pub trait OrganizationGateway: Send + Sync {
    /// Create the organization
    ///
    /// # Errors
    /// [`SubmissionError`] when the backend rejects or cannot be reached
    async fn create_organization(
        &self,
        draft: &OrganizationDraft,
    ) -> Result<OrganizationRecord, SubmissionError>;
}

/// Callbacks fired when a session ends
pub trait WizardHooks: Send + Sync {
    /// Back pressed on the first step
    fn on_exit(&self) {}

    /// Organization created
    fn on_complete(&self, _record: &OrganizationRecord) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl WizardHooks for NoopHooks {}

/// In-memory organization backend
#[derive(Debug)]
pub struct InMemoryGateway {
    delay: Duration,
    id_prefix: String,
    records: Mutex<Vec<OrganizationRecord>>,
}

impl InMemoryGateway {
    /// Gateway answering immediately with `pvt-` ids
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&GatewayConfig {
            delay_ms: 0,
            ..GatewayConfig::default()
        })
    }

    /// Gateway with configured latency and id prefix
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            delay: config.delay(),
            id_prefix: config.id_prefix.clone(),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Organizations created so far
    pub async fn records(&self) -> Vec<OrganizationRecord> {
        self.records.lock().await.clone()
    }

    /// Number of organizations created so far
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// True when nothing was created yet
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrganizationGateway for InMemoryGateway {
    async fn create_organization(
        &self,
        draft: &OrganizationDraft,
    ) -> Result<OrganizationRecord, SubmissionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.organization.name == draft.name) {
            return Err(SubmissionError::Rejected(format!(
                "organization '{}' already exists",
                draft.name
            )));
        }

        let record = OrganizationRecord {
            id: format!("{}-{}", self.id_prefix, Uuid::new_v4().simple()),
            created_at: Utc::now(),
            organization: draft.clone(),
        };
        tracing::info!(id = %record.id, name = %draft.name, "organization created");
        records.push(record.clone());
        Ok(record)
    }
}
