//! Append-only record of what happened in a session

use crate::progression::Cursor;
use chrono::{DateTime, Utc};
use kyc_catalog::{JourneyKind, ValidationApiKind};
use serde::{Deserialize, Serialize};

/// What the user did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum Action {
    /// Next pressed
    Next,
    /// Back pressed
    Back,
    /// Journey switched on or off
    ToggleJourney(JourneyKind),
    /// Validation API switched on or off
    ToggleValidationApi(ValidationApiKind),
    /// Any other form edit, labelled by the caller
    Edit(String),
}

/// What came of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Cursor moved (or stayed) without errors
    Moved,
    /// Validation failed on these fields
    Blocked {
        /// Failing fields in check order
        fields: Vec<String>,
    },
    /// Substep pulled back after the sub-screen list shrank
    Clamped,
    /// Organization created
    Submitted {
        /// Backend id
        id: String,
    },
    /// Organization creation failed
    SubmissionFailed {
        /// Gateway error text
        reason: String,
    },
    /// Wizard left from the first step
    Exited,
}

/// One journal line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal, from 0
    pub seq: u64,
    /// When it was recorded
    pub timestamp: DateTime<Utc>,
    /// What the user did
    pub action: Action,
    /// Cursor before the action
    pub before: Cursor,
    /// Cursor after the action
    pub after: Cursor,
    /// Result
    pub outcome: Outcome,
}

/// Session journal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionJournal {
    entries: Vec<JournalEntry>,
}

impl SessionJournal {
    /// Empty journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry and return its sequence number
    pub fn append(&mut self, action: Action, before: Cursor, after: Cursor, outcome: Outcome) -> u64 {
        let seq = self.entries.len() as u64;
        tracing::trace!(seq, ?action, %before, %after, ?outcome, "journal entry");
        self.entries.push(JournalEntry {
            seq,
            timestamp: Utc::now(),
            action,
            before,
            after,
            outcome,
        });
        seq
    }

    /// All entries, oldest first
    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
