//! Agreement update log
//!
//! Free-text updates attached to an agreement. Entries are append-and-edit:
//! every edit that changes the text pushes the superseded text onto an
//! oldest-first history list, so nothing ever disappears silently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prior text snapshot of an update, kept when the update is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRevision {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// One free-text update on an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementUpdate {
    pub id: Uuid,
    pub text: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Time of the last edit, unset until the first edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Superseded texts, oldest first
    #[serde(default)]
    pub history: Vec<UpdateRevision>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl AgreementUpdate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            timestamp: Utc::now(),
            updated_at: None,
            history: Vec::new(),
            is_deleted: false,
        }
    }

    /// Replace the text, retaining the superseded one.
    ///
    /// A no-op when `new_text` equals the current text: no history entry,
    /// no timestamp change. Otherwise the pre-edit text is pushed onto
    /// history stamped with its own pre-edit time (the last edit time if
    /// the entry was edited before, else the creation time), and
    /// `updated_at` is set to `now`.
    pub fn edit(&mut self, new_text: impl Into<String>, now: DateTime<Utc>) {
        let new_text = new_text.into();
        if new_text == self.text {
            return;
        }

        self.history.push(UpdateRevision {
            text: std::mem::replace(&mut self.text, new_text),
            timestamp: self.updated_at.unwrap_or(self.timestamp),
        });
        self.updated_at = Some(now);
    }
}
