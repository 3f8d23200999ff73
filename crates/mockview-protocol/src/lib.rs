//! Shared data model for mockview: drafts, question/answer pairs, persisted
//! interview records, store patches, and user-facing notifications.

mod draft;
mod record;

pub use draft::{DraftField, DraftInput, ExperienceInput, InterviewDraft};
pub use record::{
    InterviewRecord, NewInterview, QaPair, RecordId, RecordPatch, StoredInterview, TimestampWrite,
    UserId,
};

use serde::{Deserialize, Serialize};

/// Severity of a transient user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient, non-blocking notification surfaced after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    /// Build a success notification.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Build an error notification.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}
