//! Persisted interview records and the write payloads that produce them.

use crate::draft::{DraftInput, InterviewDraft};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of an interview record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identity of the user that owns a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One generated interview question with its reference answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Interview record as stored in the document collection.
///
/// `id` and `updated_at` are absent between the two writes of a create: the
/// allocation write cannot know the key it is about to receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub user_id: UserId,
    pub position: String,
    pub description: String,
    pub experience: u32,
    pub tech_stack: String,
    pub questions: Vec<QaPair>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InterviewRecord {
    /// The draft fields carried by this record.
    pub fn draft(&self) -> InterviewDraft {
        InterviewDraft {
            position: self.position.clone(),
            description: self.description.clone(),
            experience: self.experience,
            tech_stack: self.tech_stack.clone(),
        }
    }

    /// Apply a partial write. Fields absent from the patch are left untouched.
    pub fn apply(&mut self, patch: &RecordPatch, now: DateTime<Utc>) {
        if let Some(id) = &patch.id {
            self.id = Some(id.clone());
        }
        if let Some(user_id) = &patch.user_id {
            self.user_id = user_id.clone();
        }
        if let Some(position) = &patch.position {
            self.position = position.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(experience) = patch.experience {
            self.experience = experience;
        }
        if let Some(tech_stack) = &patch.tech_stack {
            self.tech_stack = tech_stack.clone();
        }
        if let Some(questions) = &patch.questions {
            self.questions = questions.clone();
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = created_at.resolve(now);
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = Some(updated_at.resolve(now));
        }
    }
}

impl From<&InterviewRecord> for DraftInput {
    fn from(record: &InterviewRecord) -> Self {
        DraftInput::from(&record.draft())
    }
}

/// Timestamp value in a write: either the store's clock at commit time or a
/// concrete instant carried over from an earlier read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum TimestampWrite {
    ServerNow,
    At(DateTime<Utc>),
}

impl TimestampWrite {
    /// Resolve against the store clock.
    pub fn resolve(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimestampWrite::ServerNow => now,
            TimestampWrite::At(at) => at,
        }
    }
}

/// Payload of an allocate-with-generated-key write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInterview {
    pub user_id: UserId,
    pub draft: InterviewDraft,
    pub questions: Vec<QaPair>,
    pub created_at: TimestampWrite,
}

impl NewInterview {
    /// Materialize the document written by the allocation.
    pub fn into_record(self, now: DateTime<Utc>) -> InterviewRecord {
        InterviewRecord {
            id: None,
            user_id: self.user_id,
            position: self.draft.position,
            description: self.draft.description,
            experience: self.draft.experience,
            tech_stack: self.draft.tech_stack,
            questions: self.questions,
            created_at: self.created_at.resolve(now),
            updated_at: None,
        }
    }
}

/// Partial update of an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordPatch {
    pub id: Option<RecordId>,
    pub user_id: Option<UserId>,
    pub position: Option<String>,
    pub description: Option<String>,
    pub experience: Option<u32>,
    pub tech_stack: Option<String>,
    pub questions: Option<Vec<QaPair>>,
    pub created_at: Option<TimestampWrite>,
    pub updated_at: Option<TimestampWrite>,
}

impl RecordPatch {
    /// Set every draft field from a validated draft.
    pub fn with_draft(mut self, draft: &InterviewDraft) -> Self {
        self.position = Some(draft.position.clone());
        self.description = Some(draft.description.clone());
        self.experience = Some(draft.experience);
        self.tech_stack = Some(draft.tech_stack.clone());
        self
    }
}

/// A document read back from the store, paired with its external key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredInterview {
    pub key: RecordId,
    pub record: InterviewRecord,
}

impl StoredInterview {
    /// The record with `id` filled from the store key, the shape handed to
    /// an edit form.
    pub fn into_keyed_record(self) -> InterviewRecord {
        InterviewRecord {
            id: Some(self.key),
            ..self.record
        }
    }
}
