//! Error types for generation and submission.

use crate::recovery::RecoveryError;
use crate::validator::ValidationErrors;
use autoagents_llm::error::LLMError;
use mockview_protocol::{Notification, RecordId};
use mockview_store::StoreError;
use thiserror::Error;

/// Title of the notification shown for any failed submission.
pub const FAILURE_TITLE: &str = "Error..";
/// Description of the notification shown for any failed submission.
pub const FAILURE_DESCRIPTION: &str = "Something went wrong. Please try again later";

/// Errors returned by the question generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Generative service call failed.
    #[error("llm error: {0}")]
    Llm(#[from] LLMError),
    /// The service answered without any text.
    #[error("llm response contained no text")]
    MissingText,
    /// Response text could not be recovered into question/answer pairs.
    #[error("recovery error: {0}")]
    Recovery(#[from] RecoveryError),
    /// Recovery produced an empty list.
    #[error("llm response contained no questions")]
    EmptyResponse,
}

/// Errors returned by a form submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Draft failed validation; nothing was generated or written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// Question generation failed; nothing was written.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Create requires a signed-in user.
    #[error("no user identity available")]
    IdentityMissing,
    /// Update target has no record id.
    #[error("record being edited has no id")]
    MissingRecordId,
    /// A store write failed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
    /// The record was allocated but stamping its id failed; the document
    /// exists under `key` without `id`/`updatedAt`.
    #[error("failed to stamp id on record {key}: {source}")]
    IdStamp { key: RecordId, source: StoreError },
    /// Another submission on this form is still running.
    #[error("a submission is already in progress")]
    SubmissionInFlight,
}

impl SubmitError {
    /// Notification surfaced to the user, if any. Validation failures are
    /// shown per field instead, and refused double submits are silent.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            SubmitError::Validation(_) | SubmitError::SubmissionInFlight => None,
            _ => Some(Notification::error(FAILURE_TITLE, FAILURE_DESCRIPTION)),
        }
    }
}
