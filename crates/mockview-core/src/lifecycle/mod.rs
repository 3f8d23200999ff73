//! Create/update lifecycle of interview records.

mod form;

pub use form::InterviewForm;

use mockview_protocol::{InterviewRecord, Notification, RecordId};
use mockview_store::{InterviewStore, StoreError};
use parking_lot::Mutex;
use serde::Serialize;

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit,
}

/// Stage of the submission currently running on a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Generating,
    Persisting,
    Failed,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub record_id: RecordId,
    pub mode: FormMode,
    pub notification: Notification,
    /// Route the caller should navigate to, replacing the form.
    pub redirect: String,
}

/// Holds a form's submission slot. Created by a successful `Idle ->
/// Validating` transition; returns the phase to `Idle` when dropped.
pub(crate) struct SubmissionGuard<'a> {
    phase: &'a Mutex<SubmissionPhase>,
}

impl<'a> SubmissionGuard<'a> {
    /// Claim the slot, or `None` when another submission holds it.
    pub(crate) fn acquire(phase: &'a Mutex<SubmissionPhase>) -> Option<Self> {
        let mut current = phase.lock();
        if *current != SubmissionPhase::Idle {
            return None;
        }
        *current = SubmissionPhase::Validating;
        Some(Self { phase })
    }

    pub(crate) fn advance(&self, next: SubmissionPhase) {
        *self.phase.lock() = next;
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock() = SubmissionPhase::Idle;
    }
}

/// Read a record for editing, with `id` taken from its store key.
pub async fn load_for_edit(
    store: &dyn InterviewStore,
    key: &RecordId,
) -> Result<Option<InterviewRecord>, StoreError> {
    Ok(store
        .get(key)
        .await?
        .map(|stored| stored.into_keyed_record()))
}

#[cfg(test)]
mod tests {
    use super::{SubmissionGuard, SubmissionPhase};
    use parking_lot::Mutex;

    #[test]
    fn guard_is_exclusive_and_resets_on_drop() {
        let phase = Mutex::new(SubmissionPhase::Idle);
        let guard = SubmissionGuard::acquire(&phase).expect("first");
        assert!(SubmissionGuard::acquire(&phase).is_none());
        guard.advance(SubmissionPhase::Failed);
        assert_eq!(*phase.lock(), SubmissionPhase::Failed);
        drop(guard);
        assert_eq!(*phase.lock(), SubmissionPhase::Idle);
        assert!(SubmissionGuard::acquire(&phase).is_some());
    }
}
