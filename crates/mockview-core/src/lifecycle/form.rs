use super::{FormMode, SubmissionGuard, SubmissionPhase, SubmitOutcome};
use crate::error::SubmitError;
use crate::generation::QuestionGenerator;
use crate::validator::{FieldViolation, validate_draft, validate_field};
use log::{debug, info, warn};
use mockview_config::DEFAULT_LISTING_ROUTE;
use mockview_protocol::{
    DraftField, DraftInput, InterviewDraft, InterviewRecord, NewInterview, Notification, QaPair,
    RecordId, RecordPatch, TimestampWrite, UserId,
};
use mockview_store::InterviewStore;
use parking_lot::Mutex;
use std::sync::Arc;

const CREATE_TITLE: &str = "Create a new Mock Interview";

/// One create or edit form: the draft being typed, the record it edits (if
/// any) and its submission state.
pub struct InterviewForm {
    store: Arc<dyn InterviewStore>,
    generator: Arc<QuestionGenerator>,
    initial: Option<InterviewRecord>,
    draft: Mutex<DraftInput>,
    phase: Mutex<SubmissionPhase>,
    listing_route: String,
}

impl InterviewForm {
    /// Form seeded from `initial` when editing, or blank (experience 0) when
    /// creating.
    pub fn new(
        store: Arc<dyn InterviewStore>,
        generator: Arc<QuestionGenerator>,
        initial: Option<InterviewRecord>,
    ) -> Self {
        let draft = seed(initial.as_ref());
        Self {
            store,
            generator,
            initial,
            draft: Mutex::new(draft),
            phase: Mutex::new(SubmissionPhase::Idle),
            listing_route: DEFAULT_LISTING_ROUTE.to_string(),
        }
    }

    /// Route returned as the redirect target after a successful submit.
    pub fn with_listing_route(mut self, route: impl Into<String>) -> Self {
        self.listing_route = route.into();
        self
    }

    pub fn mode(&self) -> FormMode {
        if self.initial.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn initial(&self) -> Option<&InterviewRecord> {
        self.initial.as_ref()
    }

    fn initial_position(&self) -> Option<&str> {
        self.initial
            .as_ref()
            .map(|record| record.position.as_str())
            .filter(|position| !position.is_empty())
    }

    /// Page heading.
    pub fn title(&self) -> &str {
        self.initial_position().unwrap_or(CREATE_TITLE)
    }

    /// Last breadcrumb segment.
    pub fn breadcrumb(&self) -> &str {
        self.initial_position().unwrap_or("Create")
    }

    /// Label of the submit action.
    pub fn action_label(&self) -> &'static str {
        match self.mode() {
            FormMode::Create => "Create",
            FormMode::Edit => "Save Changes",
        }
    }

    pub fn draft(&self) -> DraftInput {
        self.draft.lock().clone()
    }

    pub fn phase(&self) -> SubmissionPhase {
        *self.phase.lock()
    }

    /// True while a submission is running; the submit action should be
    /// disabled.
    pub fn is_busy(&self) -> bool {
        self.phase() != SubmissionPhase::Idle
    }

    /// Overwrite one field and return its live violations.
    pub fn set_field(&self, field: DraftField, value: impl Into<String>) -> Vec<FieldViolation> {
        let mut draft = self.draft.lock();
        draft.set(field, value);
        validate_field(&draft, field)
    }

    /// Replace the whole draft.
    pub fn set_draft(&self, draft: DraftInput) {
        *self.draft.lock() = draft;
    }

    /// Restore the values the form was seeded with.
    pub fn reset(&self) {
        *self.draft.lock() = seed(self.initial.as_ref());
    }

    /// Validate, generate questions and persist the record.
    ///
    /// `identity` is the signed-in user; it is required to create and never
    /// written on update. At most one submission runs per form: a call made
    /// while another is in flight fails with
    /// [`SubmitError::SubmissionInFlight`] without touching the model or the
    /// store. On failure the draft is kept.
    pub async fn submit(&self, identity: Option<&UserId>) -> Result<SubmitOutcome, SubmitError> {
        let Some(guard) = SubmissionGuard::acquire(&self.phase) else {
            debug!("ignoring submit while another submission is in flight");
            return Err(SubmitError::SubmissionInFlight);
        };
        let input = self.draft();
        let draft = validate_draft(&input)?;

        let result = match self.mode() {
            FormMode::Create => self.create(&guard, draft, identity).await,
            FormMode::Edit => self.update(&guard, draft).await,
        };
        match result {
            Ok(record_id) => {
                self.reset();
                let mode = self.mode();
                Ok(SubmitOutcome {
                    record_id,
                    mode,
                    notification: success_notification(mode),
                    redirect: self.listing_route.clone(),
                })
            }
            Err(err) => {
                guard.advance(SubmissionPhase::Failed);
                warn!("interview submission failed (mode={:?}, err={})", self.mode(), err);
                Err(err)
            }
        }
    }

    async fn generate(
        &self,
        guard: &SubmissionGuard<'_>,
        draft: &InterviewDraft,
    ) -> Result<Vec<QaPair>, SubmitError> {
        guard.advance(SubmissionPhase::Generating);
        let questions = self.generator.generate(draft).await?;
        guard.advance(SubmissionPhase::Persisting);
        Ok(questions)
    }

    async fn create(
        &self,
        guard: &SubmissionGuard<'_>,
        draft: InterviewDraft,
        identity: Option<&UserId>,
    ) -> Result<RecordId, SubmitError> {
        let user_id = identity.cloned().ok_or(SubmitError::IdentityMissing)?;
        let questions = self.generate(guard, &draft).await?;

        let key = self
            .store
            .create(NewInterview {
                user_id,
                draft,
                questions,
                created_at: TimestampWrite::ServerNow,
            })
            .await?;
        let stamp = RecordPatch {
            id: Some(key.clone()),
            updated_at: Some(TimestampWrite::ServerNow),
            ..RecordPatch::default()
        };
        if let Err(source) = self.store.update(&key, stamp).await {
            return Err(SubmitError::IdStamp { key, source });
        }
        info!("created interview (id={})", key);
        Ok(key)
    }

    async fn update(
        &self,
        guard: &SubmissionGuard<'_>,
        draft: InterviewDraft,
    ) -> Result<RecordId, SubmitError> {
        let Some(existing) = self.initial.as_ref() else {
            return Err(SubmitError::MissingRecordId);
        };
        let key = existing.id.clone().ok_or(SubmitError::MissingRecordId)?;
        let questions = self.generate(guard, &draft).await?;

        let patch = RecordPatch {
            user_id: Some(existing.user_id.clone()),
            created_at: Some(TimestampWrite::At(existing.created_at)),
            questions: Some(questions),
            updated_at: Some(TimestampWrite::ServerNow),
            ..RecordPatch::default()
        }
        .with_draft(&draft);
        self.store.update(&key, patch).await?;
        info!("updated interview (id={})", key);
        Ok(key)
    }
}

fn seed(initial: Option<&InterviewRecord>) -> DraftInput {
    initial.map(DraftInput::from).unwrap_or_default()
}

fn success_notification(mode: FormMode) -> Notification {
    match mode {
        FormMode::Create => Notification::success("Created..!", "New Mock Interview Created..."),
        FormMode::Edit => Notification::success("Updated..!", "Changes saved successfully"),
    }
}
