use chrono::{Duration, TimeZone, Utc};
use mockview_core::{
    FormMode, GenerationError, InterviewForm, QuestionGenerator, SubmissionPhase, SubmitError,
    load_for_edit,
};
use mockview_protocol::{
    DraftField, DraftInput, ExperienceInput, InterviewRecord, NotificationKind, RecordId,
    RecordPatch, TimestampWrite, UserId,
};
use mockview_store::{Clock, InterviewStore, MemoryInterviewStore};
use mockview_test_utils::{
    CountingLLM, FailingLLM, FixedClock, GatedLLM, RecordingStore, StoreOp, TextlessLLM,
    sample_response,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct Harness {
    clock: Arc<FixedClock>,
    store: Arc<RecordingStore>,
}

impl Harness {
    fn new() -> Self {
        let clock = Arc::new(FixedClock::default());
        let memory = Arc::new(MemoryInterviewStore::with_clock(clock.clone()));
        Self {
            clock,
            store: Arc::new(RecordingStore::new(memory)),
        }
    }

    fn form(
        &self,
        llm: Arc<dyn autoagents_llm::LLMProvider>,
        initial: Option<InterviewRecord>,
    ) -> InterviewForm {
        let generator = Arc::new(QuestionGenerator::new(llm).expect("generator"));
        InterviewForm::new(self.store.clone(), generator, initial)
    }
}

fn backend_draft() -> DraftInput {
    DraftInput {
        position: "Backend Engineer".to_string(),
        description: "Build APIs".to_string(),
        experience: ExperienceInput::from(3u32),
        tech_stack: "Go, PostgreSQL".to_string(),
    }
}

#[tokio::test]
async fn create_allocates_then_stamps_id() {
    let harness = Harness::new();
    let llm = CountingLLM::new(sample_response(5));
    let form = harness.form(Arc::new(llm.clone()), None);
    form.set_draft(backend_draft());
    let user = UserId::from("user-1");

    let outcome = form.submit(Some(&user)).await.expect("submit");

    assert_eq!(llm.calls(), 1);
    assert_eq!(outcome.mode, FormMode::Create);
    assert_eq!(outcome.redirect, "/generate");
    assert_eq!(outcome.notification.kind, NotificationKind::Success);
    assert_eq!(outcome.notification.title, "Created..!");
    assert_eq!(outcome.notification.description, "New Mock Interview Created...");

    let ops = harness.store.ops();
    assert_eq!(ops.len(), 2);
    match &ops[0] {
        StoreOp::Create(new) => {
            assert_eq!(new.user_id, user);
            assert_eq!(new.draft.position, "Backend Engineer");
            assert_eq!(new.draft.experience, 3);
            assert_eq!(new.questions.len(), 5);
            assert_eq!(new.created_at, TimestampWrite::ServerNow);
        }
        other => panic!("expected allocation first, got {other:?}"),
    }
    assert_eq!(
        ops[1],
        StoreOp::Update(
            outcome.record_id.clone(),
            RecordPatch {
                id: Some(outcome.record_id.clone()),
                updated_at: Some(TimestampWrite::ServerNow),
                ..RecordPatch::default()
            }
        )
    );

    let record = harness
        .store
        .get(&outcome.record_id)
        .await
        .expect("get")
        .expect("present")
        .record;
    assert_eq!(record.id, Some(outcome.record_id));
    assert_eq!(record.created_at, harness.clock.now());
    assert_eq!(record.updated_at, Some(record.created_at));
    assert_eq!(form.phase(), SubmissionPhase::Idle);
    assert_eq!(form.draft(), DraftInput::default());
}

#[tokio::test]
async fn invalid_draft_never_reaches_generation() {
    let harness = Harness::new();
    let llm = CountingLLM::new(sample_response(5));
    let form = harness.form(Arc::new(llm.clone()), None);
    form.set_draft(backend_draft());
    form.set_field(DraftField::Experience, "-1");

    let err = form
        .submit(Some(&UserId::from("user-1")))
        .await
        .expect_err("invalid");

    match &err {
        SubmitError::Validation(errors) => {
            assert_eq!(errors.for_field(DraftField::Experience).count(), 1)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.notification(), None);
    assert_eq!(llm.calls(), 0);
    assert_eq!(harness.store.write_count(), 0);
    assert_eq!(form.phase(), SubmissionPhase::Idle);
}

#[tokio::test]
async fn create_without_identity_fails_before_generation() {
    let harness = Harness::new();
    let llm = CountingLLM::new(sample_response(5));
    let form = harness.form(Arc::new(llm.clone()), None);
    form.set_draft(backend_draft());

    let err = form.submit(None).await.expect_err("no identity");

    assert!(matches!(err, SubmitError::IdentityMissing));
    assert_eq!(llm.calls(), 0);
    assert_eq!(harness.store.write_count(), 0);
    assert_eq!(form.draft(), backend_draft());
}

#[tokio::test]
async fn generation_failures_write_nothing_and_keep_draft() {
    let harness = Harness::new();
    let failing = FailingLLM::new("quota exceeded");
    let form = harness.form(Arc::new(failing.clone()), None);
    form.set_draft(backend_draft());

    let err = form
        .submit(Some(&UserId::from("user-1")))
        .await
        .expect_err("llm failure");

    assert!(matches!(
        err,
        SubmitError::Generation(GenerationError::Llm(_))
    ));
    let notification = err.notification().expect("notification");
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.title, "Error..");
    assert_eq!(
        notification.description,
        "Something went wrong. Please try again later"
    );
    assert_eq!(failing.calls(), 1);
    assert_eq!(harness.store.write_count(), 0);
    assert_eq!(form.draft(), backend_draft());
    assert_eq!(form.phase(), SubmissionPhase::Idle);

    let textless = harness.form(Arc::new(TextlessLLM), None);
    textless.set_draft(backend_draft());
    let err = textless
        .submit(Some(&UserId::from("user-1")))
        .await
        .expect_err("no text");
    assert!(matches!(
        err,
        SubmitError::Generation(GenerationError::MissingText)
    ));

    let prose = harness.form(Arc::new(CountingLLM::new("I'd rather not.")), None);
    prose.set_draft(backend_draft());
    let err = prose
        .submit(Some(&UserId::from("user-1")))
        .await
        .expect_err("no structure");
    assert!(matches!(
        err,
        SubmitError::Generation(GenerationError::Recovery(_))
    ));
    assert_eq!(harness.store.write_count(), 0);
}

#[tokio::test]
async fn failed_id_stamp_reports_allocated_key() {
    let harness = Harness::new();
    let form = harness.form(Arc::new(CountingLLM::new(sample_response(5))), None);
    form.set_draft(backend_draft());
    harness.store.fail_on_write(2);

    let err = form
        .submit(Some(&UserId::from("user-1")))
        .await
        .expect_err("stamp failure");

    let key = match err {
        SubmitError::IdStamp { key, .. } => key,
        other => panic!("unexpected error: {other:?}"),
    };
    let orphan = harness
        .store
        .get(&key)
        .await
        .expect("get")
        .expect("allocated record remains");
    assert_eq!(orphan.record.id, None);
    assert_eq!(orphan.record.updated_at, None);
}

async fn seeded_record(harness: &Harness) -> InterviewRecord {
    let creator = harness.form(Arc::new(CountingLLM::new(sample_response(5))), None);
    creator.set_draft(backend_draft());
    let outcome = creator
        .submit(Some(&UserId::from("original-owner")))
        .await
        .expect("create");
    load_for_edit(&*harness.store, &outcome.record_id)
        .await
        .expect("load")
        .expect("present")
}

#[tokio::test]
async fn update_preserves_owner_and_creation_time() {
    let harness = Harness::new();
    let existing = seeded_record(&harness).await;
    let created_at = existing.created_at;
    let key = existing.id.clone().expect("id");
    harness.clock.advance(Duration::hours(2));
    let writes_before = harness.store.write_count();

    let llm = CountingLLM::new(sample_response(3));
    let form = harness.form(Arc::new(llm.clone()), Some(existing));
    form.set_field(DraftField::Position, "Senior Backend Engineer");

    let outcome = form
        .submit(Some(&UserId::from("someone-else")))
        .await
        .expect("update");

    assert_eq!(outcome.mode, FormMode::Edit);
    assert_eq!(outcome.record_id, key);
    assert_eq!(outcome.notification.title, "Updated..!");
    assert_eq!(outcome.notification.description, "Changes saved successfully");
    assert_eq!(llm.calls(), 1);
    assert_eq!(harness.store.write_count(), writes_before + 1);

    let record = harness
        .store
        .get(&key)
        .await
        .expect("get")
        .expect("present")
        .record;
    assert_eq!(record.user_id, UserId::from("original-owner"));
    assert_eq!(record.created_at, created_at);
    assert_eq!(record.updated_at, Some(created_at + Duration::hours(2)));
    assert_eq!(record.position, "Senior Backend Engineer");
    assert_eq!(record.questions.len(), 3);
}

#[tokio::test]
async fn update_without_id_is_fatal_and_writes_nothing() {
    let harness = Harness::new();
    let mut existing = seeded_record(&harness).await;
    existing.id = None;
    let writes_before = harness.store.write_count();
    let llm = CountingLLM::new(sample_response(5));
    let form = harness.form(Arc::new(llm.clone()), Some(existing));

    let err = form
        .submit(Some(&UserId::from("original-owner")))
        .await
        .expect_err("missing id");

    assert!(matches!(err, SubmitError::MissingRecordId));
    assert!(err.notification().is_some());
    assert_eq!(harness.store.write_count(), writes_before);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn second_submit_while_in_flight_is_refused() {
    let harness = Harness::new();
    let llm = GatedLLM::new(sample_response(5));
    let form = Arc::new(harness.form(Arc::new(llm.clone()), None));
    form.set_draft(backend_draft());

    let first = tokio::spawn({
        let form = form.clone();
        async move { form.submit(Some(&UserId::from("user-1"))).await }
    });
    llm.wait_entered().await;
    assert_eq!(form.phase(), SubmissionPhase::Generating);
    assert!(form.is_busy());

    let err = form
        .submit(Some(&UserId::from("user-1")))
        .await
        .expect_err("in flight");
    assert!(matches!(err, SubmitError::SubmissionInFlight));
    assert_eq!(err.notification(), None);
    assert_eq!(llm.calls(), 1);
    assert_eq!(harness.store.write_count(), 0);

    llm.release();
    let outcome = first.await.expect("join").expect("first submit");
    assert_eq!(llm.calls(), 1);
    assert_eq!(harness.store.write_count(), 2);
    assert_eq!(form.phase(), SubmissionPhase::Idle);
    assert!(
        harness
            .store
            .get(&outcome.record_id)
            .await
            .expect("get")
            .is_some()
    );
}

#[tokio::test]
async fn load_for_edit_stamps_key_as_id() {
    let harness = Harness::new();
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let key = harness
        .store
        .create(mockview_protocol::NewInterview {
            user_id: UserId::from("user-1"),
            draft: mockview_core::validate_draft(&backend_draft()).expect("valid"),
            questions: Vec::new(),
            created_at: TimestampWrite::At(created_at),
        })
        .await
        .expect("create");

    let record = load_for_edit(&*harness.store, &key)
        .await
        .expect("load")
        .expect("present");
    assert_eq!(record.id, Some(key));
    assert_eq!(record.created_at, created_at);

    let missing = load_for_edit(&*harness.store, &RecordId::from("missing"))
        .await
        .expect("load");
    assert_eq!(missing, None);
}
