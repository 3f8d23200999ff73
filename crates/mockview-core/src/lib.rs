//! Core of mockview: draft validation, recovery of structured question lists
//! from free-form model output, question generation, and the create/update
//! lifecycle of interview records.

pub mod error;
pub mod generation;
pub mod lifecycle;
pub mod listing;
pub mod recovery;
pub mod validator;

pub use error::{GenerationError, SubmitError};
pub use generation::QuestionGenerator;
pub use lifecycle::{
    FormMode, InterviewForm, SubmissionPhase, SubmitOutcome, load_for_edit,
};
pub use listing::{InterviewListing, ListingState};
pub use recovery::{
    RecoveryError, RepairPipeline, RepairStage, ResponseRecovery, ShapePolicy,
};
pub use validator::{FieldViolation, ValidationErrors, validate_draft, validate_field};
