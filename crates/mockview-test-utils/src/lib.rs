//! Test helpers shared across mockview crates.

pub mod clock;
pub mod llm;
pub mod store;

pub use clock::FixedClock;
pub use llm::{
    CountingLLM, FailingLLM, FixedChatResponse, FixedLLM, GatedLLM, TextlessLLM, sample_response,
};
pub use store::{RecordingStore, StoreOp};
