//! Prompt construction and the single generative call per submission.

use crate::error::GenerationError;
use crate::recovery::{ResponseRecovery, ShapePolicy};
use autoagents_llm::LLMProvider;
use autoagents_llm::chat::{ChatMessage, ChatProvider, ChatResponse, ChatRole, MessageType};
use log::{debug, info};
use mockview_config::GenerationConfig;
use mockview_protocol::{InterviewDraft, QaPair};
use std::sync::Arc;

/// Number of pairs requested when not configured.
pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// Turns a validated draft into interview questions via one model call.
pub struct QuestionGenerator {
    llm: Arc<dyn LLMProvider>,
    recovery: ResponseRecovery,
    question_count: usize,
}

impl QuestionGenerator {
    /// Generator with the standard recovery pipeline and permissive shapes.
    pub fn new(llm: Arc<dyn LLMProvider>) -> Result<Self, GenerationError> {
        Ok(Self {
            llm,
            recovery: ResponseRecovery::new(ShapePolicy::Permissive)?,
            question_count: DEFAULT_QUESTION_COUNT,
        })
    }

    /// Generator honouring `generation.question_count` and
    /// `generation.strict_shape`.
    pub fn from_config(
        llm: Arc<dyn LLMProvider>,
        config: &GenerationConfig,
    ) -> Result<Self, GenerationError> {
        let recovery = ResponseRecovery::new(ShapePolicy::from_strict(config.strict_shape))?;
        Ok(Self::new(llm)?
            .with_recovery(recovery)
            .with_question_count(config.question_count))
    }

    pub fn with_recovery(mut self, recovery: ResponseRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_question_count(mut self, question_count: usize) -> Self {
        self.question_count = question_count;
        self
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Prompt sent for `draft`. Deterministic in the draft and question count.
    pub fn build_prompt(&self, draft: &InterviewDraft) -> String {
        let count = self.question_count;
        let position = &draft.position;
        let description = &draft.description;
        let experience = draft.experience;
        let tech_stack = &draft.tech_stack;
        format!(
            "As an experienced prompt engineer, generate a JSON array containing {count} technical interview questions along with detailed answers based on the following job information. Each object in the array should have the fields \"question\" and \"answer\", formatted as follows:

[
  {{ \"question\": \"<Question text>\", \"answer\": \"<Answer text>\" }},
  ...
]

Job Information:
- Job Position: {position}
- Job Description: {description}
- Years of Experience Required: {experience}
- Tech Stacks: {tech_stack}

The questions should assess skills in {tech_stack} development and best practices, problem-solving, and experience handling complex requirements. Please format the output strictly as an array of JSON objects without any additional labels, code blocks, or explanations. Return only the JSON array with questions and answers."
        )
    }

    /// Ask the model for questions about `draft` and recover them from its
    /// reply. No retries.
    pub async fn generate(&self, draft: &InterviewDraft) -> Result<Vec<QaPair>, GenerationError> {
        let message = ChatMessage {
            role: ChatRole::User,
            message_type: MessageType::Text,
            content: self.build_prompt(draft),
        };
        debug!(
            "requesting interview questions (position={}, count={}, policy={:?})",
            draft.position,
            self.question_count,
            self.recovery.policy()
        );
        let response = self.llm.chat_with_tools(&[message], None, None).await?;
        let raw = response.text().ok_or(GenerationError::MissingText)?;
        let pairs = self.recovery.recover(&raw)?;
        if pairs.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        info!("generated interview questions (count={})", pairs.len());
        Ok(pairs)
    }
}
