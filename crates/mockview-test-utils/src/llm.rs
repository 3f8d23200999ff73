use async_trait::async_trait;
use autoagents_llm::chat::{
    ChatMessage, ChatProvider, ChatResponse, StructuredOutputFormat, Tool,
};
use autoagents_llm::completion::{CompletionProvider, CompletionRequest, CompletionResponse};
use autoagents_llm::embedding::EmbeddingProvider;
use autoagents_llm::error::LLMError;
use autoagents_llm::models::ModelsProvider;
use autoagents_llm::{LLMProvider, ToolCall};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// JSON array of `count` pairs, `Question N?` / `Answer N.`.
pub fn sample_response(count: usize) -> String {
    let pairs = (1..=count)
        .map(|n| {
            serde_json::json!({
                "question": format!("Question {n}?"),
                "answer": format!("Answer {n}."),
            })
        })
        .collect::<Vec<_>>();
    serde_json::Value::Array(pairs).to_string()
}

#[derive(Debug, Clone)]
pub struct FixedChatResponse {
    text: Option<String>,
}

impl FixedChatResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }
}

impl std::fmt::Display for FixedChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text.as_deref().unwrap_or_default())
    }
}

impl ChatResponse for FixedChatResponse {
    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        None
    }
}

/// Completion, embedding and model listing are never used by mockview;
/// mocks only differ in `chat_with_tools`.
macro_rules! unused_llm_surfaces {
    ($ty:ty) => {
        #[async_trait]
        impl CompletionProvider for $ty {
            async fn complete(
                &self,
                _req: &CompletionRequest,
                _json_schema: Option<StructuredOutputFormat>,
            ) -> Result<CompletionResponse, LLMError> {
                Ok(CompletionResponse {
                    text: "mock completion".to_string(),
                })
            }
        }

        #[async_trait]
        impl EmbeddingProvider for $ty {
            async fn embed(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>, LLMError> {
                Ok(input.into_iter().map(|_| vec![0.0, 0.0]).collect())
            }
        }

        #[async_trait]
        impl ModelsProvider for $ty {}

        impl LLMProvider for $ty {}
    };
}

/// Always answers with the same text.
#[derive(Debug, Clone)]
pub struct FixedLLM {
    response: String,
}

impl FixedLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for FixedLLM {
    async fn chat_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        Ok(Box::new(FixedChatResponse::new(self.response.clone())))
    }
}

unused_llm_surfaces!(FixedLLM);

/// Answers with fixed text and records how often and with what it was asked.
#[derive(Debug, Clone)]
pub struct CountingLLM {
    response: String,
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl CountingLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}

#[async_trait]
impl ChatProvider for CountingLLM {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = messages.last().map(|message| message.content.clone());
        Ok(Box::new(FixedChatResponse::new(self.response.clone())))
    }
}

unused_llm_surfaces!(CountingLLM);

/// Blocks every request until released, so a test can act while a
/// generation is in flight.
#[derive(Debug, Clone)]
pub struct GatedLLM {
    response: String,
    calls: Arc<AtomicUsize>,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl GatedLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(AtomicUsize::new(0)),
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until a request has reached the model.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let one blocked request complete.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl ChatProvider for GatedLLM {
    async fn chat_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Box::new(FixedChatResponse::new(self.response.clone())))
    }
}

unused_llm_surfaces!(GatedLLM);

/// Answers with a response that carries no text.
#[derive(Debug, Clone, Default)]
pub struct TextlessLLM;

#[async_trait]
impl ChatProvider for TextlessLLM {
    async fn chat_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        Ok(Box::new(FixedChatResponse::empty()))
    }
}

unused_llm_surfaces!(TextlessLLM);

/// Fails every request with a provider error.
#[derive(Debug, Clone)]
pub struct FailingLLM {
    message: String,
    calls: Arc<AtomicUsize>,
}

impl FailingLLM {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for FailingLLM {
    async fn chat_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LLMError::ProviderError(self.message.clone()))
    }
}

unused_llm_surfaces!(FailingLLM);
