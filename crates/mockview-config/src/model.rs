//! Configuration schema for mockview.

use serde::{Deserialize, Serialize};

/// Default route the caller is sent to after a successful submission.
pub const DEFAULT_LISTING_ROUTE: &str = "/generate";
/// Default directory for the file-backed interview store.
pub const DEFAULT_STORE_PATH: &str = ".mockview/interviews";
/// Upper bound accepted for `generation.question_count`.
pub const MAX_QUESTION_COUNT: usize = 20;

/// Root config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MockviewConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default = "default_listing_route")]
    pub listing_route: String,
}

impl Default for MockviewConfig {
    fn default() -> Self {
        Self {
            schema: None,
            generation: GenerationConfig::default(),
            store: StoreConfig::default(),
            listing_route: default_listing_route(),
        }
    }
}

fn default_listing_route() -> String {
    DEFAULT_LISTING_ROUTE.to_string()
}

/// Question generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    /// Number of question/answer pairs requested in the prompt.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Reject recovered payloads whose entries are not `{question, answer}`
    /// objects instead of coercing them.
    #[serde(default)]
    pub strict_shape: bool,
    #[serde(default)]
    pub model: Option<ModelConfig>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            strict_shape: false,
            model: None,
        }
    }
}

fn default_question_count() -> usize {
    5
}

/// Model provider selection for the generative service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    pub provider: String,
    pub name: String,
}

/// Backend used to persist interview records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreProvider {
    Memory,
    #[default]
    File,
}

/// Interview store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub provider: StoreProvider,
    /// Root directory for the file store; defaults to `.mockview/interviews`.
    #[serde(default)]
    pub path: Option<String>,
}

impl StoreConfig {
    /// Effective store directory.
    pub fn resolved_path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_STORE_PATH)
    }
}
