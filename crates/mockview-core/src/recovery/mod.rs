//! Recovery of question/answer lists from free-form model output.
//!
//! The model is asked for a bare JSON array but routinely wraps it in code
//! fences or prose, uses typographic quotes, or leaves trailing commas.
//! [`ResponseRecovery`] extracts the first bracket-delimited candidate,
//! runs it through a [`RepairPipeline`], parses it, and maps the result onto
//! [`QaPair`]s under a [`ShapePolicy`].

mod repair;

pub use repair::{
    CurlyQuotes, InnerQuotes, RepairPipeline, RepairStage, SingleQuotes, TrailingCommas, ZeroWidth,
};

use log::debug;
use mockview_protocol::QaPair;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Errors returned while recovering structured output.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// No `[...]` or `{...}` substring in the response. The raw response is
    /// kept for diagnostics and never rendered by `Display`.
    #[error("no JSON structure found in the response")]
    NoStructureFound { raw: String },
    /// The repaired candidate is still not valid JSON.
    #[error("failed to parse recovered response as JSON: {source}")]
    ParseFailed {
        cleaned: String,
        source: serde_json::Error,
    },
    /// Parsed JSON is not a list of question/answer objects.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
    /// A repair pattern failed to compile.
    #[error("invalid recovery pattern: {0}")]
    InvalidPattern(String),
}

/// How strictly parsed JSON must match `[{question, answer}, ...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapePolicy {
    /// A bare object counts as a one-element list, missing fields become
    /// empty strings and non-string values are rendered as JSON text.
    #[default]
    Permissive,
    /// Anything other than an array of objects with string `question` and
    /// `answer` fields is rejected.
    Strict,
}

impl ShapePolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ShapePolicy::Strict
        } else {
            ShapePolicy::Permissive
        }
    }
}

/// Extract-repair-parse engine. Pure: holds only compiled patterns.
#[derive(Debug)]
pub struct ResponseRecovery {
    fences: Regex,
    structure: Regex,
    pipeline: RepairPipeline,
    policy: ShapePolicy,
}

impl ResponseRecovery {
    /// Standard pipeline with the given shape policy.
    pub fn new(policy: ShapePolicy) -> Result<Self, RecoveryError> {
        Self::with_pipeline(RepairPipeline::standard()?, policy)
    }

    /// Custom repair pipeline.
    pub fn with_pipeline(
        pipeline: RepairPipeline,
        policy: ShapePolicy,
    ) -> Result<Self, RecoveryError> {
        Ok(Self {
            fences: repair::compile(r"(?i)```json|```")?,
            structure: repair::compile(r"(?s)\[.*?\]|\{.*?\}")?,
            pipeline,
            policy,
        })
    }

    pub fn policy(&self) -> ShapePolicy {
        self.policy
    }

    /// Recover the parsed JSON value without interpreting its shape.
    pub fn recover_value(&self, raw: &str) -> Result<Value, RecoveryError> {
        let unfenced = self.fences.replace_all(raw.trim(), "");
        let Some(candidate) = self.structure.find(&unfenced) else {
            debug!("no JSON structure in model response (raw={raw:?})");
            return Err(RecoveryError::NoStructureFound {
                raw: raw.to_string(),
            });
        };
        let cleaned = self.pipeline.apply(candidate.as_str());
        serde_json::from_str(&cleaned).map_err(|source| {
            debug!("recovered candidate failed to parse (cleaned={cleaned:?}, err={source})");
            RecoveryError::ParseFailed { cleaned, source }
        })
    }

    /// Recover the question/answer list.
    pub fn recover(&self, raw: &str) -> Result<Vec<QaPair>, RecoveryError> {
        let value = self.recover_value(raw)?;
        match self.policy {
            ShapePolicy::Permissive => Ok(permissive_pairs(value)),
            ShapePolicy::Strict => strict_pairs(value),
        }
    }
}

fn permissive_pairs(value: Value) -> Vec<QaPair> {
    match value {
        Value::Array(items) => items.into_iter().map(permissive_pair).collect(),
        other => vec![permissive_pair(other)],
    }
}

fn permissive_pair(item: Value) -> QaPair {
    match item {
        Value::Object(mut fields) => QaPair {
            question: render_field(fields.remove("question")),
            answer: render_field(fields.remove("answer")),
        },
        other => QaPair {
            question: render_field(Some(other)),
            answer: String::new(),
        },
    }
}

fn render_field(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}

fn strict_pairs(value: Value) -> Result<Vec<QaPair>, RecoveryError> {
    let Value::Array(items) = value else {
        return Err(RecoveryError::UnexpectedShape(
            "expected a JSON array".to_string(),
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(mut fields) = item else {
                return Err(RecoveryError::UnexpectedShape(format!(
                    "element {index} is not an object"
                )));
            };
            let mut take = |name: &str| match fields.remove(name) {
                Some(Value::String(text)) => Ok(text),
                _ => Err(RecoveryError::UnexpectedShape(format!(
                    "element {index} has no string `{name}`"
                ))),
            };
            let question = take("question")?;
            let answer = take("answer")?;
            Ok(QaPair { question, answer })
        })
        .collect()
}
