//! Form-held interview drafts, raw and validated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four user-supplied draft fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Position,
    Description,
    Experience,
    TechStack,
}

impl DraftField {
    /// All fields in form order.
    pub const ALL: [DraftField; 4] = [
        DraftField::Position,
        DraftField::Description,
        DraftField::Experience,
        DraftField::TechStack,
    ];

    /// Document field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Position => "position",
            DraftField::Description => "description",
            DraftField::Experience => "experience",
            DraftField::TechStack => "techStack",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Experience exactly as entered: either already numeric or free text that
/// still needs coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExperienceInput {
    Number(f64),
    Text(String),
}

impl Default for ExperienceInput {
    fn default() -> Self {
        ExperienceInput::Number(0.0)
    }
}

impl From<&str> for ExperienceInput {
    fn from(value: &str) -> Self {
        ExperienceInput::Text(value.to_string())
    }
}

impl From<String> for ExperienceInput {
    fn from(value: String) -> Self {
        ExperienceInput::Text(value)
    }
}

impl From<u32> for ExperienceInput {
    fn from(value: u32) -> Self {
        ExperienceInput::Number(f64::from(value))
    }
}

impl From<i64> for ExperienceInput {
    fn from(value: i64) -> Self {
        ExperienceInput::Number(value as f64)
    }
}

impl From<f64> for ExperienceInput {
    fn from(value: f64) -> Self {
        ExperienceInput::Number(value)
    }
}

/// Unvalidated form state, mutated on every keystroke.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftInput {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub experience: ExperienceInput,
    #[serde(default)]
    pub tech_stack: String,
}

impl DraftInput {
    /// Overwrite a single field with text typed by the user.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Position => self.position = value,
            DraftField::Description => self.description = value,
            DraftField::Experience => self.experience = ExperienceInput::Text(value),
            DraftField::TechStack => self.tech_stack = value,
        }
    }
}

impl From<&InterviewDraft> for DraftInput {
    fn from(draft: &InterviewDraft) -> Self {
        Self {
            position: draft.position.clone(),
            description: draft.description.clone(),
            experience: ExperienceInput::from(draft.experience),
            tech_stack: draft.tech_stack.clone(),
        }
    }
}

/// A draft that passed field validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewDraft {
    pub position: String,
    pub description: String,
    pub experience: u32,
    pub tech_stack: String,
}
