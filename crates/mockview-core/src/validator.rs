//! Field-level validation of interview drafts.

use mockview_protocol::{DraftField, DraftInput, ExperienceInput, InterviewDraft};
use std::fmt;

const POSITION_MAX_CHARS: usize = 100;
const DESCRIPTION_MIN_CHARS: usize = 10;

/// One failed constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: DraftField,
    pub message: String,
}

impl FieldViolation {
    fn new(field: DraftField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every violation found in a draft, in form field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Violations reported against `field`.
    pub fn for_field(&self, field: DraftField) -> impl Iterator<Item = &FieldViolation> {
        self.violations
            .iter()
            .filter(move |violation| violation.field == field)
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a whole draft, collecting violations for every field.
pub fn validate_draft(input: &DraftInput) -> Result<InterviewDraft, ValidationErrors> {
    let mut violations = Vec::new();
    for field in DraftField::ALL {
        violations.extend(validate_field(input, field));
    }
    let experience = match coerce_experience(&input.experience) {
        Ok(experience) if violations.is_empty() => experience,
        _ => return Err(ValidationErrors { violations }),
    };
    Ok(InterviewDraft {
        position: input.position.clone(),
        description: input.description.clone(),
        experience,
        tech_stack: input.tech_stack.clone(),
    })
}

/// Violations for a single field; empty when the field is valid.
pub fn validate_field(input: &DraftInput, field: DraftField) -> Vec<FieldViolation> {
    let message = match field {
        DraftField::Position => {
            let chars = input.position.chars().count();
            if chars == 0 {
                Some("Position is required")
            } else if chars > POSITION_MAX_CHARS {
                Some("Position must be 100 characters or less")
            } else {
                None
            }
        }
        DraftField::Description => (input.description.chars().count() < DESCRIPTION_MIN_CHARS)
            .then_some("Description is required"),
        DraftField::Experience => coerce_experience(&input.experience).err(),
        DraftField::TechStack => input
            .tech_stack
            .is_empty()
            .then_some("Tech stack must be at least a character"),
    };
    message
        .map(|message| vec![FieldViolation::new(field, message)])
        .unwrap_or_default()
}

fn coerce_experience(input: &ExperienceInput) -> Result<u32, &'static str> {
    let value = match input {
        ExperienceInput::Number(value) => *value,
        ExperienceInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err("Experience cannot be empty or negative");
            }
            text.parse::<f64>()
                .map_err(|_| "Experience must be a number")?
        }
    };
    if !value.is_finite() {
        return Err("Experience must be a number");
    }
    if value < 0.0 {
        return Err("Experience cannot be empty or negative");
    }
    if value.fract() != 0.0 {
        return Err("Experience must be a whole number");
    }
    if value > f64::from(u32::MAX) {
        return Err("Experience is too large");
    }
    Ok(value as u32)
}
