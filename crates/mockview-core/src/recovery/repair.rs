//! Cosmetic repair stages applied to an extracted JSON candidate.

use super::RecoveryError;
use regex::Regex;
use std::borrow::Cow;

/// One textual repair applied between extraction and parsing.
pub trait RepairStage: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// `“` and `”` become `"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurlyQuotes;

impl RepairStage for CurlyQuotes {
    fn name(&self) -> &'static str {
        "curly_quotes"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.contains(['\u{201C}', '\u{201D}']) {
            Cow::Owned(text.replace(['\u{201C}', '\u{201D}'], "\""))
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Every `'` becomes `"`. Lossy: apostrophes inside values are turned into
/// quotes and only partly restored by [`InnerQuotes`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleQuotes;

impl RepairStage for SingleQuotes {
    fn name(&self) -> &'static str {
        "single_quotes"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.contains('\'') {
            Cow::Owned(text.replace('\'', "\""))
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Drops a comma that directly precedes `]` or `}`.
#[derive(Debug, Clone)]
pub struct TrailingCommas {
    pattern: Regex,
}

impl TrailingCommas {
    pub fn new() -> Result<Self, RecoveryError> {
        Ok(Self {
            pattern: compile(r",\s*([\]}])")?,
        })
    }
}

impl RepairStage for TrailingCommas {
    fn name(&self) -> &'static str {
        "trailing_commas"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, "${1}")
    }
}

/// Removes U+200B..=U+200D and U+FEFF.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroWidth;

fn is_zero_width(ch: char) -> bool {
    matches!(ch, '\u{200B}'..='\u{200D}' | '\u{FEFF}')
}

impl RepairStage for ZeroWidth {
    fn name(&self) -> &'static str {
        "zero_width"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.contains(is_zero_width) {
            Cow::Owned(text.chars().filter(|ch| !is_zero_width(*ch)).collect())
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// A `"` between two word characters becomes `'` (`haven"t` -> `haven't`).
#[derive(Debug, Clone)]
pub struct InnerQuotes {
    pattern: Regex,
}

impl InnerQuotes {
    pub fn new() -> Result<Self, RecoveryError> {
        Ok(Self {
            pattern: compile(r#"([A-Za-z0-9_])"([A-Za-z0-9_])"#)?,
        })
    }
}

impl RepairStage for InnerQuotes {
    fn name(&self) -> &'static str {
        "inner_quotes"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, "${1}'${2}")
    }
}

pub(super) fn compile(pattern: &str) -> Result<Regex, RecoveryError> {
    Regex::new(pattern).map_err(|err| RecoveryError::InvalidPattern(err.to_string()))
}

/// Ordered list of repair stages.
pub struct RepairPipeline {
    stages: Vec<Box<dyn RepairStage>>,
}

impl std::fmt::Debug for RepairPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|stage| stage.name()))
            .finish()
    }
}

impl RepairPipeline {
    /// Pipeline with no stages.
    pub fn empty() -> Self {
        Self { stages: Vec::new() }
    }

    /// Curly quotes, single quotes, trailing commas, zero-width characters,
    /// inner quotes, in that order.
    pub fn standard() -> Result<Self, RecoveryError> {
        Ok(Self::empty()
            .with_stage(CurlyQuotes)
            .with_stage(SingleQuotes)
            .with_stage(TrailingCommas::new()?)
            .with_stage(ZeroWidth)
            .with_stage(InnerQuotes::new()?))
    }

    /// Append a stage.
    pub fn with_stage(mut self, stage: impl RepairStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Stage names in application order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage over `text`.
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for stage in &self.stages {
            let repaired = match stage.apply(&current) {
                Cow::Owned(repaired) => Some(repaired),
                Cow::Borrowed(_) => None,
            };
            if let Some(repaired) = repaired {
                current = repaired;
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::{InnerQuotes, RepairPipeline, RepairStage, TrailingCommas, ZeroWidth};
    use pretty_assertions::assert_eq;

    #[test]
    fn trailing_commas_are_removed_before_closers() {
        let stage = TrailingCommas::new().expect("pattern");
        assert_eq!(stage.apply("[1, 2,\n ]"), "[1, 2]");
        assert_eq!(stage.apply(r#"{"a": 1 , }"#), r#"{"a": 1 }"#);
    }

    #[test]
    fn inner_quotes_become_apostrophes() {
        let stage = InnerQuotes::new().expect("pattern");
        assert_eq!(stage.apply(r#""I haven"t""#), r#""I haven't""#);
        assert_eq!(stage.apply(r#""a": "b""#), r#""a": "b""#);
    }

    #[test]
    fn zero_width_characters_are_dropped() {
        assert_eq!(ZeroWidth.apply("\u{FEFF}[\u{200B}1\u{200D}]"), "[1]");
    }

    #[test]
    fn standard_pipeline_restores_contractions() {
        let pipeline = RepairPipeline::standard().expect("pipeline");
        assert_eq!(
            pipeline.apply("[{'question': 'Why?', 'answer': 'It doesn't matter',}]"),
            r#"[{"question": "Why?", "answer": "It doesn't matter"}]"#
        );
        assert_eq!(
            pipeline.stage_names(),
            vec![
                "curly_quotes",
                "single_quotes",
                "trailing_commas",
                "zero_width",
                "inner_quotes"
            ]
        );
    }
}
