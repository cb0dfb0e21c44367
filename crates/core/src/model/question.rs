use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::{OptionKey, QuestionId};

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Coarse difficulty buckets the server rotates through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Difficulty as it appears on the wire.
///
/// The server sends a free-form label; the three known labels map onto
/// [`Difficulty`] buckets and anything else is preserved verbatim so the
/// presentation layer can fall back to a neutral badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyLabel(String);

impl DifficultyLabel {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bucket for the known labels; `None` for anything unrecognized.
    #[must_use]
    pub fn bucket(&self) -> Option<Difficulty> {
        match self.0.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Raw question payload as received from the question server.
///
/// Field names follow the wire verbatim (`correctAnswer` is camel-cased,
/// `related_topics` is not).
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub question: String,
    #[serde(default)]
    pub options: BTreeMap<OptionKey, String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: OptionKey,
    #[serde(default)]
    pub explanation: Option<String>,
    pub difficulty: DifficultyLabel,
    #[serde(default)]
    pub related_topics: Vec<String>,
}

impl QuestionDraft {
    /// Validate the payload into a [`Question`].
    ///
    /// # Errors
    ///
    /// Returns `QuestionValidationError` when the prompt is blank, no
    /// options were sent, or the announced correct key is not among the
    /// options.
    pub fn validate(self) -> Result<Question, QuestionValidationError> {
        if self.question.trim().is_empty() {
            return Err(QuestionValidationError::EmptyPrompt { id: self.id });
        }
        if self.options.is_empty() {
            return Err(QuestionValidationError::NoOptions { id: self.id });
        }
        if !self.options.contains_key(&self.correct_answer) {
            return Err(QuestionValidationError::UnknownCorrectKey {
                id: self.id,
                key: self.correct_answer,
            });
        }

        Ok(Question {
            id: self.id,
            prompt: self.question,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            difficulty: self.difficulty,
            related_topics: self.related_topics,
        })
    }
}

/// One multiple-choice question, immutable once received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub options: BTreeMap<OptionKey, String>,
    pub correct_answer: OptionKey,
    pub explanation: Option<String>,
    pub difficulty: DifficultyLabel,
    pub related_topics: Vec<String>,
}

impl Question {
    /// True when `key` names the announced correct option.
    #[must_use]
    pub fn is_correct(&self, key: &OptionKey) -> bool {
        *key == self.correct_answer
    }

    /// True when `key` is one of the offered options.
    #[must_use]
    pub fn has_option(&self, key: &OptionKey) -> bool {
        self.options.contains_key(key)
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionValidationError {
    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("question {id} announces correct key {key} which is not an option")]
    UnknownCorrectKey { id: QuestionId, key: OptionKey },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(correct: &str) -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new(1),
            question: "2+2?".into(),
            options: BTreeMap::from([
                (OptionKey::new("A"), "3".into()),
                (OptionKey::new("B"), "4".into()),
            ]),
            correct_answer: OptionKey::new(correct),
            explanation: Some("The correct answer is 4.".into()),
            difficulty: DifficultyLabel::new("Easy"),
            related_topics: vec!["Math".into()],
        }
    }

    #[test]
    fn valid_draft_becomes_question() {
        let question = draft("B").validate().unwrap();
        assert!(question.is_correct(&OptionKey::new("b")));
        assert!(!question.is_correct(&OptionKey::new("A")));
        assert_eq!(question.difficulty.bucket(), Some(Difficulty::Easy));
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut d = draft("B");
        d.question = "   ".into();
        let err = d.validate().unwrap_err();
        assert!(matches!(err, QuestionValidationError::EmptyPrompt { .. }));
    }

    #[test]
    fn missing_options_are_rejected() {
        let mut d = draft("B");
        d.options.clear();
        let err = d.validate().unwrap_err();
        assert!(matches!(err, QuestionValidationError::NoOptions { .. }));
    }

    #[test]
    fn correct_key_must_be_an_option() {
        let err = draft("C").validate().unwrap_err();
        assert!(matches!(
            err,
            QuestionValidationError::UnknownCorrectKey { .. }
        ));
    }

    #[test]
    fn unknown_difficulty_labels_have_no_bucket() {
        assert_eq!(DifficultyLabel::new("Expert").bucket(), None);
        assert_eq!(DifficultyLabel::new("HARD").bucket(), Some(Difficulty::Hard));
    }
}
