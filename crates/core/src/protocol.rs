//! Wire protocol of the session channel.
//!
//! Inbound frames are JSON envelopes discriminated by `type`:
//! `{"type": "question" | "answer_result" | "report", "data": ...}`.
//! Outbound frames are bare [`AnswerSubmission`]s.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{OptionKey, Question, QuestionDraft, QuestionValidationError, Report};

/// Informational grading echo for the previous answer.
///
/// The host view needs none of it; it exists so the session transcript can
/// be logged meaningfully.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerResult {
    pub is_correct: bool,
    #[serde(default)]
    pub correct_answer: Option<OptionKey>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// One decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// The next question to present.
    Question(Question),
    /// Grading echo; no required UI effect.
    AnswerResult(AnswerResult),
    /// Terminal: the session summary. No question follows it.
    Report(Report),
}

impl ServerMessage {
    /// Decode one inbound frame.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Json` for malformed frames,
    /// `DecodeError::UnknownType` for envelopes with an unrecognized
    /// discriminator (the caller discards these and continues), and
    /// `DecodeError::Question` for question payloads that fail validation.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_str(raw)?;
        match envelope.kind.as_str() {
            "question" => {
                let draft: QuestionDraft = serde_json::from_value(envelope.data)?;
                Ok(Self::Question(draft.validate()?))
            }
            "answer_result" => {
                let result: AnswerResult = serde_json::from_value(envelope.data)?;
                Ok(Self::AnswerResult(result))
            }
            "report" => {
                let report: Report = serde_json::from_value(envelope.data)?;
                Ok(Self::Report(report))
            }
            _ => Err(DecodeError::UnknownType {
                kind: envelope.kind,
            }),
        }
    }

    /// True for the terminal message of a session.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Report(_))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("unrecognized message type: {kind}")]
    UnknownType { kind: String },

    #[error(transparent)]
    Question(#[from] QuestionValidationError),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    #[test]
    fn decodes_question_envelope() {
        let raw = r#"{"type":"question","data":{
            "id": 1,
            "question": "2+2?",
            "options": {"A": "3", "B": "4"},
            "correctAnswer": "B",
            "difficulty": "Easy",
            "related_topics": ["Math"]
        }}"#;

        let ServerMessage::Question(question) = ServerMessage::decode(raw).unwrap() else {
            panic!("expected a question");
        };
        assert_eq!(question.prompt, "2+2?");
        assert_eq!(question.correct_answer, OptionKey::new("B"));
        assert_eq!(question.difficulty.bucket(), Some(Difficulty::Easy));
        assert_eq!(question.related_topics, vec!["Math".to_owned()]);
    }

    #[test]
    fn decodes_answer_result_envelope() {
        let raw = r#"{"type":"answer_result","data":{
            "is_correct": true,
            "correct_answer": "B",
            "question": "2+2?",
            "explanation": "The correct answer is 4."
        }}"#;

        let ServerMessage::AnswerResult(result) = ServerMessage::decode(raw).unwrap() else {
            panic!("expected an answer result");
        };
        assert!(result.is_correct);
        assert_eq!(result.correct_answer, Some(OptionKey::new("B")));
    }

    #[test]
    fn decodes_report_envelope_as_terminal() {
        let raw = r#"{"type":"report","data":{
            "total_questions": 43,
            "total_correct": 11,
            "total_wrong": 32,
            "overall_accuracy": 0.2558,
            "average_time": 2.28
        }}"#;

        let message = ServerMessage::decode(raw).unwrap();
        assert!(message.is_terminal());
        let ServerMessage::Report(report) = message else {
            panic!("expected a report");
        };
        assert_eq!(report.total_correct, 11);
    }

    #[test]
    fn unknown_type_is_its_own_error() {
        let err = ServerMessage::decode(r#"{"type":"heartbeat","data":{}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownType { kind } if kind == "heartbeat"));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = ServerMessage::decode("{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn invalid_question_payload_is_rejected() {
        let raw = r#"{"type":"question","data":{
            "id": 1,
            "question": "2+2?",
            "options": {"A": "3"},
            "correctAnswer": "B",
            "difficulty": "Easy"
        }}"#;
        let err = ServerMessage::decode(raw).unwrap_err();
        assert!(matches!(err, DecodeError::Question(_)));
    }
}
