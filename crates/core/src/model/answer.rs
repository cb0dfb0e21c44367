use serde::Serialize;

use crate::model::ids::OptionKey;

/// One graded answer, sent back over the session channel.
///
/// Wire shape: `{"answer": "B", "time_taken": 2.5}` with `time_taken` in
/// seconds since the question became active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerSubmission {
    pub answer: OptionKey,
    pub time_taken: f64,
}

impl AnswerSubmission {
    /// Build a submission; `time_taken` is clamped to be non-negative so a
    /// skewed clock can never produce a negative elapsed time.
    #[must_use]
    pub fn new(answer: OptionKey, time_taken: f64) -> Self {
        Self {
            answer,
            time_taken: time_taken.max(0.0),
        }
    }

    /// Serialize to the outbound wire format.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
