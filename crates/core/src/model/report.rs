use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::{OptionKey, QuestionId};
use crate::model::question::DifficultyLabel;

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// End-of-session performance summary produced by the question server.
///
/// Created once when the terminal `report` message arrives and never
/// mutated afterwards. Field names mirror the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total_questions: u32,
    pub total_correct: u32,
    pub total_wrong: u32,
    pub overall_accuracy: f64,
    pub average_time: f64,
    #[serde(default)]
    pub difficulty_performance: BTreeMap<String, DifficultyPerformance>,
    #[serde(default)]
    pub challenging_questions: Vec<ChallengingQuestion>,
    #[serde(default)]
    pub wrong_answers: Vec<WrongAnswer>,
    #[serde(default)]
    pub detailed_question_performance: Vec<QuestionPerformance>,
}

impl Report {
    /// Overall accuracy as a percentage (0..=100).
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        self.overall_accuracy * 100.0
    }

    /// True when the server graded no answers at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_questions == 0
    }
}

/// Accuracy and timing within one difficulty bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPerformance {
    pub accuracy: f64,
    pub average_time: f64,
    pub total_questions: u32,
}

/// A question the user struggled with, ranked by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengingQuestion {
    #[serde(default)]
    pub id: Option<QuestionId>,
    pub question: String,
    #[serde(default)]
    pub options: BTreeMap<OptionKey, String>,
    #[serde(rename = "correctAnswer", default)]
    pub correct_answer: Option<OptionKey>,
    #[serde(default)]
    pub related_topics: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<DifficultyLabel>,
    #[serde(default)]
    pub explanation: Option<String>,
    pub accuracy: f64,
    pub average_time: f64,
    pub attempts: u32,
}

/// One incorrectly answered question, with what the user picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrongAnswer {
    #[serde(default)]
    pub id: Option<QuestionId>,
    pub question: String,
    pub user_answer: OptionKey,
    pub correct_answer: OptionKey,
    #[serde(default)]
    pub options: BTreeMap<OptionKey, String>,
    #[serde(default)]
    pub difficulty: Option<DifficultyLabel>,
    pub time_taken: f64,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Per-question attempt statistics, one entry per question in the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPerformance {
    pub id: QuestionId,
    pub question: String,
    #[serde(default)]
    pub options: BTreeMap<OptionKey, String>,
    #[serde(rename = "correctAnswer", default)]
    pub correct_answer: Option<OptionKey>,
    #[serde(default)]
    pub related_topics: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<DifficultyLabel>,
    pub user_attempts: u32,
    pub correct_attempts: u32,
    pub accuracy: f64,
    pub average_time_taken: f64,
    #[serde(default)]
    pub explanation: Option<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
