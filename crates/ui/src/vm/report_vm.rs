use quiz_core::model::Report;

use crate::vm::time_fmt::format_seconds;

/// Headline numbers for the statistics view.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsVm {
    pub total_questions: u32,
    pub total_correct: u32,
    pub total_wrong: u32,
    pub accuracy_percent: f64,
    pub average_time: String,
}

#[must_use]
pub fn map_results(report: &Report) -> ResultsVm {
    ResultsVm {
        total_questions: report.total_questions,
        total_correct: report.total_correct,
        total_wrong: report.total_wrong,
        accuracy_percent: report.accuracy_percent(),
        average_time: format_seconds(report.average_time),
    }
}

/// One row in the wrong-answers list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrongAnswerVm {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub time_taken: String,
}

#[must_use]
pub fn map_wrong_answers(report: &Report) -> Vec<WrongAnswerVm> {
    report
        .wrong_answers
        .iter()
        .map(|wrong| WrongAnswerVm {
            question: wrong.question.clone(),
            user_answer: wrong.user_answer.to_string(),
            correct_answer: wrong.correct_answer.to_string(),
            time_taken: format_seconds(wrong.time_taken),
        })
        .collect()
}

/// One row in the challenging-questions list.
#[derive(Clone, Debug, PartialEq)]
pub struct ChallengingQuestionVm {
    pub question: String,
    pub accuracy_percent: f64,
    pub average_time: String,
    pub attempts: u32,
}

#[must_use]
pub fn map_challenging_questions(report: &Report) -> Vec<ChallengingQuestionVm> {
    report
        .challenging_questions
        .iter()
        .map(|item| ChallengingQuestionVm {
            question: item.question.clone(),
            accuracy_percent: item.accuracy * 100.0,
            average_time: format_seconds(item.average_time),
            attempts: item.attempts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_report() -> Report {
        serde_json::from_str(
            r#"{
                "total_questions": 43,
                "total_correct": 11,
                "total_wrong": 32,
                "overall_accuracy": 0.2558139534883721,
                "average_time": 2.280768250310144,
                "challenging_questions": [
                    {"question": "Hard one", "accuracy": 0.0, "average_time": 0.55, "attempts": 3}
                ],
                "wrong_answers": [
                    {
                        "question": "2+2?",
                        "user_answer": "A",
                        "correct_answer": "B",
                        "options": {"A": "3", "B": "4"},
                        "difficulty": "Easy",
                        "time_taken": 1.2
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn results_scale_accuracy_to_percent() {
        let results = map_results(&build_report());
        assert_eq!(results.total_questions, 43);
        assert!((results.accuracy_percent - 25.58).abs() < 0.01);
        assert_eq!(results.average_time, "2.3s");
    }

    #[test]
    fn wrong_answer_rows_show_both_keys() {
        let rows = map_wrong_answers(&build_report());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_answer, "A");
        assert_eq!(rows[0].correct_answer, "B");
        assert_eq!(rows[0].time_taken, "1.2s");
    }

    #[test]
    fn challenging_rows_carry_attempts() {
        let rows = map_challenging_questions(&build_report());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].attempts, 3);
        assert_eq!(rows[0].accuracy_percent, 0.0);
    }
}
