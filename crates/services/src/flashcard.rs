//! Per-question card lifecycle:
//! `Idle → Selecting → Submitted → Revealed → Advancing`.
//!
//! A new question resets the cycle; correctness is computed locally at
//! confirm time so the reveal never waits on the network.

use chrono::{DateTime, Utc};

use quiz_core::model::{AnswerSubmission, OptionKey, Question};
use quiz_core::time::elapsed_seconds;

use crate::error::FlashcardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// No question active.
    Idle,
    /// Collecting a selection; last write wins.
    Selecting,
    /// Selection locked, correctness computed.
    Submitted,
    /// Back of the card shown (explanation, correctness).
    Revealed,
    /// Submission built and handed off; the card is spent.
    Advancing,
}

/// The one active question and its answer lifecycle.
///
/// At most one `ActiveCard` exists per session at any time; the workflow
/// discards it when the card advances or the session completes.
#[derive(Debug, Clone)]
pub struct ActiveCard {
    question: Question,
    state: CardState,
    activated_at: DateTime<Utc>,
    selected: Option<OptionKey>,
    is_correct: Option<bool>,
}

impl ActiveCard {
    /// Activate a question: enters `Selecting` and records the activation
    /// timestamp that elapsed time is measured from.
    #[must_use]
    pub fn activate(question: Question, now: DateTime<Utc>) -> Self {
        Self {
            question,
            state: CardState::Selecting,
            activated_at: now,
            selected: None,
            is_correct: None,
        }
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn state(&self) -> CardState {
        self.state
    }

    #[must_use]
    pub fn activated_at(&self) -> DateTime<Utc> {
        self.activated_at
    }

    #[must_use]
    pub fn selected(&self) -> Option<&OptionKey> {
        self.selected.as_ref()
    }

    /// Correctness of the locked-in selection; `None` before confirm.
    #[must_use]
    pub fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    /// Whether confirm would currently succeed.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.state == CardState::Selecting && self.selected.is_some()
    }

    /// Pick an option. Overwrites any prior pick.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::SelectionLocked` once the card is past
    /// `Selecting`, and `FlashcardError::UnknownOption` for a key the
    /// question does not offer.
    pub fn select(&mut self, key: OptionKey) -> Result<(), FlashcardError> {
        if self.state != CardState::Selecting {
            return Err(FlashcardError::SelectionLocked);
        }
        if !self.question.has_option(&key) {
            return Err(FlashcardError::UnknownOption { key });
        }
        self.selected = Some(key);
        Ok(())
    }

    /// Lock the selection and grade it locally: `Selecting → Submitted`.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::NoSelection` when nothing is selected (the
    /// host treats this as a disabled confirm action — no state change),
    /// and `FlashcardError::NotSelecting` outside the `Selecting` state.
    pub fn confirm(&mut self) -> Result<bool, FlashcardError> {
        if self.state != CardState::Selecting {
            return Err(FlashcardError::NotSelecting);
        }
        let Some(selected) = self.selected.as_ref() else {
            return Err(FlashcardError::NoSelection);
        };

        let correct = self.question.is_correct(selected);
        self.is_correct = Some(correct);
        self.state = CardState::Submitted;
        Ok(correct)
    }

    /// Flip to the back of the card: `Submitted → Revealed`. Purely local.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::NotSubmitted` outside the `Submitted`
    /// state.
    pub fn reveal(&mut self) -> Result<(), FlashcardError> {
        if self.state != CardState::Submitted {
            return Err(FlashcardError::NotSubmitted);
        }
        self.state = CardState::Revealed;
        Ok(())
    }

    /// Leave the card: `Revealed → Advancing`. Computes elapsed seconds
    /// from the activation timestamp and builds the one submission this
    /// question will ever produce.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::NotRevealed` outside the `Revealed` state.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<AnswerSubmission, FlashcardError> {
        if self.state != CardState::Revealed {
            return Err(FlashcardError::NotRevealed);
        }
        let selected = self
            .selected
            .clone()
            .ok_or(FlashcardError::NoSelection)?;

        self.state = CardState::Advancing;
        Ok(AnswerSubmission::new(
            selected,
            elapsed_seconds(self.activated_at, now),
        ))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{DifficultyLabel, QuestionDraft, QuestionId};
    use quiz_core::time::fixed_now;
    use std::collections::BTreeMap;

    fn build_question() -> Question {
        QuestionDraft {
            id: QuestionId::new(1),
            question: "2+2?".into(),
            options: BTreeMap::from([
                (OptionKey::new("A"), "3".into()),
                (OptionKey::new("B"), "4".into()),
            ]),
            correct_answer: OptionKey::new("B"),
            explanation: Some("The correct answer is 4.".into()),
            difficulty: DifficultyLabel::new("Easy"),
            related_topics: vec!["Math".into()],
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn selection_is_last_write_wins() {
        let mut card = ActiveCard::activate(build_question(), fixed_now());
        card.select(OptionKey::new("A")).unwrap();
        card.select(OptionKey::new("B")).unwrap();
        assert_eq!(card.selected(), Some(&OptionKey::new("B")));
    }

    #[test]
    fn confirm_without_selection_does_not_transition() {
        let mut card = ActiveCard::activate(build_question(), fixed_now());
        assert!(!card.can_confirm());
        let err = card.confirm().unwrap_err();
        assert_eq!(err, FlashcardError::NoSelection);
        assert_eq!(card.state(), CardState::Selecting);
    }

    #[test]
    fn confirm_locks_selection_and_grades_it() {
        let mut card = ActiveCard::activate(build_question(), fixed_now());
        card.select(OptionKey::new("B")).unwrap();
        assert!(card.confirm().unwrap());
        assert_eq!(card.state(), CardState::Submitted);
        assert_eq!(card.is_correct(), Some(true));

        let err = card.select(OptionKey::new("A")).unwrap_err();
        assert_eq!(err, FlashcardError::SelectionLocked);
    }

    #[test]
    fn wrong_selection_grades_false() {
        let mut card = ActiveCard::activate(build_question(), fixed_now());
        card.select(OptionKey::new("A")).unwrap();
        assert!(!card.confirm().unwrap());
        assert_eq!(card.is_correct(), Some(false));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut card = ActiveCard::activate(build_question(), fixed_now());
        let err = card.select(OptionKey::new("Z")).unwrap_err();
        assert!(matches!(err, FlashcardError::UnknownOption { .. }));
        assert_eq!(card.selected(), None);
    }

    #[test]
    fn full_cycle_produces_the_wire_submission() {
        let mut card = ActiveCard::activate(build_question(), fixed_now());
        card.select(OptionKey::new("B")).unwrap();
        card.confirm().unwrap();
        card.reveal().unwrap();
        assert_eq!(card.state(), CardState::Revealed);

        let submission = card
            .advance(fixed_now() + Duration::milliseconds(2500))
            .unwrap();
        assert_eq!(card.state(), CardState::Advancing);
        assert_eq!(
            submission.to_wire().unwrap(),
            r#"{"answer":"B","time_taken":2.5}"#
        );
    }

    #[test]
    fn elapsed_time_is_measured_from_activation_not_session_start() {
        // Activation happens a minute into the session; elapsed must be
        // relative to the card, not the session.
        let activated = fixed_now() + Duration::minutes(1);
        let mut card = ActiveCard::activate(build_question(), activated);
        card.select(OptionKey::new("A")).unwrap();
        card.confirm().unwrap();
        card.reveal().unwrap();

        let submission = card.advance(activated + Duration::seconds(3)).unwrap();
        assert!((submission.time_taken - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn elapsed_time_never_negative_on_clock_skew() {
        let mut card = ActiveCard::activate(build_question(), fixed_now());
        card.select(OptionKey::new("A")).unwrap();
        card.confirm().unwrap();
        card.reveal().unwrap();

        let submission = card.advance(fixed_now() - Duration::seconds(5)).unwrap();
        assert_eq!(submission.time_taken, 0.0);
    }

    #[test]
    fn advance_requires_reveal() {
        let mut card = ActiveCard::activate(build_question(), fixed_now());
        card.select(OptionKey::new("B")).unwrap();
        card.confirm().unwrap();
        let err = card.advance(fixed_now()).unwrap_err();
        assert_eq!(err, FlashcardError::NotRevealed);
    }
}
