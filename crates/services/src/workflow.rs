//! Orchestrates one quiz session: routes channel messages into the card
//! state machine, forwards submissions, and hands the terminal report to
//! the sink exactly once.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{AnswerSubmission, Question, Report, UserEmail};
use quiz_core::protocol::ServerMessage;
use storage::repository::ReportRepository;

use crate::channel::SessionChannel;
use crate::error::QuizFlowError;
use crate::flashcard::ActiveCard;
use crate::report_sink::ReportSink;

/// What the host view should do after one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new question became active; render the card front.
    QuestionReady,
    /// Grading echo for the previous answer; nothing required.
    AnswerAcknowledged,
    /// The report arrived; the session is over and input stops.
    Completed,
    /// The message was discarded (e.g. a question after the report).
    Ignored,
}

/// In-memory state of one quiz session.
///
/// At most one question is active at a time; a terminal report ends the
/// session for good.
pub struct QuizSession {
    active: Option<ActiveCard>,
    report: Option<Report>,
    report_persist_attempted: bool,
    answered: usize,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    #[must_use]
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            active: None,
            report: None,
            report_persist_attempted: false,
            answered: 0,
            started_at,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn active_card(&self) -> Option<&ActiveCard> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn active_card_mut(&mut self) -> Option<&mut ActiveCard> {
        self.active.as_mut()
    }

    /// Number of questions answered and forwarded so far.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.answered
    }

    /// True once the report has arrived; no further question is processed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.report.is_some()
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    fn activate(&mut self, question: Question, now: DateTime<Utc>) {
        self.active = Some(ActiveCard::activate(question, now));
    }

    fn complete(&mut self, report: Report) {
        self.active = None;
        self.report = Some(report);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("has_active", &self.active.is_some())
            .field("answered", &self.answered)
            .field("is_terminal", &self.is_terminal())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

/// Drives sessions against a clock and a report sink.
#[derive(Clone)]
pub struct QuizWorkflow {
    clock: Clock,
    sink: ReportSink,
}

impl QuizWorkflow {
    #[must_use]
    pub fn new(clock: Clock, reports: Arc<dyn ReportRepository>) -> Self {
        Self {
            clock,
            sink: ReportSink::new(clock, reports),
        }
    }

    #[must_use]
    pub fn start_session(&self) -> QuizSession {
        QuizSession::new(self.clock.now())
    }

    /// Route one inbound message, in arrival order.
    ///
    /// On the terminal `report` the sink runs exactly once per session;
    /// a persistence failure is logged and swallowed so the completion
    /// view is shown regardless. Questions arriving after the report are
    /// discarded.
    pub async fn handle_message(
        &self,
        session: &mut QuizSession,
        user: &UserEmail,
        message: ServerMessage,
    ) -> SessionEvent {
        match message {
            ServerMessage::Question(question) => {
                if session.is_terminal() {
                    tracing::debug!(question = %question.id, "ignoring question after report");
                    return SessionEvent::Ignored;
                }
                session.activate(question, self.clock.now());
                SessionEvent::QuestionReady
            }
            ServerMessage::AnswerResult(result) => {
                tracing::debug!(is_correct = result.is_correct, "answer acknowledged");
                SessionEvent::AnswerAcknowledged
            }
            ServerMessage::Report(report) => {
                if session.is_terminal() {
                    tracing::debug!("ignoring duplicate report");
                    return SessionEvent::Ignored;
                }
                session.complete(report.clone());

                if !session.report_persist_attempted {
                    session.report_persist_attempted = true;
                    if let Err(err) = self.sink.persist(user, &report).await {
                        tracing::error!(error = %err, "failed to persist session report");
                    }
                }
                SessionEvent::Completed
            }
        }
    }

    /// Advance the active card and forward its submission.
    ///
    /// The send is fire-and-forget: a closed channel drops the submission
    /// without surfacing an error. The card is discarded afterwards; the
    /// next question re-enters via `handle_message`.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NoActiveQuestion` when no card is active,
    /// and card-state errors when the card is not yet revealed.
    pub async fn advance_current(
        &self,
        session: &mut QuizSession,
        channel: &mut SessionChannel,
    ) -> Result<AnswerSubmission, QuizFlowError> {
        let Some(card) = session.active.as_mut() else {
            return Err(QuizFlowError::NoActiveQuestion);
        };

        let submission = card.advance(self.clock.now())?;
        channel.send(&submission).await;
        session.answered += 1;
        session.active = None;
        Ok(submission)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
