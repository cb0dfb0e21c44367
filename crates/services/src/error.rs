//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::OptionKey;

/// Errors emitted by the session channel transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChannelError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Errors emitted by the card state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error("no option selected")]
    NoSelection,

    #[error("option {key} is not one of the question's options")]
    UnknownOption { key: OptionKey },

    #[error("selection is locked once confirmed")]
    SelectionLocked,

    #[error("confirm is only valid while selecting")]
    NotSelecting,

    #[error("reveal is only valid after confirm")]
    NotSubmitted,

    #[error("advance is only valid after reveal")]
    NotRevealed,
}

/// Errors emitted by the quiz workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error("no question is active")]
    NoActiveQuestion,

    #[error(transparent)]
    Card(#[from] FlashcardError),
}

/// Errors emitted by `EmbedLinkService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmbedError {
    #[error("no video found: {0}")]
    NoVideo(String),

    #[error("embed lookup failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("embed endpoint returned an unusable link: {0}")]
    InvalidLink(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `UploadService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UploadError {
    #[error("upload rejected with status {status}: {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
