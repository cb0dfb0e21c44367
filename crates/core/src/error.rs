use thiserror::Error;

use crate::model::{EmbedLinkError, QuestionValidationError};
use crate::protocol::DecodeError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionValidationError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    EmbedLink(#[from] EmbedLinkError),
}
