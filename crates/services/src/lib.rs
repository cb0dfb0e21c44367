#![forbid(unsafe_code)]

pub mod channel;
pub mod config;
pub mod embed;
pub mod error;
pub mod flashcard;
pub mod report_sink;
pub mod upload;
pub mod workflow;

pub use quiz_core::Clock;

pub use channel::{MessageTransport, ScriptedTransport, SessionChannel, WsTransport};
pub use config::QuizConfig;
pub use embed::{EmbedLinkService, LookupGeneration, LookupToken};
pub use error::{ChannelError, EmbedError, FlashcardError, QuizFlowError, UploadError};
pub use flashcard::{ActiveCard, CardState};
pub use report_sink::ReportSink;
pub use upload::{UploadFile, UploadService};
pub use workflow::{QuizSession, QuizWorkflow, SessionEvent};
