mod answer;
mod embed;
mod ids;
mod question;
mod report;
mod user;

pub use answer::AnswerSubmission;
pub use embed::{EmbedLink, EmbedLinkError};
pub use ids::{OptionKey, QuestionId, TestId, UserEmail};
pub use question::{
    Difficulty, DifficultyLabel, Question, QuestionDraft, QuestionValidationError,
};
pub use report::{
    ChallengingQuestion, DifficultyPerformance, QuestionPerformance, Report, WrongAnswer,
};
pub use user::UserProfile;
