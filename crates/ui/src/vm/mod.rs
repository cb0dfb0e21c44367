mod activity_vm;
mod card_vm;
mod report_vm;
mod time_fmt;

pub use activity_vm::{RecentActivityVm, map_recent_activity};
pub use card_vm::{
    CardBackVm, CardFrontVm, OptionRowVm, difficulty_badge, map_card_back, map_card_front,
};
pub use report_vm::{
    ChallengingQuestionVm, ResultsVm, WrongAnswerVm, map_challenging_questions, map_results,
    map_wrong_answers,
};
pub use time_fmt::{format_datetime, format_seconds};
