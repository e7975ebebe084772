mod answers;
mod catalog;
mod ids;
mod question;
mod result;
mod submission;
mod timer;

pub use answers::{AnswerMap, NOT_ANSWERED};
pub use catalog::{CatalogStats, QuizSummary};
pub use ids::{IdError, QuestionId, QuizId, ResultId, SessionId, UserId};
pub use question::Question;
pub use result::{CELEBRATION_PERCENT, HistoryEntry, MARKS_PER_QUESTION, QuizResult, ResultLine};
pub use submission::{ResultRoute, SubmissionRequest, SubmissionState, SubmitTrigger};
pub use timer::{SessionTimer, TimerError, TimerTick, TimerWindow};
