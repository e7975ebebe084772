#![forbid(unsafe_code)]

pub mod attempt;
pub mod backend;
pub mod catalog_service;
pub mod error;
pub mod result_service;
pub mod session_service;

pub use quiz_core::Clock;

pub use attempt::{
    AttemptCommand, AttemptController, AttemptEvent, AttemptPhase, AttemptSnapshot, Notice,
    NoticeLevel, RunOutcome, SubmitOutcome, run_attempt,
};
pub use backend::{BackendConfig, HttpQuizBackend, QuizBackend};
pub use catalog_service::{Catalog, CatalogService};
pub use error::{AttemptError, BackendError, ConfigError, SessionError};
pub use result_service::ResultService;
pub use session_service::SessionService;
