mod controller;
mod countdown;
mod notice;
mod runner;

pub use controller::{AttemptController, AttemptPhase, AttemptSnapshot, SubmitOutcome};
pub use countdown::{Countdown, TICK_PERIOD};
pub use notice::{Notice, NoticeLevel};
pub use runner::{AttemptCommand, AttemptEvent, RunOutcome, run_attempt};
