use crate::model::{SessionId, UserId};

/// Guard for the exactly-once submission of an attempt.
///
/// `Submitting` covers the window where a request is in flight; both the
/// manual and the expiry path must see `NotSubmitted` to start a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    NotSubmitted,
    Submitting,
    Submitted,
}

impl SubmissionState {
    #[must_use]
    pub fn can_submit(self) -> bool {
        matches!(self, Self::NotSubmitted)
    }

    #[must_use]
    pub fn is_submitted(self) -> bool {
        matches!(self, Self::Submitted)
    }

    #[must_use]
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// What caused a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    Expiry,
}

/// A fully built submission, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub answers: Vec<String>,
    pub trigger: SubmitTrigger,
}

/// Where the results view for a submitted attempt lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRoute {
    pub session_id: SessionId,
    pub user_id: UserId,
}

impl ResultRoute {
    #[must_use]
    pub fn new(session_id: SessionId, user_id: UserId) -> Self {
        Self {
            session_id,
            user_id,
        }
    }

    /// Path of the results screen, e.g. `/quiz/result/s-1?uid=u-1`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/quiz/result/{}?uid={}", self.session_id, self.user_id)
    }
}
