use std::sync::Arc;

use tracing::{debug, info, warn};

use quiz_core::model::{
    AnswerMap, Question, QuestionId, QuizId, ResultRoute, SessionId, SessionTimer,
    SubmissionRequest, SubmissionState, SubmitTrigger, TimerTick, UserId,
};
use storage::repository::LocalStore;
use storage::session_keys::load_session_id;

use super::notice::Notice;
use crate::Clock;
use crate::backend::QuizBackend;
use crate::error::{AttemptError, BackendError};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where the attempt screen is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    /// Waiting for the timer to resolve (also the resting state when it could not be).
    Loading,
    /// No session identifier is stored for this quiz; nothing can proceed.
    Blocked,
    /// Countdown is live.
    Running,
    /// Time is up; the automatic submission is due or has been attempted.
    Expiring,
    /// Terminal: answers were accepted by the backend.
    Submitted,
}

/// Result of a `submit` call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(ResultRoute),
    /// Another submission is in flight; nothing was sent.
    InFlight,
    /// The attempt was already submitted; nothing was sent.
    AlreadySubmitted,
}

/// Read-only view of the controller for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptSnapshot {
    pub phase: AttemptPhase,
    pub submission: SubmissionState,
    pub index: usize,
    pub total: usize,
    pub question: Option<Question>,
    pub selected: Option<String>,
    pub answered: usize,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub needs_retry: bool,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// State machine for one timed quiz attempt.
///
/// Owns the loaded questions, the recorded answers, the cursor and the local
/// countdown. All mutation happens through discrete events: `load`, user
/// actions, `tick`, and the two halves of a submission.
pub struct AttemptController {
    quiz_id: QuizId,
    user_id: UserId,
    backend: Arc<dyn QuizBackend>,
    store: Arc<dyn LocalStore>,
    clock: Clock,
    session_id: Option<SessionId>,
    questions: Vec<Question>,
    answers: AnswerMap,
    cursor: usize,
    timer: Option<SessionTimer>,
    phase: AttemptPhase,
    submission: SubmissionState,
    expiry_failed: bool,
    notices: Vec<Notice>,
}

impl AttemptController {
    #[must_use]
    pub fn new(
        quiz_id: QuizId,
        user_id: UserId,
        backend: Arc<dyn QuizBackend>,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        Self {
            quiz_id,
            user_id,
            backend,
            store,
            clock: Clock::default_clock(),
            session_id: None,
            questions: Vec::new(),
            answers: AnswerMap::new(),
            cursor: 0,
            timer: None,
            phase: AttemptPhase::Loading,
            submission: SubmissionState::NotSubmitted,
            expiry_failed: false,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    #[must_use]
    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn timer(&self) -> Option<&SessionTimer> {
        self.timer.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Backend handle, for running a submission outside `&mut self`.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn QuizBackend> {
        Arc::clone(&self.backend)
    }

    /// True when the automatic submission failed and only a manual retry is left.
    #[must_use]
    pub fn needs_retry(&self) -> bool {
        self.expiry_failed && self.submission.can_submit()
    }

    /// Drain pending notifications in the order they were raised.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn snapshot(&self) -> AttemptSnapshot {
        let question = self.current_question().cloned();
        let selected = question
            .as_ref()
            .and_then(|q| self.answers.get(q.id()))
            .map(str::to_owned);
        AttemptSnapshot {
            phase: self.phase,
            submission: self.submission,
            index: self.cursor,
            total: self.questions.len(),
            question,
            selected,
            answered: self.answers.len(),
            remaining_secs: self.timer.map_or(0, |t| t.remaining_secs()),
            total_secs: self.timer.map_or(0, |t| t.total_secs()),
            needs_retry: self.needs_retry(),
        }
    }

    // ─── Loading ──────────────────────────────────────────────────────────────

    /// Fetch the question set and resolve the session timer.
    ///
    /// The two halves are independent: a failed question fetch still lets the
    /// timer resolve, and vice versa. Every failure raises a notice; the first
    /// one is returned. A missing session identifier blocks the screen and
    /// drops any loaded questions.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Questions`, `AttemptError::MissingSession`,
    /// `AttemptError::Storage` or `AttemptError::Timer`.
    pub async fn load(&mut self) -> Result<(), AttemptError> {
        if self.phase != AttemptPhase::Loading {
            debug!(quiz_id = %self.quiz_id, phase = ?self.phase, "load ignored");
            return Ok(());
        }

        let questions = match self.backend.questions(&self.quiz_id).await {
            Ok(questions) => {
                debug!(quiz_id = %self.quiz_id, count = questions.len(), "questions loaded");
                self.questions = questions;
                self.cursor = 0;
                Ok(())
            }
            Err(err) => {
                warn!(quiz_id = %self.quiz_id, error = %err, "question fetch failed");
                self.notices.push(Notice::error("Failed to load questions"));
                Err(AttemptError::Questions(err))
            }
        };

        let session_id = match load_session_id(self.store.as_ref(), &self.quiz_id).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                self.block();
                self.notices
                    .push(Notice::error("Session ID not found! Start the quiz first."));
                return Err(AttemptError::MissingSession {
                    quiz_id: self.quiz_id.clone(),
                });
            }
            Err(err) => {
                self.block();
                self.notices
                    .push(Notice::error("Could not read the stored quiz session"));
                return Err(AttemptError::Storage(err));
            }
        };
        self.session_id = Some(session_id.clone());

        match self.backend.timer_window(&session_id).await {
            Ok(window) => {
                let timer = SessionTimer::resolve(&window, self.clock.now());
                info!(
                    session_id = %session_id,
                    remaining_secs = timer.remaining_secs(),
                    total_secs = timer.total_secs(),
                    "attempt timer resolved"
                );
                self.phase = if timer.is_expired() {
                    AttemptPhase::Expiring
                } else {
                    AttemptPhase::Running
                };
                self.timer = Some(timer);
                questions
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "timer fetch failed");
                self.notices.push(Notice::error("Failed to fetch quiz timer"));
                questions.and(Err(AttemptError::Timer(err)))
            }
        }
    }

    fn block(&mut self) {
        self.phase = AttemptPhase::Blocked;
        self.questions.clear();
        self.cursor = 0;
    }

    // ─── User actions ─────────────────────────────────────────────────────────

    fn accepts_input(&self) -> bool {
        self.phase != AttemptPhase::Blocked && self.submission.can_submit()
    }

    /// Record `option` for `question_id`, replacing any earlier choice.
    ///
    /// Ignored once a submission is in flight or done.
    pub fn select_answer(&mut self, question_id: QuestionId, option: impl Into<String>) {
        if !self.accepts_input() {
            debug!(question_id = %question_id, "selection ignored");
            return;
        }
        self.answers.select(question_id, option);
    }

    /// Select the option at `index` of the current question.
    ///
    /// Returns `false` if there is no current question, no such option, or
    /// input is no longer accepted.
    pub fn select_option(&mut self, index: usize) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some((id, option)) = self
            .current_question()
            .and_then(|q| q.option(index).map(|opt| (q.id().clone(), opt.to_owned())))
        else {
            return false;
        };
        self.answers.select(id, option);
        true
    }

    pub fn navigate_next(&mut self) {
        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
        }
    }

    pub fn navigate_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    // ─── Countdown ────────────────────────────────────────────────────────────

    /// One second of local countdown.
    ///
    /// Only counts while `Running` with no submission in progress. Reaching
    /// zero moves the controller to `Expiring`.
    pub fn tick(&mut self) -> TimerTick {
        if self.phase != AttemptPhase::Running || !self.submission.can_submit() {
            return TimerTick::Idle;
        }
        let Some(timer) = self.timer.as_mut() else {
            return TimerTick::Idle;
        };
        let tick = timer.tick();
        if tick == TimerTick::Expired {
            info!(quiz_id = %self.quiz_id, "attempt time expired");
            self.phase = AttemptPhase::Expiring;
        }
        tick
    }

    /// True when time is up, questions are present, nothing is submitted or
    /// in flight, and the automatic submission has not already failed.
    #[must_use]
    pub fn should_auto_submit(&self) -> bool {
        self.phase == AttemptPhase::Expiring
            && !self.questions.is_empty()
            && self.submission.can_submit()
            && !self.expiry_failed
    }

    // ─── Submission ───────────────────────────────────────────────────────────

    /// Claim the submission guard and build the payload.
    ///
    /// Returns `Ok(None)` without side effects if a submission is in flight or
    /// already done. Otherwise the guard moves to `Submitting` and the timer
    /// freezes until `finish_submit`.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::MissingSession` if no session identifier is known.
    pub fn begin_submit(
        &mut self,
        trigger: SubmitTrigger,
    ) -> Result<Option<SubmissionRequest>, AttemptError> {
        if !self.submission.can_submit() {
            debug!(state = ?self.submission, ?trigger, "submit ignored");
            return Ok(None);
        }
        let Some(session_id) = self.session_id.clone() else {
            self.notices.push(Notice::error("Session ID not found!"));
            return Err(AttemptError::MissingSession {
                quiz_id: self.quiz_id.clone(),
            });
        };

        self.submission = SubmissionState::Submitting;
        if let Some(timer) = self.timer.as_mut() {
            timer.freeze();
        }
        let answers = self.answers.to_submission(&self.questions);
        info!(
            session_id = %session_id,
            ?trigger,
            answered = self.answers.len(),
            total = answers.len(),
            "submitting attempt"
        );

        Ok(Some(SubmissionRequest {
            session_id,
            user_id: self.user_id.clone(),
            answers,
            trigger,
        }))
    }

    /// Apply the backend's answer to a submission started by `begin_submit`.
    ///
    /// On success the controller becomes `Submitted` for good. On failure the
    /// guard is released so a manual retry can be made; a failed expiry
    /// submission is not re-armed.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Submit` when the backend rejected the request and
    /// `AttemptError::NoSubmissionInFlight` if no submission was started.
    pub fn finish_submit(
        &mut self,
        request: SubmissionRequest,
        outcome: Result<(), BackendError>,
    ) -> Result<ResultRoute, AttemptError> {
        if !self.submission.is_in_flight() {
            warn!(state = ?self.submission, "submission result without a request in flight");
            return Err(AttemptError::NoSubmissionInFlight);
        }

        match outcome {
            Ok(()) => {
                self.submission = SubmissionState::Submitted;
                self.phase = AttemptPhase::Submitted;
                self.expiry_failed = false;
                info!(session_id = %request.session_id, "attempt submitted");
                self.notices.push(Notice::success("Quiz submitted successfully!"));
                Ok(ResultRoute::new(request.session_id, request.user_id))
            }
            Err(err) => {
                warn!(
                    session_id = %request.session_id,
                    trigger = ?request.trigger,
                    error = %err,
                    "submission failed"
                );
                self.submission = SubmissionState::NotSubmitted;
                if request.trigger == SubmitTrigger::Expiry
                    || self.phase == AttemptPhase::Expiring
                {
                    self.expiry_failed = true;
                }
                if let Some(timer) = self.timer.as_mut() {
                    if !timer.is_expired() {
                        timer.unfreeze();
                    }
                }
                self.notices.push(Notice::error("Failed to submit quiz!"));
                Err(AttemptError::Submit(err))
            }
        }
    }

    /// Submit the current answers now.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::MissingSession` or `AttemptError::Submit`.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, AttemptError> {
        self.submit_with(SubmitTrigger::Manual).await
    }

    /// Fire the automatic submission if it is due.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Submit` when the automatic submission fails.
    pub async fn submit_if_expired(&mut self) -> Result<Option<SubmitOutcome>, AttemptError> {
        if !self.should_auto_submit() {
            return Ok(None);
        }
        self.submit_with(SubmitTrigger::Expiry).await.map(Some)
    }

    async fn submit_with(&mut self, trigger: SubmitTrigger) -> Result<SubmitOutcome, AttemptError> {
        let state = self.submission;
        let Some(request) = self.begin_submit(trigger)? else {
            return Ok(if state.is_submitted() {
                SubmitOutcome::AlreadySubmitted
            } else {
                SubmitOutcome::InFlight
            });
        };
        let outcome = self
            .backend
            .submit_answers(&request.session_id, &request.user_id, &request.answers)
            .await;
        self.finish_submit(request, outcome)
            .map(SubmitOutcome::Submitted)
    }
}
