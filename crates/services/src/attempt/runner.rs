use std::future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use quiz_core::model::{QuestionId, ResultRoute, SubmissionRequest, SubmitTrigger, TimerTick};

use super::controller::{AttemptController, AttemptPhase, AttemptSnapshot};
use super::countdown::{Countdown, TICK_PERIOD, next_tick};
use super::notice::Notice;
use crate::error::BackendError;

/// User input for a mounted attempt screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptCommand {
    Select { question_id: QuestionId, option: String },
    /// Select an option of the current question by position.
    SelectOption(usize),
    Next,
    Previous,
    Submit,
}

/// What the attempt screen should render.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptEvent {
    Updated(AttemptSnapshot),
    Notice(Notice),
}

/// How a mounted attempt screen ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Answers accepted; continue to the results view.
    Submitted(ResultRoute),
    /// No session identifier was stored; the quiz must be started first.
    Blocked,
    /// The command channel closed before submission (screen torn down).
    Abandoned,
}

struct InFlight {
    request: SubmissionRequest,
    handle: JoinHandle<Result<(), BackendError>>,
}

async fn join_in_flight(slot: &mut Option<InFlight>) -> Result<(), BackendError> {
    match slot {
        Some(flight) => match (&mut flight.handle).await {
            Ok(outcome) => outcome,
            Err(err) => Err(BackendError::Task(err.to_string())),
        },
        None => future::pending().await,
    }
}

fn spawn_submit(controller: &mut AttemptController, trigger: SubmitTrigger) -> Option<InFlight> {
    let request = match controller.begin_submit(trigger) {
        Ok(Some(request)) => request,
        Ok(None) => return None,
        Err(err) => {
            debug!(error = %err, ?trigger, "submission not started");
            return None;
        }
    };
    let backend = controller.backend();
    let payload = request.clone();
    let handle = tokio::spawn(async move {
        backend
            .submit_answers(&payload.session_id, &payload.user_id, &payload.answers)
            .await
    });
    Some(InFlight { request, handle })
}

fn publish(controller: &mut AttemptController, events: &mpsc::UnboundedSender<AttemptEvent>) {
    for notice in controller.take_notices() {
        let _ = events.send(AttemptEvent::Notice(notice));
    }
    let _ = events.send(AttemptEvent::Updated(controller.snapshot()));
}

fn apply(controller: &mut AttemptController, command: AttemptCommand, in_flight: &mut Option<InFlight>) {
    match command {
        AttemptCommand::Select {
            question_id,
            option,
        } => controller.select_answer(question_id, option),
        AttemptCommand::SelectOption(index) => {
            if !controller.select_option(index) {
                debug!(index, "option selection ignored");
            }
        }
        AttemptCommand::Next => controller.navigate_next(),
        AttemptCommand::Previous => controller.navigate_previous(),
        AttemptCommand::Submit => {
            if in_flight.is_none() {
                *in_flight = spawn_submit(controller, SubmitTrigger::Manual);
            } else {
                debug!("submit ignored while a submission is in flight");
            }
        }
    }
}

/// Drive one attempt screen until it is submitted, blocked or torn down.
///
/// Loads the controller, then cooperatively multiplexes the 1-second
/// countdown, user commands and the in-flight submission. The expiry
/// submission fires as soon as it is due, including straight after load.
/// Dropping every command sender ends the run with `Abandoned`; an in-flight
/// request is left to complete on its own.
pub async fn run_attempt(
    mut controller: AttemptController,
    mut commands: mpsc::Receiver<AttemptCommand>,
    events: mpsc::UnboundedSender<AttemptEvent>,
) -> RunOutcome {
    if let Err(err) = controller.load().await {
        debug!(error = %err, "attempt load reported an error");
    }
    publish(&mut controller, &events);
    if controller.phase() == AttemptPhase::Blocked {
        return RunOutcome::Blocked;
    }

    let mut countdown = (controller.phase() == AttemptPhase::Running)
        .then(|| Countdown::start(TICK_PERIOD));
    let mut in_flight: Option<InFlight> = None;

    if controller.should_auto_submit() {
        in_flight = spawn_submit(&mut controller, SubmitTrigger::Expiry);
        publish(&mut controller, &events);
    }

    loop {
        tokio::select! {
            () = next_tick(&mut countdown) => {
                if controller.tick() == TimerTick::Expired {
                    countdown = None;
                    if in_flight.is_none() && controller.should_auto_submit() {
                        in_flight = spawn_submit(&mut controller, SubmitTrigger::Expiry);
                    }
                }
            }
            outcome = join_in_flight(&mut in_flight) => {
                if let Some(flight) = in_flight.take() {
                    if let Ok(route) = controller.finish_submit(flight.request, outcome) {
                        publish(&mut controller, &events);
                        info!(path = %route.path(), "handing off to results");
                        return RunOutcome::Submitted(route);
                    }
                    if controller.timer().is_some_and(|t| t.is_expired()) {
                        countdown = None;
                    }
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!(quiz_id = %controller.quiz_id(), "attempt screen closed");
                    return RunOutcome::Abandoned;
                };
                apply(&mut controller, command, &mut in_flight);
            }
        }
        publish(&mut controller, &events);
    }
}
