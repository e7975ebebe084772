mod support;

use std::sync::Arc;

use chrono::Duration;
use quiz_core::model::{NOT_ANSWERED, QuestionId, SubmissionState, SubmitTrigger, TimerTick};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{AttemptController, AttemptError, AttemptPhase, SubmitOutcome};
use storage::repository::InMemoryStore;

use support::{FakeBackend, quiz_id, session_id, started_store, user_id};

async fn controller(backend: &Arc<FakeBackend>) -> AttemptController {
    AttemptController::new(quiz_id(), user_id(), backend.clone(), started_store().await)
        .with_clock(fixed_clock())
}

fn qid(raw: &str) -> QuestionId {
    QuestionId::new(raw).unwrap()
}

#[tokio::test]
async fn load_resolves_remaining_time_from_session_start() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(3)
            .with_window(fixed_now() - Duration::seconds(90), 10.0),
    );
    let mut attempt = controller(&backend).await;

    attempt.load().await.unwrap();

    assert_eq!(attempt.phase(), AttemptPhase::Running);
    assert_eq!(attempt.session_id(), Some(&session_id()));
    let timer = attempt.timer().unwrap();
    assert_eq!(timer.total_secs(), 600);
    assert_eq!(timer.remaining_secs(), 510);
    assert_eq!(attempt.questions().len(), 3);
    assert!(attempt.take_notices().is_empty());
}

#[tokio::test]
async fn late_arrival_submits_immediately_at_zero() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(3)
            .with_window(fixed_now() - Duration::minutes(11), 10.0),
    );
    let mut attempt = controller(&backend).await;

    attempt.load().await.unwrap();
    assert_eq!(attempt.timer().unwrap().remaining_secs(), 0);
    assert_eq!(attempt.phase(), AttemptPhase::Expiring);
    assert!(attempt.should_auto_submit());

    let outcome = attempt.submit_if_expired().await.unwrap();
    let Some(SubmitOutcome::Submitted(route)) = outcome else {
        panic!("expected a submission, got {outcome:?}");
    };
    assert_eq!(route.path(), "/quiz/result/session-1?uid=user-1");
    assert_eq!(attempt.phase(), AttemptPhase::Submitted);

    let sent = backend.submissions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].answers, vec![NOT_ANSWERED; 3]);
    assert_eq!(sent[0].session_id, session_id());
    assert_eq!(sent[0].user_id, user_id());
}

#[tokio::test]
async fn missing_session_blocks_the_screen() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(3)
            .with_window(fixed_now(), 10.0),
    );
    let mut attempt = AttemptController::new(
        quiz_id(),
        user_id(),
        backend.clone(),
        Arc::new(InMemoryStore::new()),
    );

    let err = attempt.load().await.unwrap_err();

    assert!(matches!(err, AttemptError::MissingSession { .. }));
    assert_eq!(attempt.phase(), AttemptPhase::Blocked);
    assert!(attempt.questions().is_empty());
    assert!(attempt.timer().is_none());
    let notices = attempt.take_notices();
    assert!(notices.iter().any(|n| n.is_error()
        && n.message == "Session ID not found! Start the quiz first."));

    assert!(!attempt.should_auto_submit());
    assert!(attempt.submit().await.is_err());
    assert_eq!(backend.submission_count(), 0);
}

#[tokio::test]
async fn question_failure_still_resolves_the_timer() {
    let backend = Arc::new(FakeBackend::new().with_window(fixed_now(), 5.0));
    let mut attempt = controller(&backend).await;

    let err = attempt.load().await.unwrap_err();

    assert!(matches!(err, AttemptError::Questions(_)));
    assert_eq!(attempt.phase(), AttemptPhase::Running);
    assert_eq!(attempt.timer().unwrap().remaining_secs(), 300);
    assert!(attempt.questions().is_empty());
    let notices = attempt.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Failed to load questions");
}

#[tokio::test]
async fn timer_failure_keeps_questions_answerable() {
    let backend = Arc::new(FakeBackend::new().with_questions(2));
    let mut attempt = controller(&backend).await;

    let err = attempt.load().await.unwrap_err();

    assert!(matches!(err, AttemptError::Timer(_)));
    assert_eq!(attempt.phase(), AttemptPhase::Loading);
    assert!(attempt.timer().is_none());
    assert_eq!(attempt.questions().len(), 2);
    assert_eq!(attempt.take_notices()[0].message, "Failed to fetch quiz timer");

    assert_eq!(attempt.tick(), TimerTick::Idle);
    assert!(!attempt.select_option(11));
    assert!(attempt.select_option(1));
    let outcome = attempt.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
    assert_eq!(backend.submissions()[0].answers, vec!["B", NOT_ANSWERED]);
}

#[tokio::test]
async fn selecting_again_replaces_the_answer() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(2)
            .with_window(fixed_now(), 10.0),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();

    attempt.select_answer(qid("q0"), "A");
    attempt.select_answer(qid("q0"), "C");

    assert_eq!(attempt.answers().get(&qid("q0")), Some("C"));
    assert_eq!(attempt.answers().len(), 1);
    assert_eq!(attempt.snapshot().selected.as_deref(), Some("C"));
}

#[tokio::test]
async fn navigation_is_clamped_to_the_question_range() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(3)
            .with_window(fixed_now(), 10.0),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();

    attempt.navigate_previous();
    assert_eq!(attempt.cursor(), 0);
    attempt.navigate_next();
    attempt.navigate_next();
    assert_eq!(attempt.cursor(), 2);
    attempt.navigate_next();
    assert_eq!(attempt.cursor(), 2);
    assert_eq!(attempt.current_question().unwrap().id(), &qid("q2"));
    attempt.navigate_previous();
    assert_eq!(attempt.snapshot().index, 1);
}

#[tokio::test]
async fn unanswered_questions_are_sent_as_sentinel_in_order() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(4)
            .with_window(fixed_now(), 10.0),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();

    attempt.select_answer(qid("q2"), "C");
    attempt.select_answer(qid("q0"), "A");
    attempt.submit().await.unwrap();

    assert_eq!(
        backend.submissions()[0].answers,
        vec!["A", NOT_ANSWERED, "C", NOT_ANSWERED]
    );
}

#[tokio::test]
async fn second_submit_sends_nothing() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(2)
            .with_window(fixed_now(), 10.0),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();

    assert!(matches!(
        attempt.submit().await.unwrap(),
        SubmitOutcome::Submitted(_)
    ));
    assert_eq!(
        attempt.submit().await.unwrap(),
        SubmitOutcome::AlreadySubmitted
    );
    assert_eq!(attempt.submit_if_expired().await.unwrap(), None);
    assert_eq!(backend.submission_count(), 1);

    let notices = attempt.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Quiz submitted successfully!");
}

#[tokio::test]
async fn in_flight_submission_holds_the_guard() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(2)
            .with_window(fixed_now(), 10.0),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();
    attempt.select_answer(qid("q0"), "A");

    let request = attempt
        .begin_submit(SubmitTrigger::Manual)
        .unwrap()
        .unwrap();
    assert_eq!(attempt.submission(), SubmissionState::Submitting);
    assert!(attempt.begin_submit(SubmitTrigger::Manual).unwrap().is_none());
    assert!(attempt.begin_submit(SubmitTrigger::Expiry).unwrap().is_none());
    assert_eq!(attempt.submit().await.unwrap(), SubmitOutcome::InFlight);

    // Frozen timer and locked answers while the request is out.
    assert_eq!(attempt.tick(), TimerTick::Idle);
    assert_eq!(attempt.timer().unwrap().remaining_secs(), 600);
    attempt.select_answer(qid("q0"), "B");
    assert_eq!(attempt.answers().get(&qid("q0")), Some("A"));

    let route = attempt.finish_submit(request, Ok(())).unwrap();
    assert_eq!(route.session_id, session_id());
    assert_eq!(attempt.submission(), SubmissionState::Submitted);
    assert_eq!(backend.submission_count(), 0);
}

#[tokio::test]
async fn finish_without_begin_is_rejected() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(1)
            .with_window(fixed_now(), 10.0),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();
    let request = attempt
        .begin_submit(SubmitTrigger::Manual)
        .unwrap()
        .unwrap();
    attempt.finish_submit(request.clone(), Ok(())).unwrap();

    assert!(matches!(
        attempt.finish_submit(request, Ok(())),
        Err(AttemptError::NoSubmissionInFlight)
    ));
}

#[tokio::test]
async fn failed_manual_submit_can_be_retried() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(2)
            .with_window(fixed_now(), 10.0)
            .failing_submits(1),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();

    let err = attempt.submit().await.unwrap_err();
    assert!(matches!(err, AttemptError::Submit(_)));
    assert_eq!(attempt.submission(), SubmissionState::NotSubmitted);
    assert_eq!(attempt.phase(), AttemptPhase::Running);
    assert!(!attempt.needs_retry());
    assert_eq!(attempt.take_notices()[0].message, "Failed to submit quiz!");

    // The countdown resumes after a failed manual submit with time left.
    assert_eq!(attempt.tick(), TimerTick::Ticked { remaining_secs: 599 });

    assert!(matches!(
        attempt.submit().await.unwrap(),
        SubmitOutcome::Submitted(_)
    ));
    assert_eq!(backend.submission_count(), 2);
}

#[tokio::test]
async fn failed_expiry_submit_waits_for_manual_retry() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(2)
            .with_window(fixed_now() - Duration::minutes(20), 10.0)
            .failing_submits(1),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();

    assert!(attempt.submit_if_expired().await.is_err());
    assert_eq!(attempt.phase(), AttemptPhase::Expiring);
    assert!(attempt.needs_retry());
    assert!(attempt.snapshot().needs_retry);
    assert!(!attempt.should_auto_submit());
    assert_eq!(attempt.submit_if_expired().await.unwrap(), None);
    assert_eq!(backend.submission_count(), 1);

    assert!(matches!(
        attempt.submit().await.unwrap(),
        SubmitOutcome::Submitted(_)
    ));
    assert!(!attempt.needs_retry());
    assert_eq!(backend.submission_count(), 2);
}

#[tokio::test]
async fn countdown_reaches_expiry_and_stops() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(1)
            .with_window(fixed_now(), 0.05),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();

    assert_eq!(attempt.tick(), TimerTick::Ticked { remaining_secs: 2 });
    assert_eq!(attempt.tick(), TimerTick::Ticked { remaining_secs: 1 });
    assert!(!attempt.should_auto_submit());
    assert_eq!(attempt.tick(), TimerTick::Expired);
    assert_eq!(attempt.phase(), AttemptPhase::Expiring);
    assert_eq!(attempt.tick(), TimerTick::Idle);
    assert!(attempt.should_auto_submit());
}

#[tokio::test]
async fn expiry_without_questions_is_not_submitted() {
    let backend = Arc::new(FakeBackend::new().with_window(fixed_now() - Duration::hours(1), 10.0));
    let mut attempt = controller(&backend).await;
    let _ = attempt.load().await;

    assert_eq!(attempt.phase(), AttemptPhase::Expiring);
    assert!(!attempt.should_auto_submit());
    assert_eq!(attempt.submit_if_expired().await.unwrap(), None);
    assert_eq!(backend.submission_count(), 0);
}

#[tokio::test]
async fn second_load_is_ignored() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_questions(2)
            .with_window(fixed_now(), 10.0),
    );
    let mut attempt = controller(&backend).await;
    attempt.load().await.unwrap();
    attempt.navigate_next();
    attempt.tick();

    attempt.load().await.unwrap();
    assert_eq!(attempt.cursor(), 1);
    assert_eq!(attempt.timer().unwrap().remaining_secs(), 599);
}
