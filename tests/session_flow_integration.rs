mod common;

use common::{Reply, client, envelope, history_questions, questions_text, status, success};
use tokio::sync::oneshot;
use topicquiz::gameplay::{go_next, select_answer};
use topicquiz::{
    FEEDBACK_LOAD_FALLBACK, FeedbackOutcome, HttpResponse, LoadingOutcome, Phase, ResultSummary,
    SessionHandle, load_questions, run_feedback, run_loading,
};

fn answer_all(session: &SessionHandle, answers: &[&str]) {
    for answer in answers {
        session.update(|state| {
            select_answer(state, *answer);
            go_next(state);
        });
    }
}

#[tokio::test]
async fn loading_success_enters_quiz() {
    let session = SessionHandle::new();
    let client = client(vec![success(&history_questions())]);
    session.update(|state| state.select_topic("History"));

    let outcome = run_loading(&session, &client).await;

    assert_eq!(outcome, LoadingOutcome::Ready);
    session.read(|state| {
        assert_eq!(state.phase(), Phase::Quiz);
        assert_eq!(state.current_index(), 0);
        assert!(state.answers().is_empty());
        assert_eq!(state.questions().len(), 5);
    });
}

#[tokio::test]
async fn loading_failure_stays_on_error_until_user_returns() {
    let session = SessionHandle::new();
    let client = client(vec![status(400)]);
    session.update(|state| state.select_topic("Geology"));

    let outcome = run_loading(&session, &client).await;

    assert_eq!(outcome, LoadingOutcome::Failed);
    session.read(|state| {
        assert_eq!(state.phase(), Phase::Loading);
        assert_eq!(
            state.generation_error(),
            Some("Failed to generate quiz for 'Geology'. Please try again.")
        );
    });
    assert_eq!(run_loading(&session, &client).await, LoadingOutcome::NotStarted);
    assert_eq!(client.transport().request_count(), 1);

    session.update(|state| state.return_to_menu());
    session.read(|state| {
        assert_eq!(state.phase(), Phase::Menu);
        assert_eq!(state.generation_error(), None);
        assert_eq!(state.topic(), "");
    });
}

#[tokio::test]
async fn unparseable_questions_leave_the_quiz_empty() {
    let session = SessionHandle::new();
    let client = client(vec![success("not json")]);
    session.update(|state| state.select_topic("Volcanoes"));

    let outcome = run_loading(&session, &client).await;

    assert_eq!(outcome, LoadingOutcome::Failed);
    assert_eq!(client.transport().request_count(), 1);
    session.read(|state| {
        assert_eq!(state.phase(), Phase::Loading);
        assert!(state.questions().is_empty());
        assert_eq!(
            state.generation_error(),
            Some("Failed to generate quiz for 'Volcanoes'. Please try again.")
        );
    });
}

#[tokio::test]
async fn leaving_loading_suppresses_pending_result() {
    let session = SessionHandle::new();
    let (release, gate) = oneshot::channel();
    let client = client(vec![Reply::Gated(gate)]);
    session.update(|state| state.select_topic("History"));

    let (outcome, ()) = tokio::join!(run_loading(&session, &client), async {
        tokio::task::yield_now().await;
        session.update(|state| state.return_to_menu());
        release
            .send(HttpResponse::new(200, envelope(&history_questions())))
            .expect("request should be waiting");
    });

    assert_eq!(outcome, LoadingOutcome::Stale);
    session.read(|state| {
        assert_eq!(state.phase(), Phase::Menu);
        assert!(state.questions().is_empty());
        assert_eq!(state.generation_error(), None);
    });
}

#[tokio::test]
async fn stale_failure_is_also_suppressed() {
    let session = SessionHandle::new();
    let (release, gate) = oneshot::channel();
    let client = client(vec![Reply::Gated(gate)]);
    session.update(|state| state.select_topic("History"));

    let (outcome, ()) = tokio::join!(run_loading(&session, &client), async {
        tokio::task::yield_now().await;
        session.update(|state| {
            state.return_to_menu();
            state.select_topic("Biology");
        });
        release
            .send(HttpResponse::new(404, ""))
            .expect("request should be waiting");
    });

    assert_eq!(outcome, LoadingOutcome::Stale);
    session.read(|state| {
        assert_eq!(state.phase(), Phase::Loading);
        assert_eq!(state.topic(), "Biology");
        assert_eq!(state.generation_error(), None);
    });
}

#[tokio::test]
async fn only_the_remounted_view_applies_its_result() {
    let session = SessionHandle::new();
    let client = client(vec![
        success(&questions_text(&[("Fresh?", "yes")])),
        success(&questions_text(&[("Stale?", "no")])),
    ]);
    session.update(|state| state.select_topic("Remounts"));
    let first = session
        .update(|state| state.begin_loading())
        .expect("first mount");
    session.update(|state| state.abandon_loading(&first));
    let second = session
        .update(|state| state.begin_loading())
        .expect("second mount");

    assert_eq!(
        load_questions(&session, &client, second).await,
        LoadingOutcome::Ready
    );
    assert_eq!(
        load_questions(&session, &client, first).await,
        LoadingOutcome::Stale
    );
    session.read(|state| {
        assert_eq!(state.questions().len(), 1);
        assert_eq!(state.questions()[0].question, "Fresh?");
    });
}

#[tokio::test]
async fn feedback_fires_once_per_session() {
    let session = SessionHandle::new();
    let client = client(vec![
        success(&history_questions()),
        success("Well played!"),
        success("Should never be requested"),
    ]);
    session.update(|state| state.select_topic("History"));
    run_loading(&session, &client).await;
    answer_all(&session, &["1989", "Augustus", "Runnymede", "x", "y"]);

    let (first, second) = tokio::join!(
        run_feedback(&session, &client),
        run_feedback(&session, &client)
    );
    let third = run_feedback(&session, &client).await;

    let mut outcomes = [first, second];
    outcomes.sort_by_key(|outcome| *outcome == FeedbackOutcome::Skipped);
    assert_eq!(outcomes, [FeedbackOutcome::Stored, FeedbackOutcome::Skipped]);
    assert_eq!(third, FeedbackOutcome::Skipped);
    assert_eq!(client.transport().request_count(), 2);
    session.read(|state| {
        assert_eq!(state.feedback_text(), Some("Well played!"));
        assert!(!state.is_feedback_pending());
    });
}

#[tokio::test]
async fn feedback_pending_while_in_flight_and_dropped_after_reset() {
    let session = SessionHandle::new();
    let (release, gate) = oneshot::channel();
    let client = client(vec![success(&questions_text(&[("Only?", "yes")])), Reply::Gated(gate)]);
    session.update(|state| state.select_topic("Solo"));
    run_loading(&session, &client).await;
    answer_all(&session, &["yes"]);

    let (outcome, ()) = tokio::join!(run_feedback(&session, &client), async {
        tokio::task::yield_now().await;
        assert!(session.read(|state| state.is_feedback_pending()));
        session.update(|state| state.reset());
        release
            .send(HttpResponse::new(200, envelope("Too late")))
            .expect("request should be waiting");
    });

    assert_eq!(outcome, FeedbackOutcome::Stale);
    session.read(|state| {
        assert_eq!(state.phase(), Phase::Menu);
        assert_eq!(state.feedback_text(), None);
        assert!(!state.is_feedback_pending());
    });
}

#[tokio::test]
async fn blank_feedback_falls_back() {
    let session = SessionHandle::new();
    let client = client(vec![success(&questions_text(&[("Only?", "yes")])), success("   ")]);
    session.update(|state| state.select_topic("Solo"));
    run_loading(&session, &client).await;
    answer_all(&session, &["no"]);

    assert_eq!(run_feedback(&session, &client).await, FeedbackOutcome::Stored);
    assert_eq!(
        session.read(|state| state.feedback_text().map(str::to_string)),
        Some(FEEDBACK_LOAD_FALLBACK.to_string())
    );
}

#[tokio::test]
async fn history_scenario_scores_three_of_five() {
    let session = SessionHandle::new();
    let client = client(vec![
        success(&history_questions()),
        success("Solid grasp of history!"),
    ]);

    session.update(|state| state.select_topic("History"));
    assert_eq!(run_loading(&session, &client).await, LoadingOutcome::Ready);
    answer_all(
        &session,
        &["1989", "Nero", "Runnymede", "Simón Bolívar", "Inca"],
    );

    let summary = session.read(ResultSummary::from_session);
    assert_eq!(session.read(|state| state.phase()), Phase::Result);
    assert_eq!(summary.score, 3);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.percentage, 60);
    assert_eq!(
        summary.review.iter().filter(|entry| !entry.is_correct).count(),
        2
    );

    assert_eq!(run_feedback(&session, &client).await, FeedbackOutcome::Stored);
    assert_eq!(
        session.read(|state| state.feedback_text().map(str::to_string)),
        Some("Solid grasp of history!".to_string())
    );

    session.update(|state| state.reset());
    session.read(|state| {
        assert_eq!(state.phase(), Phase::Menu);
        assert_eq!(state.topic(), "");
        assert!(state.questions().is_empty());
        assert!(state.answers().is_empty());
        assert_eq!(state.score(), 0);
        assert_eq!(state.feedback_text(), None);
    });
}
