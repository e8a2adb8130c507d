//! Asynchronous flows bound to the Loading and Result views.
//!
//! Both flows take their ticket before the first `.await` and re-check it
//! afterwards, so a view that disappears in between leaves state alone.

use crate::client::GenerationClient;
use crate::session::{LoadingTicket, SessionHandle};
use crate::transport::{Timer, Transport};

/// Stored when the feedback flow ends up with no usable text.
pub const FEEDBACK_LOAD_FALLBACK: &str = "Great job completing the quiz! (Feedback failed to load.)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingOutcome {
    /// Not in Loading, or a request for this entry is already in flight.
    NotStarted,
    Ready,
    Failed,
    /// The ticket was invalidated before the request settled.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Skipped,
    Stored,
    Stale,
}

/// Takes the Loading ticket and runs the question request under it.
pub async fn run_loading<T: Transport, S: Timer>(
    session: &SessionHandle,
    client: &GenerationClient<T, S>,
) -> LoadingOutcome {
    match session.update(|state| state.begin_loading()) {
        Some(ticket) => load_questions(session, client, ticket).await,
        None => LoadingOutcome::NotStarted,
    }
}

/// Requests questions for `ticket` and applies the result only while the
/// ticket is still live.
pub async fn load_questions<T: Transport, S: Timer>(
    session: &SessionHandle,
    client: &GenerationClient<T, S>,
    ticket: LoadingTicket,
) -> LoadingOutcome {
    let result = client.request_questions(&ticket.topic).await;

    session.update(|state| {
        if !state.is_live(&ticket) {
            log::debug!("dropping stale result for '{}'", ticket.topic);
            return LoadingOutcome::Stale;
        }

        match result {
            Ok(questions) => {
                state.questions_ready(questions);
                LoadingOutcome::Ready
            }
            Err(error) => {
                state.generation_failed(error.message());
                LoadingOutcome::Failed
            }
        }
    })
}

/// Fires the feedback request at most once per session.
pub async fn run_feedback<T: Transport, S: Timer>(
    session: &SessionHandle,
    client: &GenerationClient<T, S>,
) -> FeedbackOutcome {
    let Some(ticket) = session.update(|state| state.begin_feedback()) else {
        return FeedbackOutcome::Skipped;
    };

    let message = client
        .request_feedback(ticket.score, ticket.total, &ticket.topic)
        .await;
    let message = if message.trim().is_empty() {
        log::error!("feedback came back empty");
        FEEDBACK_LOAD_FALLBACK.to_string()
    } else {
        message
    };

    if session.update(|state| state.finish_feedback(&ticket, message)) {
        FeedbackOutcome::Stored
    } else {
        FeedbackOutcome::Stale
    }
}
