pub mod browser;
pub mod client;
pub mod config;
pub mod flow;
pub mod gameplay;
pub mod question;
pub mod retry;
pub mod session;
pub mod transport;
pub mod wasm;
pub mod wire;

pub use client::{
    FEEDBACK_EMPTY_FALLBACK, FEEDBACK_ERROR_FALLBACK, GenerationClient, GenerationError,
    GenerationFailed,
};
pub use config::{GenerationConfig, OPTION_COUNT, QUESTION_COUNT};
pub use flow::{
    FEEDBACK_LOAD_FALLBACK, FeedbackOutcome, LoadingOutcome, load_questions, run_feedback,
    run_loading,
};
pub use gameplay::{NextOutcome, ResultSummary, ReviewEntry};
pub use question::{GenerationFormatError, Question, parse_questions};
pub use retry::{RetryPolicy, TransportFailure, send_with_retry};
pub use session::{FeedbackTicket, LoadingTicket, Phase, QuizSession, SessionHandle};
pub use transport::{HttpResponse, NetworkError, Timer, Transport};
pub use wire::GenerateContentRequest;
