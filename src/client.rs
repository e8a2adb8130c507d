use crate::config::GenerationConfig;
use crate::question::{GenerationFormatError, Question, parse_questions};
use crate::retry::{RetryPolicy, TransportFailure, send_with_retry};
use crate::transport::{Timer, Transport};
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// Stored when the feedback response carries no text.
pub const FEEDBACK_EMPTY_FALLBACK: &str = "Great job! You've completed the quiz.";
/// Stored when the feedback request fails outright.
pub const FEEDBACK_ERROR_FALLBACK: &str = "The AI is currently resting. Great effort on the quiz!";

/// Internal cause behind a [`GenerationFailed`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error(transparent)]
    Transport(#[from] TransportFailure),
    #[error(transparent)]
    Format(#[from] GenerationFormatError),
}

/// Question generation failed; the message is the same whatever the cause.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Failed to generate quiz for '{topic}'. Please try again.")]
pub struct GenerationFailed {
    pub topic: String,
    #[source]
    pub cause: GenerationError,
}

impl GenerationFailed {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Talks to the generation endpoint through a [`Transport`], waiting on a
/// [`Timer`] between retries.
pub struct GenerationClient<T, S> {
    config: GenerationConfig,
    policy: RetryPolicy,
    transport: T,
    timer: S,
}

impl<T: Transport, S: Timer> GenerationClient<T, S> {
    pub fn new(config: GenerationConfig, transport: T, timer: S) -> Self {
        Self {
            config,
            policy: RetryPolicy::default(),
            transport,
            timer,
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn timer(&self) -> &S {
        &self.timer
    }

    /// Requests up to five multiple-choice questions about `topic`.
    ///
    /// # Errors
    /// Returns [`GenerationFailed`] when the transport gives up or the
    /// payload does not validate. The cause is logged and kept as the
    /// error source.
    pub async fn request_questions(&self, topic: &str) -> Result<Vec<Question>, GenerationFailed> {
        self.try_request_questions(topic).await.map_err(|cause| {
            log::error!("question generation for '{topic}' failed: {cause}");
            GenerationFailed {
                topic: topic.to_string(),
                cause,
            }
        })
    }

    async fn try_request_questions(&self, topic: &str) -> Result<Vec<Question>, GenerationError> {
        let body = self.send(&GenerateContentRequest::questions(topic)).await?;
        let text = body.first_text().ok_or(GenerationFormatError::MissingPayload)?;
        let questions = parse_questions(text)?;

        log::debug!("generated {} questions about '{topic}'", questions.len());
        Ok(questions)
    }

    /// Requests a short personalized message. Never fails: a missing text
    /// or a failed request yields a fixed fallback.
    pub async fn request_feedback(&self, score: usize, total: usize, topic: &str) -> String {
        let request = GenerateContentRequest::feedback(score, total, topic);

        match self.send(&request).await {
            Ok(response) => response
                .first_text()
                .map(str::to_string)
                .unwrap_or_else(|| FEEDBACK_EMPTY_FALLBACK.to_string()),
            Err(error) => {
                log::error!("feedback generation failed: {error}");
                FEEDBACK_ERROR_FALLBACK.to_string()
            }
        }
    }

    async fn send(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        log::debug!("POST {}{}:generateContent", self.config.base_url, self.config.model);

        let response = send_with_retry(
            &self.transport,
            &self.timer,
            &self.policy,
            &self.config.endpoint(),
            request,
        )
        .await?;

        serde_json::from_str(&response.body).map_err(|source| {
            GenerationFormatError::MalformedEnvelope {
                reason: source.to_string(),
            }
            .into()
        })
    }
}
