#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::oneshot;
use topicquiz::{
    GenerateContentRequest, GenerationClient, GenerationConfig, HttpResponse, NetworkError, Timer,
    Transport,
};

pub enum Reply {
    Ready(Result<HttpResponse, NetworkError>),
    /// Resolves when the paired sender fires.
    Gated(oneshot::Receiver<HttpResponse>),
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<(String, GenerateContentRequest)>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests(&self) -> Vec<(String, GenerateContentRequest)> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn post(
        &self,
        url: &str,
        body: &GenerateContentRequest,
    ) -> Result<HttpResponse, NetworkError> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), body.clone()));
        let reply = self.replies.borrow_mut().pop_front();

        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Gated(receiver)) => receiver
                .await
                .map_err(|_| NetworkError::new("gate dropped")),
            None => Err(NetworkError::new("no scripted reply")),
        }
    }
}

#[derive(Default)]
pub struct RecordingTimer {
    delays: RefCell<Vec<Duration>>,
}

impl RecordingTimer {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.delays.borrow_mut().push(duration);
    }
}

pub type TestClient = GenerationClient<ScriptedTransport, RecordingTimer>;

pub fn client(replies: Vec<Reply>) -> TestClient {
    GenerationClient::new(
        GenerationConfig::new("test-key").with_base_url("http://generator.test/models/"),
        ScriptedTransport::new(replies),
        RecordingTimer::default(),
    )
}

/// Wraps `text` in the `candidates[0].content.parts[0].text` envelope.
pub fn envelope(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": text }] } }
        ]
    })
    .to_string()
}

pub fn success(text: &str) -> Reply {
    Reply::Ready(Ok(HttpResponse::new(200, envelope(text))))
}

pub fn status(code: u16) -> Reply {
    Reply::Ready(Ok(HttpResponse::new(code, r#"{"error":{}}"#)))
}

/// JSON array text with one question per `(prompt, correct)` pair; options
/// are the correct answer plus three fixed distractors.
pub fn questions_text(items: &[(&str, &str)]) -> String {
    let array: Vec<serde_json::Value> = items
        .iter()
        .map(|(prompt, correct)| {
            serde_json::json!({
                "question": prompt,
                "options": [correct, "Distractor 1", "Distractor 2", "Distractor 3"],
                "correctAnswer": correct,
            })
        })
        .collect();

    serde_json::Value::Array(array).to_string()
}

pub fn history_questions() -> String {
    questions_text(&[
        ("Year the Berlin Wall fell?", "1989"),
        ("First emperor of Rome?", "Augustus"),
        ("Where was the Magna Carta sealed?", "Runnymede"),
        ("Who led the Haitian Revolution?", "Toussaint Louverture"),
        ("Empire ruled from Cusco?", "Inca"),
    ])
}
