//! Request and response bodies of the `generateContent` endpoint.

use crate::config::{OPTION_COUNT, QUESTION_COUNT};

const QUIZ_SYSTEM_INSTRUCTION: &str = "You are a strict quiz data generator. Your ONLY task is to generate exactly 5 multiple-choice questions (MCQs) on the provided topic. \
You MUST return the output as a single, valid JSON array matching the provided schema. \
Do not include any markdown formatting (like ```json), introduction, or conversational text.";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationSettings>,
}

impl GenerateContentRequest {
    /// Structured-output request for the quiz questions about `topic`.
    pub fn questions(topic: &str) -> Self {
        Self {
            contents: vec![Content::text(format!(
                "Generate {QUESTION_COUNT} multiple-choice questions about '{topic}'."
            ))],
            system_instruction: Some(Content::text(QUIZ_SYSTEM_INSTRUCTION)),
            generation_config: Some(GenerationSettings {
                response_mime_type: "application/json".to_string(),
                response_schema: quiz_schema(),
            }),
        }
    }

    /// Free-text request for a short feedback message.
    pub fn feedback(score: usize, total: usize, topic: &str) -> Self {
        Self {
            contents: vec![Content::text(format!(
                "The user scored {score} out of {total} on a quiz about '{topic}'. \
                 Generate a short, witty, and personalized feedback message (max 2 sentences) \
                 addressing the user directly."
            ))],
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Text of the first user part, as sent.
    pub fn prompt(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|content| content.parts.first())
            .map(|part| part.text.as_str())
    }
}

/// Array of `{question, options[4], correctAnswer}` objects.
pub fn quiz_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "minItems": OPTION_COUNT,
                    "maxItems": OPTION_COUNT,
                    "description": "Exactly four distinct answer choices."
                },
                "correctAnswer": {
                    "type": "STRING",
                    "description": "The exact text of one of the options."
                }
            },
            "required": ["question", "options", "correctAnswer"]
        }
    })
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, when present and non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.as_str())
            .filter(|text| !text.is_empty())
    }
}
