use crate::config::QUESTION_COUNT;

/// A single generated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Position in the generated set, starting from 1.
    pub id: u32,
    /// Text shown as the question prompt.
    pub question: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Exact text of the option that answers the question.
    pub correct_answer: String,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

/// Shape of one array element as the endpoint returns it.
#[derive(Debug, Clone, serde::Deserialize)]
struct QuestionPayload {
    question: String,
    options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    correct_answer: String,
}

/// Reasons a successfully transported payload could not become questions.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GenerationFormatError {
    #[error("response carried no generated text")]
    MissingPayload,
    #[error("response envelope is not valid JSON: {reason}")]
    MalformedEnvelope { reason: String },
    #[error("generated text is not valid JSON: {reason}")]
    InvalidJson { reason: String },
    #[error("generated JSON is not an array")]
    NotAnArray,
    #[error("generated array is empty")]
    Empty,
    #[error("question {index} does not match the schema: {reason}")]
    InvalidQuestion { index: usize, reason: String },
    #[error("question {index} has no text")]
    BlankQuestion { index: usize },
    #[error("question {index} has {count} options but at least 2 are required")]
    TooFewOptions { index: usize, count: usize },
    #[error("question {index} names a correct answer that is not one of its options")]
    AnswerNotAnOption { index: usize },
}

/// Parses the generated text into at most [`QUESTION_COUNT`] questions.
///
/// Every element is validated before truncation, so a malformed element
/// anywhere in the array rejects the whole payload.
///
/// # Errors
/// Returns a [`GenerationFormatError`] describing the first problem found.
pub fn parse_questions(text: &str) -> Result<Vec<Question>, GenerationFormatError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|source| GenerationFormatError::InvalidJson {
            reason: source.to_string(),
        })?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        _ => return Err(GenerationFormatError::NotAnArray),
    };

    if items.is_empty() {
        return Err(GenerationFormatError::Empty);
    }

    let mut questions = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| validate(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    questions.truncate(QUESTION_COUNT);
    Ok(questions)
}

fn validate(index: usize, item: serde_json::Value) -> Result<Question, GenerationFormatError> {
    let payload: QuestionPayload = serde_json::from_value(item).map_err(|source| {
        GenerationFormatError::InvalidQuestion {
            index,
            reason: source.to_string(),
        }
    })?;

    if payload.question.trim().is_empty() {
        return Err(GenerationFormatError::BlankQuestion { index });
    }

    if payload.options.len() < 2 {
        return Err(GenerationFormatError::TooFewOptions {
            index,
            count: payload.options.len(),
        });
    }

    if !payload.options.contains(&payload.correct_answer) {
        return Err(GenerationFormatError::AnswerNotAnOption { index });
    }

    Ok(Question {
        id: index as u32 + 1,
        question: payload.question,
        options: payload.options,
        correct_answer: payload.correct_answer,
    })
}
