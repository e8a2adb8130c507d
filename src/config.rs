pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Number of questions requested from the endpoint and kept after parsing.
pub const QUESTION_COUNT: usize = 5;
/// Number of answer choices each generated question is asked to carry.
pub const OPTION_COUNT: usize = 4;

/// Where and how the generation endpoint is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl GenerationConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Reads `QUIZ_API_KEY` and the optional `QUIZ_MODEL` captured when the
    /// crate was compiled. A missing key yields an empty one, which the
    /// endpoint rejects on the first request.
    pub fn from_build_env() -> Self {
        let config = Self::new(option_env!("QUIZ_API_KEY").unwrap_or_default());

        match option_env!("QUIZ_MODEL") {
            Some(model) if !model.is_empty() => config.with_model(model),
            _ => config,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}
