use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    /// Always false: the router prints one complete answer
    pub stream: bool,
}

/// Non-streaming reply from `POST /api/generate`
///
/// Only the generated text is used; Ollama's timing and context fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// Generated text, with an empty string treated the same as a missing field
    pub fn into_text(self) -> Option<String> {
        self.response.filter(|text| !text.is_empty())
    }
}
