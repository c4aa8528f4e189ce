use async_trait::async_trait;

use crate::utils::PiError;

/// The local inference service as seen by the command router
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Liveness probe; any answer from the server counts as reachable
    async fn probe(&self) -> Result<(), PiError>;

    /// Run one non-streaming generation and return the generated text, if any
    async fn generate(&self, prompt: &str) -> Result<Option<String>, PiError>;
}
