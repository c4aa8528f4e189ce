/// Ollama integration module - Gateway
mod client;
mod traits;
mod types;

pub use client::OllamaClient;
pub use traits::InferenceBackend;
pub use types::{GenerateRequest, GenerateResponse};

#[cfg(test)]
pub use traits::MockInferenceBackend;
