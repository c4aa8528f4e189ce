pub mod app;
pub mod cli;
pub mod constants;
pub mod engine;
pub mod ollama;
pub mod utils;

pub use app::{load_config, Config};
pub use cli::{Cli, Commands, Router};
pub use engine::SecurityEngine;
pub use ollama::{InferenceBackend, OllamaClient};
pub use utils::PiError;
