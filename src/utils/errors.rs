use thiserror::Error;

/// Main error type for Pi-OpenClaw
#[derive(Error, Debug)]
pub enum PiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out after {0} ms")]
    TimeoutError(u64),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Security engine error: {0}")]
    EngineError(String),
}

impl From<reqwest::Error> for PiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PiError::ApiError(format!("malformed response body: {}", err))
        } else {
            PiError::NetworkError(err.to_string())
        }
    }
}

impl From<figment::Error> for PiError {
    fn from(err: figment::Error) -> Self {
        PiError::ConfigError(err.to_string())
    }
}
