use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_ENGINE_INTERPRETER, DEFAULT_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_SYSTEM_PREAMBLE, ENV_PREFIX, HTTP_REQUEST_TIMEOUT_SECS, LOCAL_CONFIG_DIR,
    PROBE_TIMEOUT_MS,
};
use crate::utils::PiError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Local inference service configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// External security engine configuration
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Ollama configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base address of the Ollama server
    pub base_url: String,
    /// Model used for generation requests
    pub model: String,
    /// Liveness probe deadline in milliseconds
    pub probe_timeout_ms: u64,
    /// Generation request timeout in seconds
    pub request_timeout_secs: u64,
    /// Preamble placed before the user's message
    pub system_preamble: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            probe_timeout_ms: PROBE_TIMEOUT_MS,
            request_timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
            system_preamble: DEFAULT_SYSTEM_PREAMBLE.to_string(),
        }
    }
}

/// What the router does with the engine process after spawning it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Wait for the engine, reap it and exit with its exit code
    #[default]
    Wait,
    /// Return as soon as the engine is spawned; it may outlive `pi`
    Detach,
}

/// Security engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interpreter used to run the engine script
    pub interpreter: String,
    /// Engine script; relative paths are resolved against the executable's directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
    /// Child process lifecycle
    pub mode: LaunchMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_ENGINE_INTERPRETER.to_string(),
            script: None,
            mode: LaunchMode::Wait,
        }
    }
}

/// Load configuration from multiple sources
///
/// Precedence, lowest first: defaults, global config, `.pi/config.toml`,
/// the explicit `--config` file, then `PI_*` environment variables.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, PiError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(global_config) = global_config_path() {
        if global_config.exists() {
            debug!("Merging global config {}", global_config.display());
            figment = figment.merge(Toml::file(&global_config));
        }
    }

    let local_config = PathBuf::from(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME);
    if local_config.exists() {
        debug!("Merging project config {}", local_config.display());
        figment = figment.merge(Toml::file(&local_config));
    }

    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(PiError::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        debug!("Merging explicit config {}", path.display());
        figment = figment.merge(Toml::file(path));
    }

    // PI_OLLAMA__BASE_URL -> ollama.base_url
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    Ok(figment.extract()?)
}

/// Location of the user-wide configuration file, if the platform has one
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pi-openclaw")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
