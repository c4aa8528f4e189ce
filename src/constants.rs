/// Constants module to avoid magic numbers in the codebase

// Local Inference Service (Ollama)
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const OLLAMA_GENERATE_PATH: &str = "/api/generate";
pub const DEFAULT_MODEL: &str = "qwen2.5:1.5b";
pub const DEFAULT_SYSTEM_PREAMBLE: &str = "You are Pi-Swarm Security Agent.";

// Timeouts
pub const PROBE_TIMEOUT_MS: u64 = 2000;
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120;

// External Security Engine
pub const DEFAULT_ENGINE_INTERPRETER: &str = "python3";
pub const DEFAULT_ENGINE_SCRIPT: &[&str] = &["..", "dist", "pi_core.py"];

// Configuration
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_DIR: &str = ".pi";
pub const ENV_PREFIX: &str = "PI_";

// Advertised security tool capabilities (descriptive only)
pub const SECURITY_TOOLS: &[&str] = &["audit_repo", "scan_target", "analyze_code", "write_patch"];

// Exit codes
pub const EXIT_OK: u8 = 0;
pub const EXIT_USAGE: u8 = 1;
pub const EXIT_FAILURE: u8 = 1;
