use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{debug, info};

use super::locator::{exe_dir, resolve_script};
use crate::app::{EngineConfig, LaunchMode};
use crate::constants::EXIT_FAILURE;
use crate::utils::PiError;

/// What happened to a launched engine process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The engine ran to completion; `code` is the exit code `pi` should report
    Completed { code: u8 },
    /// The engine was left running in the background
    Detached { pid: Option<u32> },
}

/// Out-of-process security engine: an interpreter plus a script
#[derive(Debug, Clone)]
pub struct SecurityEngine {
    interpreter: String,
    script: PathBuf,
    mode: LaunchMode,
}

impl SecurityEngine {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>, mode: LaunchMode) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            mode,
        }
    }

    /// Build from the `[engine]` section, resolving the script against the executable's directory
    pub fn from_config(config: &EngineConfig) -> Result<Self, PiError> {
        let script = match config.script.as_deref() {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            configured => resolve_script(configured, &exe_dir()?),
        };
        Ok(Self::new(config.interpreter.clone(), script, config.mode))
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Whether the engine script is present; its contents are never read
    pub fn is_installed(&self) -> bool {
        self.script.is_file()
    }

    /// Run `<interpreter> <script> <task> <args...>` with the terminal's streams
    ///
    /// Arguments are handed to the child as a discrete vector, never through a shell.
    pub async fn launch(&self, task: &str, args: &[String]) -> Result<LaunchOutcome, PiError> {
        let interpreter = which::which(&self.interpreter).map_err(|e| {
            PiError::EngineError(format!("interpreter '{}' not found: {}", self.interpreter, e))
        })?;

        let mut cmd = Command::new(&interpreter);
        cmd.arg(&self.script)
            .arg(task)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        info!(
            "Launching security engine: {} {} {} ({} extra args)",
            interpreter.display(),
            self.script.display(),
            task,
            args.len()
        );

        let mut child = cmd.spawn().map_err(|e| {
            PiError::EngineError(format!("failed to start {}: {}", interpreter.display(), e))
        })?;

        match self.mode {
            LaunchMode::Wait => {
                let status = child.wait().await?;
                debug!("Security engine exited with {}", status);
                Ok(LaunchOutcome::Completed {
                    code: exit_code_from_status(status),
                })
            }
            LaunchMode::Detach => {
                let pid = child.id();
                debug!("Security engine detached (pid {:?})", pid);
                Ok(LaunchOutcome::Detached { pid })
            }
        }
    }
}

/// Map a child's exit status onto a process exit code
///
/// Signals become `128 + signo` on Unix; anything unrepresentable becomes 1.
pub fn exit_code_from_status(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(EXIT_FAILURE);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return u8::try_from(128 + signal).unwrap_or(EXIT_FAILURE);
        }
    }

    EXIT_FAILURE
}
