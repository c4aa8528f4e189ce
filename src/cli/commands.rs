use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};
use tracing::{debug, warn};

use crate::{
    app::{load_config, Config},
    constants::{EXIT_FAILURE, EXIT_OK, EXIT_USAGE, SECURITY_TOOLS},
    engine::{LaunchOutcome, SecurityEngine},
    ollama::{InferenceBackend, OllamaClient},
    utils::PiError,
};

use super::help::{write_banner, write_onboarding, write_usage};
use super::{Cli, Commands};

/// Load configuration, wire up the real collaborators and run one command on stdout
pub async fn run(cli: Cli) -> Result<u8> {
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!("Effective configuration:\n{}", toml::to_string_pretty(&config)?);
    }

    let backend = OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;

    let router = Router::new(config, backend);
    let mut stdout = io::stdout();
    router.dispatch(&cli.resolved_command(), &mut stdout).await
}

/// Prompt sent to the model for an `agent` message
pub fn build_prompt(preamble: &str, message: &str) -> String {
    if preamble.is_empty() {
        format!("User asks: {}", message)
    } else {
        format!("{} User asks: {}", preamble, message)
    }
}

/// Maps one command onto console output and an exit code
pub struct Router<B: InferenceBackend> {
    config: Config,
    backend: B,
}

impl<B: InferenceBackend> Router<B> {
    pub fn new(config: Config, backend: B) -> Self {
        Self { config, backend }
    }

    /// Locate the engine only for commands that need it
    fn engine(&self) -> Result<SecurityEngine, PiError> {
        SecurityEngine::from_config(&self.config.engine)
    }

    /// Run `command`, writing everything it prints to `out`
    ///
    /// Service failures are reported on `out` and never change the exit code.
    pub async fn dispatch<W: Write + Send>(&self, command: &Commands, out: &mut W) -> Result<u8> {
        write_banner(out)?;

        let code = match command {
            Commands::Help => {
                write_usage(out)?;
                EXIT_OK
            }
            Commands::Status => self.status(out).await?,
            Commands::Security { task, args } => self.security(task.as_deref(), args, out).await?,
            Commands::Agent { message } => self.agent(message, out).await?,
            Commands::Onboard => {
                write_onboarding(out)?;
                EXIT_OK
            }
            Commands::Unknown(argv) => {
                let name = argv.first().map(String::as_str).unwrap_or_default();
                writeln!(out, "Unknown command: {}", name)?;
                writeln!(out, "Run \"pi help\" for usage")?;
                EXIT_OK
            }
        };

        out.flush()?;
        Ok(code)
    }

    async fn status<W: Write + Send>(&self, out: &mut W) -> Result<u8> {
        match self.backend.probe().await {
            Ok(()) => writeln!(out, "🟢 Ollama (AI Brain): {}", "Connected".green())?,
            Err(e) => {
                debug!("Liveness probe failed: {}", e);
                writeln!(out, "🔴 Ollama (AI Brain): {}", "Not running".red())?;
                writeln!(out, "    Run: ollama serve")?;
            }
        }

        writeln!(out, "🛡️ Security Tools: Loaded")?;
        for tool in SECURITY_TOOLS {
            writeln!(out, "   - {}", tool)?;
        }

        writeln!(out, "🧠 Model: {}", self.config.ollama.model)?;
        match self.engine() {
            Ok(engine) if engine.is_installed() => {
                writeln!(out, "🛡️ Security Engine: {}", engine.script().display())?
            }
            Ok(_) => writeln!(
                out,
                "🟡 Security Engine: {}",
                "Not installed (simulated mode)".yellow()
            )?,
            Err(e) => {
                warn!("Security engine location unknown: {}", e);
                writeln!(out, "🔴 Security Engine: {}", e)?
            }
        }

        Ok(EXIT_OK)
    }

    async fn security<W: Write + Send>(
        &self,
        task: Option<&str>,
        args: &[String],
        out: &mut W,
    ) -> Result<u8> {
        let Some(task) = task.filter(|t| !t.is_empty()) else {
            writeln!(out, "Usage: pi security <audit|scan|task> <target>")?;
            return Ok(EXIT_USAGE);
        };

        let engine = match self.engine() {
            Ok(engine) => engine,
            Err(e) => {
                warn!("Security engine location unknown: {}", e);
                writeln!(out, "Failed to launch security engine: {}", e)?;
                return Ok(EXIT_FAILURE);
            }
        };

        if !engine.is_installed() {
            debug!(
                "No security engine at {}, simulating",
                engine.script().display()
            );
            return self.simulate_security(task, args.first().map(String::as_str), out);
        }

        // The engine writes to the same terminal
        out.flush()?;

        match engine.launch(task, args).await {
            Ok(LaunchOutcome::Completed { code }) => Ok(code),
            Ok(LaunchOutcome::Detached { .. }) => Ok(EXIT_OK),
            Err(e) => {
                warn!("Security engine launch failed: {}", e);
                writeln!(out, "Failed to launch security engine: {}", e)?;
                Ok(EXIT_FAILURE)
            }
        }
    }

    fn simulate_security<W: Write>(&self, task: &str, target: Option<&str>, out: &mut W) -> Result<u8> {
        match target {
            Some(target) => writeln!(out, "Executing: security {} {}", task, target)?,
            None => writeln!(out, "Executing: security {}", task)?,
        }
        writeln!(out, "This would call the Python security engine...")?;
        writeln!(out)?;
        writeln!(out, "🛡️ Security task initiated")?;
        writeln!(out, "   Mode: {}", task)?;
        writeln!(out, "   Target: {}", target.unwrap_or("N/A"))?;
        Ok(EXIT_OK)
    }

    async fn agent<W: Write + Send>(&self, message: &[String], out: &mut W) -> Result<u8> {
        let message = message.join(" ");
        if message.is_empty() {
            writeln!(out, "Usage: pi agent \"<your message>\"")?;
            return Ok(EXIT_USAGE);
        }

        let prompt = build_prompt(&self.config.ollama.system_preamble, &message);
        match self.backend.generate(&prompt).await {
            Ok(Some(text)) => writeln!(out, "{}", text)?,
            Ok(None) => writeln!(out, "No response")?,
            Err(e) => {
                debug!("Generation failed: {}", e);
                writeln!(out, "Error connecting to Ollama: {}", e)?;
                writeln!(out, "Make sure Ollama is running: ollama serve")?;
            }
        }

        Ok(EXIT_OK)
    }
}
