use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Global options must come before the command. Everything from the first
/// token clap does not recognise as one of them is the command line proper.
#[derive(Parser, Debug)]
#[command(name = "pi")]
#[command(version)]
#[command(about = "Pi-OpenClaw Security Edition", long_about = None)]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "PI_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Show usage
    #[arg(long)]
    pub help: bool,

    /// The command this invocation runs, chosen by its first word
    #[arg(skip)]
    pub command: Commands,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Commands {
    /// Show usage
    #[default]
    Help,
    /// Check security system status
    Status,
    /// Run security audit/analyze/scan
    Security {
        /// Security task (audit, scan, task)
        task: Option<String>,
        /// Target followed by any further engine arguments
        args: Vec<String>,
    },
    /// Talk to the security AI
    Agent {
        /// Message words, joined with single spaces
        message: Vec<String>,
    },
    /// Setup Pi-Swarm
    Onboard,
    /// Anything else; the first element is the command name as typed
    Unknown(Vec<String>),
}

impl Commands {
    /// Classify a command line by its first word alone; trailing words never
    /// change which command runs
    pub fn classify(words: &[String]) -> Self {
        let Some((first, rest)) = words.split_first() else {
            return Commands::Help;
        };

        match first.as_str() {
            "" | "help" | "--help" => Commands::Help,
            "status" => Commands::Status,
            "security" => Commands::Security {
                task: rest.first().cloned(),
                args: rest.iter().skip(1).cloned().collect(),
            },
            "agent" => Commands::Agent {
                message: rest.to_vec(),
            },
            "onboard" => Commands::Onboard,
            _ => Commands::Unknown(words.to_vec()),
        }
    }
}

impl Cli {
    /// Parse the process arguments, exiting on malformed global options
    pub fn parse_invocation() -> Self {
        Self::try_parse_invocation(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse `argv` (program name first): leading global options through clap,
    /// the rest through [`Commands::classify`]
    pub fn try_parse_invocation<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let split = command_start(&argv);

        let mut cli = Cli::try_parse_from(&argv[..split])?;
        let words: Vec<String> = argv[split..]
            .iter()
            .map(|word| word.to_string_lossy().into_owned())
            .collect();
        cli.command = if cli.help {
            Commands::Help
        } else {
            Commands::classify(&words)
        };
        Ok(cli)
    }

    /// The single command this invocation runs
    pub fn resolved_command(&self) -> Commands {
        self.command.clone()
    }
}

/// Index of the first argument that is not a global option or an option's value
fn command_start(argv: &[OsString]) -> usize {
    let cmd = Cli::command();
    let mut index = 1;

    while let Some(token) = argv.get(index).and_then(|t| t.to_str()) {
        let (arg, inline_value) = if let Some(long) = token.strip_prefix("--") {
            let (name, value) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };
            let arg = cmd
                .get_arguments()
                .find(|a| !name.is_empty() && a.get_long() == Some(name));
            (arg, value.is_some())
        } else if let Some(short) = token.strip_prefix('-') {
            let mut chars = short.chars();
            match (chars.next(), chars.next()) {
                (Some(flag), None) => (cmd.get_arguments().find(|a| a.get_short() == Some(flag)), false),
                _ => (None, false),
            }
        } else {
            (None, false)
        };

        // -V/--version are clap's own and never listed among the arguments
        let is_version = matches!(token, "-V" | "--version");
        match arg {
            Some(arg) => {
                let takes_value = arg.get_action().takes_values();
                index += if takes_value && !inline_value { 2 } else { 1 };
            }
            None if is_version => index += 1,
            None => break,
        }
    }

    index.min(argv.len())
}
