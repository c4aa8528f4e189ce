/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;
mod help;

pub use args::{Cli, Commands};
pub use commands::{build_prompt, run, Router};
