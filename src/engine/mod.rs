/// External security engine - Gateway
mod launcher;
mod locator;

pub use launcher::{exit_code_from_status, LaunchOutcome, SecurityEngine};
pub use locator::{exe_dir, resolve_script};
