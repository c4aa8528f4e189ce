use colored::Colorize;
use std::io::{self, Write};

/// Banner printed before every command
pub fn write_banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("🛡️ Pi-OpenClaw Security Edition v{}", env!("CARGO_PKG_VERSION")).bold()
    )?;
    writeln!(out, "   Enhanced OpenClaw with Security Tools")?;
    writeln!(out)
}

pub fn write_usage(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Usage: pi <command> [args...]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  status              Check security system status")?;
    writeln!(out, "  security <task>     Run security audit/analyze/scan")?;
    writeln!(out, "  agent <message>     Talk to security AI (like openclaw agent)")?;
    writeln!(out, "  onboard             Setup Pi-Swarm (like openclaw onboard)")?;
    writeln!(out, "  help                Show this help")?;
    writeln!(out)?;
    writeln!(out, "Security Tasks:")?;
    writeln!(out, "  pi security audit <file/repo>  - Security code audit")?;
    writeln!(out, "  pi security scan <ip/range>    - Network scan")?;
    writeln!(out, "  pi security task <desc>        - Autonomous security task")?;
    writeln!(out)?;
    writeln!(out, "Options (before the command):")?;
    writeln!(out, "  -c, --config <FILE>  Configuration file (env: PI_CONFIG)")?;
    writeln!(out, "  -v, --verbose        Diagnostics on stderr")?;
    writeln!(out, "  -V, --version        Print version")?;
    writeln!(out)?;
    writeln!(out, "Examples:")?;
    writeln!(out, "  pi status")?;
    writeln!(out, "  pi security audit ./contract.sol")?;
    writeln!(out, "  pi security audit https://github.com/user/repo")?;
    writeln!(out, "  pi security scan 192.168.1.1")?;
    writeln!(out, "  pi agent \"Find reentrancy bugs\"")
}

/// Onboarding narration; nothing is installed or configured
pub fn write_onboarding(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "🛡️ Pi-Swarm Security Onboarding")?;
    writeln!(out, "This will setup your security environment...")?;
    writeln!(out, "1. Installing dependencies...")?;
    writeln!(out, "2. Configuring Ollama...")?;
    writeln!(out, "3. Setup complete! Run: pi status")
}
