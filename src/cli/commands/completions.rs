//! Completions command implementation.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::{Cli, CliError, CliResult};

/// Execute the completions command.
pub fn run(shell: &str) -> CliResult {
    let shell_enum = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => return Err(CliError::UnsupportedShell(shell.to_string())),
    };

    let mut cmd = Cli::command();
    generate(shell_enum, &mut cmd, "taiga", &mut io::stdout());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_shell_is_rejected() {
        let err = run("powershell").unwrap_err();
        assert!(err.to_string().contains("Unsupported shell"));
        assert!(err.to_string().contains("powershell"));
    }
}
