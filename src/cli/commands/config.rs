//! Config command implementation.
//!
//! Interactive first-run setup: asks for the server URL, username, and
//! password, validates the credentials against the authentication
//! endpoint, and persists the configuration. The password itself is
//! never written to disk.

use std::io::{self, Write};

use crate::api::HttpAuth;
use crate::cli::CliResult;
use crate::config::{ConfigPaths, TaigaConfig};
use crate::session::{Authenticator, PasswordPrompt, StdinPrompt};

/// Execute the config command.
pub fn run(paths: &ConfigPaths) -> CliResult {
    println!("\x1b[1m--- Configure Taiga CLI ---\x1b[0m");

    let api_url = read_input("Enter Taiga API URL (e.g. https://taiga.example.com): ")?;
    let username = read_input("Enter your Taiga username: ")?;
    let password = StdinPrompt.read_password("Enter your Taiga password: ")?;

    println!();
    println!("Validating credentials...");
    let auth = HttpAuth::new()?;
    auth.authenticate(&api_url, &username, &password)?;

    // Saved wholesale; any previous defaults are dropped with the old record.
    TaigaConfig::new(api_url, username).save(paths)?;
    println!("\x1b[32m✓\x1b[0m Configuration saved successfully!");
    Ok(())
}

/// Read one trimmed line from the terminal.
fn read_input(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
