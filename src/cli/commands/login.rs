//! Login command implementation.
//!
//! Explicit re-authentication: prompts for the password and caches a
//! fresh token, superseding whatever was stored before.

use crate::api::HttpAuth;
use crate::cli::CliResult;
use crate::config::ConfigPaths;
use crate::session::{PasswordPrompt, SessionManager, StdinPrompt};

use super::require_config;

/// Execute the login command.
pub fn run(paths: &ConfigPaths) -> CliResult {
    let config = require_config(paths)?;

    println!("\x1b[1m--- Login to Taiga ---\x1b[0m");
    let prompt = StdinPrompt;
    let password = prompt.read_password("Enter your Taiga password: ")?;

    let auth = HttpAuth::new()?;
    let manager = SessionManager::new(paths, &auth, &prompt);
    let token = manager.login_and_save(&config, &password)?;

    println!(
        "\x1b[32m✓\x1b[0m Login successful! Token valid until {}",
        token.expiration.format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}
