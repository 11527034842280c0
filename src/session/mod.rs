//! Session and credential lifecycle.
//!
//! [`SessionManager`] owns the cached-token flow: a persisted token that
//! is still valid yields credentials with no network traffic; an absent
//! or expired token triggers a password prompt and exactly one
//! re-authentication call. A failed re-authentication is surfaced as
//! [`SessionError::ReauthFailed`] and leaves the persisted token alone.

use std::io::{self, Write};

use chrono::Local;

use crate::api::ApiError;
use crate::config::{ConfigPaths, SessionToken, StoreError, TaigaConfig};

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No configuration record exists yet.
    #[error("Configuration not found. Run `taiga config` first")]
    NotConfigured,
    /// The transparent re-login was rejected.
    #[error("Re-login failed: {0}. Run `taiga login` manually")]
    ReauthFailed(String),
    /// A store read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Reading the password from the terminal failed.
    #[error("Failed to read password: {0}")]
    Prompt(#[from] io::Error),
}

/// Everything needed to build an authenticated client.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Base URL of the Taiga instance.
    pub api_url: String,
    /// Bearer token, valid at the time it was produced.
    pub token: String,
}

/// The remote authentication endpoint, as the session manager sees it.
pub trait Authenticator {
    /// Exchange credentials for a bearer token.
    fn authenticate(
        &self,
        api_url: &str,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError>;
}

/// Interactive password source.
pub trait PasswordPrompt {
    /// Ask the user for their password.
    fn read_password(&self, prompt: &str) -> io::Result<String>;
}

/// Terminal-backed password prompt.
pub struct StdinPrompt;

impl PasswordPrompt for StdinPrompt {
    fn read_password(&self, prompt: &str) -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Owner of the cached-token lifecycle.
pub struct SessionManager<'a> {
    paths: &'a ConfigPaths,
    auth: &'a dyn Authenticator,
    prompt: &'a dyn PasswordPrompt,
}

impl<'a> SessionManager<'a> {
    /// Wire a manager to its stores and collaborators.
    pub fn new(
        paths: &'a ConfigPaths,
        auth: &'a dyn Authenticator,
        prompt: &'a dyn PasswordPrompt,
    ) -> Self {
        Self {
            paths,
            auth,
            prompt,
        }
    }

    /// Produce credentials, re-authenticating transparently if needed.
    ///
    /// A valid cached token is returned as-is with zero network calls.
    /// Otherwise the user is prompted for their password and the
    /// authentication endpoint is called at most once; on success the
    /// new token is persisted (superseding the old record), on failure
    /// the persisted token is left untouched.
    pub fn ensure_session(&self) -> Result<Credentials, SessionError> {
        let config = TaigaConfig::load(self.paths)?.ok_or(SessionError::NotConfigured)?;

        if let Some(cached) = SessionToken::load(self.paths)? {
            if cached.is_valid(Local::now()) {
                return Ok(Credentials {
                    api_url: config.api_url,
                    token: cached.token,
                });
            }
            println!("\x1b[2mToken is invalid or expired. Attempting re-login...\x1b[0m");
        }

        let password = self.prompt.read_password("Enter your Taiga password: ")?;
        let token = self.login_and_save(&config, &password)?;
        Ok(Credentials {
            api_url: config.api_url,
            token: token.token,
        })
    }

    /// Authenticate with a known password and persist the new token.
    ///
    /// Used both by the transparent re-login above and by the explicit
    /// `taiga login` command.
    pub fn login_and_save(
        &self,
        config: &TaigaConfig,
        password: &str,
    ) -> Result<SessionToken, SessionError> {
        let token = self
            .auth
            .authenticate(&config.api_url, &config.username, password)
            .map_err(|e| SessionError::ReauthFailed(e.to_string()))?;

        let session = SessionToken::issue(token);
        session.save(self.paths)?;
        Ok(session)
    }
}
