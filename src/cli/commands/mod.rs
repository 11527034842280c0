//! Command implementations for the taiga CLI.
//!
//! This module contains the actual implementations of CLI commands,
//! separated from the argument parsing definitions in cli/mod.rs.

pub mod completions;
pub mod config;
pub mod login;
pub mod project;
pub mod sprint;
pub mod stories;

use crate::api::{HttpApi, HttpAuth, UserStory};
use crate::cli::CliError;
use crate::config::{ConfigPaths, TaigaConfig};
use crate::session::{SessionError, SessionManager, StdinPrompt};
use crate::stats::UNASSIGNED;

/// Load the config, failing with the not-configured remediation message.
pub(crate) fn require_config(paths: &ConfigPaths) -> Result<TaigaConfig, CliError> {
    Ok(TaigaConfig::load(paths)?.ok_or(SessionError::NotConfigured)?)
}

/// Establish a session and build an authenticated API client.
///
/// This is the single entry into the credential lifecycle for every
/// remote-querying command: valid cached token, or password prompt plus
/// one re-authentication.
pub(crate) fn connect(paths: &ConfigPaths) -> Result<(TaigaConfig, HttpApi), CliError> {
    let auth = HttpAuth::new()?;
    let prompt = StdinPrompt;
    let credentials = SessionManager::new(paths, &auth, &prompt).ensure_session()?;
    let config = require_config(paths)?;
    let api = HttpApi::with_token(credentials.api_url, credentials.token)?;
    Ok((config, api))
}

/// Render one story the way every listing report prints it.
pub(crate) fn story_line(story: &UserStory) -> String {
    let assignee = story.assignee().unwrap_or(UNASSIGNED);
    let status = if story.is_closed { "Closed" } else { "Open" };
    format!(
        "{} \x1b[2m(Assigned to: {}, Status: {}, Points: {})\x1b[0m",
        story.subject,
        assignee,
        status,
        story.points()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AssignedInfo;

    #[test]
    fn test_story_line_renders_assignee_and_status() {
        let story = UserStory {
            subject: "Fix login".to_string(),
            is_closed: true,
            total_points: Some(5.0),
            assigned_to_extra_info: Some(AssignedInfo {
                username: "alice".to_string(),
                full_name_display: None,
            }),
            milestone_name: None,
        };
        let line = story_line(&story);
        assert!(line.contains("Fix login"));
        assert!(line.contains("Assigned to: alice"));
        assert!(line.contains("Status: Closed"));
        assert!(line.contains("Points: 5"));
    }

    #[test]
    fn test_story_line_unassigned_does_not_panic() {
        let story = UserStory {
            subject: "Orphan".to_string(),
            is_closed: false,
            total_points: None,
            assigned_to_extra_info: None,
            milestone_name: None,
        };
        let line = story_line(&story);
        assert!(line.contains("Assigned to: Unassigned"));
        assert!(line.contains("Points: 0"));
    }
}
