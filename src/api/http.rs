//! Blocking HTTP implementation of the Taiga API collaborator.
//!
//! One synchronous request per call, awaited before anything else
//! proceeds; the client carries a 30-second timeout and otherwise leaves
//! transport behaviour to reqwest defaults.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::models::{Milestone, Project, User, UserStory};
use super::{ApiError, StoryFilter, TaigaApi};
use crate::session::Authenticator;

/// Path prefix of the Taiga REST API.
const API_PREFIX: &str = "api/v1";

/// Payload returned by the authentication endpoint.
///
/// The server echoes the full user detail back; only the token matters
/// here, the user id is re-fetched through `users/me` when needed.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthDetail {
    /// Bearer token for subsequent requests.
    pub auth_token: String,
}

/// Create an HTTP client with appropriate headers.
fn create_client() -> Result<Client, ApiError> {
    Ok(Client::builder()
        .user_agent(format!("taiga-cli/{}", crate::VERSION))
        .timeout(Duration::from_secs(30))
        .build()?)
}

/// Join the base URL with an API path.
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), API_PREFIX, path)
}

/// Pull the human-readable message out of a Taiga error body.
///
/// Taiga wraps errors as `{"_error_message": "..."}`; anything else is
/// passed through verbatim.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("_error_message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Call the authentication endpoint with normal credentials.
pub fn authenticate(
    client: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<AuthDetail, ApiError> {
    let response = client
        .post(endpoint(base_url, "auth"))
        .json(&serde_json::json!({
            "type": "normal",
            "username": username,
            "password": password,
        }))
        .send()?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ApiError::AuthRejected(error_message(&body)));
    }
    Ok(response.json()?)
}

/// Pre-token authentication client.
///
/// The session manager takes this through the [`Authenticator`] seam so
/// its re-login behaviour is testable without a server.
pub struct HttpAuth {
    client: Client,
}

impl HttpAuth {
    /// Build the client.
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self {
            client: create_client()?,
        })
    }
}

impl Authenticator for HttpAuth {
    fn authenticate(
        &self,
        api_url: &str,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        Ok(authenticate(&self.client, api_url, username, password)?.auth_token)
    }
}

/// Authenticated client for the listing endpoints.
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpApi {
    /// Build a client from a base URL and a bearer token.
    pub fn with_token(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: create_client()?,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    /// Issue a GET against a listing endpoint and decode the JSON body.
    ///
    /// Pagination is disabled so the full listing arrives in one
    /// response; slug resolution relies on scanning the complete list.
    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(endpoint(&self.base_url, path))
            .bearer_auth(&self.token)
            .header("x-disable-pagination", "1")
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(response.json()?)
    }
}

impl TaigaApi for HttpApi {
    fn current_user(&self) -> Result<User, ApiError> {
        self.get("users/me", &[])
    }

    fn list_projects(&self, member: Option<i64>) -> Result<Vec<Project>, ApiError> {
        let mut query = vec![
            ("order_by".to_string(), "user_order".to_string()),
            ("slight".to_string(), "true".to_string()),
        ];
        if let Some(member) = member {
            query.push(("member".to_string(), member.to_string()));
        }
        self.get("projects", &query)
    }

    fn list_milestones(&self, project_id: i64) -> Result<Vec<Milestone>, ApiError> {
        self.get(
            "milestones",
            &[("project".to_string(), project_id.to_string())],
        )
    }

    fn list_users(&self, project_id: i64) -> Result<Vec<User>, ApiError> {
        self.get("users", &[("project".to_string(), project_id.to_string())])
    }

    fn list_user_stories(&self, filter: &StoryFilter) -> Result<Vec<UserStory>, ApiError> {
        self.get("userstories", &filter.to_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_path() {
        assert_eq!(
            endpoint("https://taiga.example.com", "projects"),
            "https://taiga.example.com/api/v1/projects"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        assert_eq!(
            endpoint("https://taiga.example.com/", "auth"),
            "https://taiga.example.com/api/v1/auth"
        );
    }

    #[test]
    fn test_error_message_unwraps_taiga_envelope() {
        let body = r#"{"_error_message": "Invalid username or password"}"#;
        assert_eq!(error_message(body), "Invalid username or password");
    }

    #[test]
    fn test_error_message_passes_other_bodies_through() {
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
        assert_eq!(error_message(r#"{"detail": "nope"}"#), r#"{"detail": "nope"}"#);
    }

    // Note: Network paths are exercised manually against a live Taiga
    // instance; tests here stay offline.
}
