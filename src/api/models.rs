//! Entity models for the Taiga REST API.
//!
//! Deserialised views of the listing payloads, restricted to the fields
//! the reports consume. All entities are read-only from the client's
//! perspective.

use serde::Deserialize;

/// A Taiga project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    /// Numeric project id.
    pub id: i64,
    /// Human-readable unique identifier.
    pub slug: String,
    /// Display name.
    pub name: String,
}

/// A sprint (Taiga calls these milestones), scoped to a project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Milestone {
    /// Numeric milestone id.
    pub id: i64,
    /// Human-readable unique identifier within the project.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Whether the sprint has been closed.
    #[serde(default)]
    pub closed: bool,
}

/// A Taiga user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    /// Numeric user id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Display name, when the profile has one.
    #[serde(default)]
    pub full_name_display: Option<String>,
}

/// Assignee details embedded in a user story payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssignedInfo {
    /// Login name of the assignee.
    pub username: String,
    /// Display name of the assignee.
    #[serde(default)]
    pub full_name_display: Option<String>,
}

/// A user story, the unit every report aggregates over.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserStory {
    /// Story title.
    pub subject: String,
    /// Whether the story's status counts as closed.
    #[serde(default)]
    pub is_closed: bool,
    /// Estimated points; null until the story is estimated.
    #[serde(default)]
    pub total_points: Option<f64>,
    /// Assignee details; null for unassigned stories.
    #[serde(default)]
    pub assigned_to_extra_info: Option<AssignedInfo>,
    /// Name of the sprint the story is scheduled in; null for backlog.
    #[serde(default)]
    pub milestone_name: Option<String>,
}

impl UserStory {
    /// Assignee username, or `None` when unassigned.
    pub fn assignee(&self) -> Option<&str> {
        self.assigned_to_extra_info
            .as_ref()
            .map(|info| info.username.as_str())
    }

    /// Points with the absent-estimate case treated as zero.
    pub fn points(&self) -> f64 {
        self.total_points.unwrap_or(0.0)
    }
}
