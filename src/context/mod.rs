//! Implicit-context resolution.
//!
//! Commands may omit `--project` and `--sprint`; the resolver fills the
//! gaps from the persisted defaults, or fails naming the command that
//! would fix it. Slug-to-entity resolution is a separate concern and
//! lives in the API facade.

use crate::config::TaigaConfig;

/// Error type for context resolution.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// Neither an explicit project nor a configured default exists.
    #[error("No default project set. Use `taiga project set-default <slug>`")]
    NoDefaultProject,
    /// Neither an explicit sprint nor a configured default exists.
    #[error("No default sprint set. Use `taiga sprint set-default <slug>`")]
    NoDefaultSprint,
}

/// Project and sprint slugs a command will operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    /// Project slug, explicit or defaulted.
    pub project_slug: String,
    /// Sprint slug; `None` only when the command spans all sprints.
    pub sprint_slug: Option<String>,
}

/// Resolve project and sprint slugs against the configured defaults.
///
/// Explicit values always win. When `all_sprints` is set, sprint
/// resolution is skipped entirely and the result carries no sprint.
pub fn resolve(
    config: &TaigaConfig,
    project: Option<&str>,
    sprint: Option<&str>,
    all_sprints: bool,
) -> Result<ResolvedContext, ContextError> {
    let project_slug = resolve_project(config, project)?;

    let sprint_slug = if all_sprints {
        None
    } else {
        let slug = sprint
            .map(String::from)
            .or_else(|| config.default_sprint.clone())
            .ok_or(ContextError::NoDefaultSprint)?;
        Some(slug)
    };

    Ok(ResolvedContext {
        project_slug,
        sprint_slug,
    })
}

/// Resolve just the project slug, for commands with no sprint scope.
pub fn resolve_project(
    config: &TaigaConfig,
    project: Option<&str>,
) -> Result<String, ContextError> {
    project
        .map(String::from)
        .or_else(|| config.default_project.clone())
        .ok_or(ContextError::NoDefaultProject)
}
