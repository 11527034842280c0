//! Remote query facade for the Taiga API.
//!
//! [`TaigaApi`] is the seam to the remote collaborator: every listing
//! endpoint the reports need, behind a trait so tests can substitute an
//! in-memory double. On top of it sit the slug-resolution scans and the
//! story-filter composition. All operations here are read-only; nothing
//! mutates remote state.

pub mod http;
pub mod models;

pub use http::{HttpApi, HttpAuth};
pub use models::{AssignedInfo, Milestone, Project, User, UserStory};

/// Error type for remote API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No project in the listing matches the slug.
    #[error("Project with slug '{slug}' not found")]
    ProjectNotFound {
        /// The slug that failed to resolve.
        slug: String,
    },
    /// No sprint in the project matches the slug.
    #[error("Sprint with slug '{slug}' not found in project '{project}'")]
    SprintNotFound {
        /// The slug that failed to resolve.
        slug: String,
        /// Name of the project that was searched.
        project: String,
    },
    /// No member of the project matches the username.
    #[error("User '{username}' not found in project '{project}'")]
    UserNotFound {
        /// The username that failed to resolve.
        username: String,
        /// Name of the project that was searched.
        project: String,
    },
    /// The credentials were rejected by the authentication endpoint.
    #[error("Authentication failed: {0}")]
    AuthRejected(String),
    /// The server answered with a non-success status.
    #[error("Taiga API returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, passed through verbatim.
        message: String,
    },
    /// The request never produced a response.
    #[error("Taiga request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Query parameters for the user-story listing endpoint.
///
/// Optional fields are omitted from the request entirely; the server
/// never sees empty-string placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryFilter {
    /// Project id the stories belong to.
    pub project: i64,
    /// Restrict to one sprint; `None` spans all sprints and the backlog.
    pub milestone: Option<i64>,
    /// Restrict to one assignee by user id.
    pub assigned_to: Option<i64>,
    /// Restrict by open/closed status.
    pub is_closed: Option<bool>,
}

impl StoryFilter {
    /// Stories of a whole project, no further restriction.
    pub fn for_project(project_id: i64) -> Self {
        Self {
            project: project_id,
            ..Self::default()
        }
    }

    /// Render as query-string pairs for the listing request.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("project".to_string(), self.project.to_string())];
        if let Some(milestone) = self.milestone {
            query.push(("milestone".to_string(), milestone.to_string()));
        }
        if let Some(assigned_to) = self.assigned_to {
            query.push(("assigned_to".to_string(), assigned_to.to_string()));
        }
        if let Some(is_closed) = self.is_closed {
            query.push(("is_closed".to_string(), is_closed.to_string()));
        }
        query
    }
}

/// The remote Taiga collaborator, as consumed by the reports.
pub trait TaigaApi {
    /// The authenticated user.
    fn current_user(&self) -> Result<User, ApiError>;

    /// List projects, optionally restricted to ones a user is a member of.
    fn list_projects(&self, member: Option<i64>) -> Result<Vec<Project>, ApiError>;

    /// List the sprints of a project.
    fn list_milestones(&self, project_id: i64) -> Result<Vec<Milestone>, ApiError>;

    /// List the members of a project.
    fn list_users(&self, project_id: i64) -> Result<Vec<User>, ApiError>;

    /// List user stories matching a filter.
    fn list_user_stories(&self, filter: &StoryFilter) -> Result<Vec<UserStory>, ApiError>;
}

/// Resolve a project slug against the full listing.
///
/// The server offers no slug filter on this endpoint, so resolution is a
/// fetch plus linear scan. A duplicate slug resolves to the first match.
pub fn find_project_by_slug(api: &dyn TaigaApi, slug: &str) -> Result<Project, ApiError> {
    api.list_projects(None)?
        .into_iter()
        .find(|p| p.slug == slug)
        .ok_or_else(|| ApiError::ProjectNotFound { slug: slug.into() })
}

/// Resolve a sprint slug within a project, same scan strategy.
pub fn find_milestone_by_slug(
    api: &dyn TaigaApi,
    project: &Project,
    slug: &str,
) -> Result<Milestone, ApiError> {
    api.list_milestones(project.id)?
        .into_iter()
        .find(|m| m.slug == slug)
        .ok_or_else(|| ApiError::SprintNotFound {
            slug: slug.into(),
            project: project.name.clone(),
        })
}

/// Resolve a username within a project's member list.
pub fn find_user_by_username(
    api: &dyn TaigaApi,
    project: &Project,
    username: &str,
) -> Result<User, ApiError> {
    api.list_users(project.id)?
        .into_iter()
        .find(|u| u.username == username)
        .ok_or_else(|| ApiError::UserNotFound {
            username: username.into(),
            project: project.name.clone(),
        })
}

/// Scope flags and slugs describing which stories a report wants.
#[derive(Debug, Clone, Default)]
pub struct StoryQuery<'a> {
    /// Project slug, already resolved against config defaults.
    pub project_slug: &'a str,
    /// Sprint slug; `None` when spanning all sprints.
    pub sprint_slug: Option<&'a str>,
    /// Report on a specific user instead of the authenticated one.
    pub user: Option<&'a str>,
    /// Drop the per-user restriction entirely.
    pub all_users: bool,
    /// Restrict by open/closed status.
    pub is_closed: Option<bool>,
}

/// Fetch the stories a report asked for, composing the remote filter.
///
/// Composition rules: the project id is always present; a milestone id is
/// added only when a sprint slug is in play; `assigned_to` defaults to
/// the authenticated user unless `all_users`, and an explicit `user`
/// (resolved via the project member list) overrides both.
pub fn fetch_stories(
    api: &dyn TaigaApi,
    query: &StoryQuery<'_>,
) -> Result<(Vec<UserStory>, Project), ApiError> {
    let project = find_project_by_slug(api, query.project_slug)?;
    let mut filter = StoryFilter::for_project(project.id);
    filter.is_closed = query.is_closed;

    if let Some(slug) = query.sprint_slug {
        let sprint = find_milestone_by_slug(api, &project, slug)?;
        filter.milestone = Some(sprint.id);
    }

    if !query.all_users {
        filter.assigned_to = Some(api.current_user()?.id);
    }
    if let Some(username) = query.user {
        let user = find_user_by_username(api, &project, username)?;
        filter.assigned_to = Some(user.id);
    }

    let stories = api.list_user_stories(&filter)?;
    Ok((stories, project))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory stand-in for the remote collaborator.
    struct FakeApi {
        me: User,
        projects: Vec<Project>,
        milestones: Vec<Milestone>,
        users: Vec<User>,
        stories: Vec<UserStory>,
        last_filter: RefCell<Option<StoryFilter>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                me: user(1, "alice"),
                projects: vec![project(10, "proj1", "Project One")],
                milestones: vec![
                    milestone(20, "spr1", "Sprint 1"),
                    milestone(21, "spr2", "Sprint 2"),
                ],
                users: vec![user(1, "alice"), user(2, "bob")],
                stories: Vec::new(),
                last_filter: RefCell::new(None),
            }
        }
    }

    impl TaigaApi for FakeApi {
        fn current_user(&self) -> Result<User, ApiError> {
            Ok(self.me.clone())
        }

        fn list_projects(&self, _member: Option<i64>) -> Result<Vec<Project>, ApiError> {
            Ok(self.projects.clone())
        }

        fn list_milestones(&self, _project_id: i64) -> Result<Vec<Milestone>, ApiError> {
            Ok(self.milestones.clone())
        }

        fn list_users(&self, _project_id: i64) -> Result<Vec<User>, ApiError> {
            Ok(self.users.clone())
        }

        fn list_user_stories(&self, filter: &StoryFilter) -> Result<Vec<UserStory>, ApiError> {
            *self.last_filter.borrow_mut() = Some(filter.clone());
            Ok(self.stories.clone())
        }
    }

    fn project(id: i64, slug: &str, name: &str) -> Project {
        Project {
            id,
            slug: slug.into(),
            name: name.into(),
        }
    }

    fn milestone(id: i64, slug: &str, name: &str) -> Milestone {
        Milestone {
            id,
            slug: slug.into(),
            name: name.into(),
            closed: false,
        }
    }

    fn user(id: i64, username: &str) -> User {
        User {
            id,
            username: username.into(),
            full_name_display: None,
        }
    }

    #[test]
    fn test_find_project_by_slug_resolves() {
        let api = FakeApi::new();
        let found = find_project_by_slug(&api, "proj1").unwrap();
        assert_eq!(found.id, 10);
    }

    #[test]
    fn test_find_project_by_slug_missing_fails() {
        let api = FakeApi::new();
        let err = find_project_by_slug(&api, "nope").unwrap_err();
        assert!(matches!(err, ApiError::ProjectNotFound { .. }));
        assert_eq!(err.to_string(), "Project with slug 'nope' not found");
    }

    #[test]
    fn test_duplicate_slug_resolves_to_first_match() {
        let mut api = FakeApi::new();
        api.projects = vec![
            project(10, "dup", "First"),
            project(11, "dup", "Second"),
        ];
        let found = find_project_by_slug(&api, "dup").unwrap();
        assert_eq!(found.name, "First");
    }

    #[test]
    fn test_find_milestone_scoped_error_names_project() {
        let api = FakeApi::new();
        let proj = project(10, "proj1", "Project One");
        let err = find_milestone_by_slug(&api, &proj, "spr9").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sprint with slug 'spr9' not found in project 'Project One'"
        );
    }

    #[test]
    fn test_find_user_by_username() {
        let api = FakeApi::new();
        let proj = project(10, "proj1", "Project One");
        assert_eq!(find_user_by_username(&api, &proj, "bob").unwrap().id, 2);
        assert!(find_user_by_username(&api, &proj, "carol").is_err());
    }

    #[test]
    fn test_fetch_defaults_to_current_user() {
        let api = FakeApi::new();
        let query = StoryQuery {
            project_slug: "proj1",
            sprint_slug: Some("spr1"),
            ..StoryQuery::default()
        };
        fetch_stories(&api, &query).unwrap();

        let filter = api.last_filter.borrow().clone().unwrap();
        assert_eq!(filter.project, 10);
        assert_eq!(filter.milestone, Some(20));
        assert_eq!(filter.assigned_to, Some(1));
        assert_eq!(filter.is_closed, None);
    }

    #[test]
    fn test_fetch_all_users_drops_assignee_filter() {
        let api = FakeApi::new();
        let query = StoryQuery {
            project_slug: "proj1",
            sprint_slug: Some("spr1"),
            all_users: true,
            ..StoryQuery::default()
        };
        fetch_stories(&api, &query).unwrap();

        let filter = api.last_filter.borrow().clone().unwrap();
        assert_eq!(filter.assigned_to, None);
    }

    #[test]
    fn test_fetch_explicit_user_overrides_current() {
        let api = FakeApi::new();
        let query = StoryQuery {
            project_slug: "proj1",
            sprint_slug: Some("spr2"),
            user: Some("bob"),
            ..StoryQuery::default()
        };
        fetch_stories(&api, &query).unwrap();

        let filter = api.last_filter.borrow().clone().unwrap();
        assert_eq!(filter.milestone, Some(21));
        assert_eq!(filter.assigned_to, Some(2));
    }

    #[test]
    fn test_fetch_all_sprints_omits_milestone() {
        let api = FakeApi::new();
        let query = StoryQuery {
            project_slug: "proj1",
            sprint_slug: None,
            all_users: true,
            is_closed: Some(true),
            ..StoryQuery::default()
        };
        fetch_stories(&api, &query).unwrap();

        let filter = api.last_filter.borrow().clone().unwrap();
        assert_eq!(filter.milestone, None);
        assert_eq!(filter.is_closed, Some(true));
    }

    #[test]
    fn test_fetch_unknown_user_fails() {
        let api = FakeApi::new();
        let query = StoryQuery {
            project_slug: "proj1",
            sprint_slug: Some("spr1"),
            user: Some("carol"),
            ..StoryQuery::default()
        };
        let err = fetch_stories(&api, &query).unwrap_err();
        assert!(matches!(err, ApiError::UserNotFound { .. }));
    }

    #[test]
    fn test_story_filter_query_omits_absent_fields() {
        let filter = StoryFilter::for_project(10);
        assert_eq!(
            filter.to_query(),
            vec![("project".to_string(), "10".to_string())]
        );

        let full = StoryFilter {
            project: 10,
            milestone: Some(20),
            assigned_to: Some(1),
            is_closed: Some(false),
        };
        let query = full.to_query();
        assert_eq!(query.len(), 4);
        assert!(query.contains(&("is_closed".to_string(), "false".to_string())));
    }
}
