//! Sprint command implementations.
//!
//! The reporting subcommands fetch the complete story list of the
//! resolved sprint and apply the per-user restriction in memory. That
//! asymmetry with the `stories` commands (which push the restriction
//! into the remote query) is deliberate and kept as-is.

use crate::api::{self, HttpApi, Milestone, StoryFilter, TaigaApi, UserStory};
use crate::cli::{CliError, CliResult, SprintReportArgs};
use crate::config::{ConfigPaths, TaigaConfig};
use crate::context::{self, ContextError};
use crate::stats::{self, UNASSIGNED};

use super::{connect, require_config, story_line};

/// List the sprints of a project.
pub fn ls(paths: &ConfigPaths, project_flag: Option<&str>) -> CliResult {
    let (config, api) = connect(paths)?;

    let slug = context::resolve_project(&config, project_flag)?;
    let project = api::find_project_by_slug(&api, &slug)?;
    let sprints = api.list_milestones(project.id)?;

    if sprints.is_empty() {
        println!("No sprints found for project '{}'.", project.name);
        return Ok(());
    }

    println!("Sprints for project '{}':", project.name);
    for sprint in &sprints {
        let status = if sprint.closed { "Closed" } else { "Open" };
        println!(
            "- {} \x1b[2m(slug: {}, Status: {})\x1b[0m",
            sprint.name, sprint.slug, status
        );
    }
    Ok(())
}

/// Show the default configured sprint.
pub fn show_default(paths: &ConfigPaths) -> CliResult {
    let config = require_config(paths)?;
    let slug = config.default_sprint.ok_or(ContextError::NoDefaultSprint)?;
    println!("Default sprint: \x1b[36m{slug}\x1b[0m");
    Ok(())
}

/// Set the default sprint after checking the slug resolves.
///
/// The sprint is looked up within the default project, which must be
/// configured first.
pub fn set_default(paths: &ConfigPaths, slug: &str) -> CliResult {
    let (mut config, api) = connect(paths)?;

    let project_slug = context::resolve_project(&config, None)?;
    let project = api::find_project_by_slug(&api, &project_slug)?;
    let sprint = api::find_milestone_by_slug(&api, &project, slug)?;

    config.default_sprint = Some(sprint.slug.clone());
    config.save(paths)?;

    println!(
        "\x1b[32m✓\x1b[0m Default sprint set to '{}' (slug: {}).",
        sprint.name, sprint.slug
    );
    Ok(())
}

/// Per-user statistics for one sprint.
pub fn user_stats(paths: &ConfigPaths, args: &SprintReportArgs) -> CliResult {
    let (config, api) = connect(paths)?;
    let (sprint, stories) = sprint_stories(&api, &config, args)?;
    let user = resolve_user(&api, args)?;

    let report = stats::aggregate_sprint_user_stats(&stories, &user, args.all_users);

    println!("User statistics for sprint '{}':", sprint.name);
    println!(
        "Total stories: {}, Open: {}, Closed: {}, Progress: {:.2}%",
        report.total, report.open, report.closed, report.progress_pct
    );
    for (username, stat) in report.per_user.iter() {
        println!(
            "- {}: {} stories (Open: {}, Closed: {}), {} points, Progress: {:.2}%",
            username,
            stat.stories,
            stat.open,
            stat.closed,
            stat.points,
            stat.progress_pct()
        );
    }
    Ok(())
}

/// List the user stories of one sprint.
pub fn user_stories(paths: &ConfigPaths, args: &SprintReportArgs) -> CliResult {
    let (config, api) = connect(paths)?;
    let (sprint, stories) = sprint_stories(&api, &config, args)?;
    let user = resolve_user(&api, args)?;

    println!("User stories for sprint '{}':", sprint.name);
    for story in &stories {
        let assignee = story.assignee().unwrap_or(UNASSIGNED);
        if !args.all_users && assignee != user {
            continue;
        }
        println!("- {}", story_line(story));
    }
    Ok(())
}

/// Resolve the sprint context and fetch its complete story list.
fn sprint_stories(
    api: &HttpApi,
    config: &TaigaConfig,
    args: &SprintReportArgs,
) -> Result<(Milestone, Vec<UserStory>), CliError> {
    let ctx = context::resolve(
        config,
        args.project.as_deref(),
        args.sprint.as_deref(),
        false,
    )?;
    let project = api::find_project_by_slug(api, &ctx.project_slug)?;
    let Some(sprint_slug) = ctx.sprint_slug.as_deref() else {
        return Err(ContextError::NoDefaultSprint.into());
    };
    let sprint = api::find_milestone_by_slug(api, &project, sprint_slug)?;

    let filter = StoryFilter {
        project: project.id,
        milestone: Some(sprint.id),
        ..StoryFilter::default()
    };
    let stories = api.list_user_stories(&filter)?;
    Ok((sprint, stories))
}

/// The username the report is about: the flag, or the authenticated user.
fn resolve_user(api: &HttpApi, args: &SprintReportArgs) -> Result<String, CliError> {
    match &args.user {
        Some(user) => Ok(user.clone()),
        None => Ok(api.current_user()?.username),
    }
}
