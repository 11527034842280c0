//! Stories command implementations.
//!
//! Listing and statistics over the stories matching the composed remote
//! filter, grouped by sprint in first-seen order.

use crate::api::{self, HttpApi, Project, StoryQuery, UserStory};
use crate::cli::{CliError, CliResult, StoriesArgs, StoryStatus};
use crate::config::{ConfigPaths, TaigaConfig};
use crate::context;
use crate::stats;

use super::{connect, story_line};

/// List the matching stories grouped by sprint.
pub fn ls(paths: &ConfigPaths, args: &StoriesArgs) -> CliResult {
    let (config, api) = connect(paths)?;
    let (stories, project) = fetch(&api, &config, args)?;

    if stories.is_empty() {
        println!("{}", no_stories_line(&project));
        return Ok(());
    }

    println!("{}", headline("User Stories", &project));
    for (sprint_name, group) in stats::group_by_sprint(&stories).iter() {
        println!("* Sprint '{sprint_name}':");
        for &story in group {
            println!("  * {}", story_line(story));
        }
    }
    Ok(())
}

/// Per-sprint statistics, optionally with the individual stories.
pub fn stats(paths: &ConfigPaths, args: &StoriesArgs, detailed: bool) -> CliResult {
    let (config, api) = connect(paths)?;
    let (stories, project) = fetch(&api, &config, args)?;

    if stories.is_empty() {
        println!("{}", no_stories_line(&project));
        return Ok(());
    }

    println!("{}", headline("User Story Statistics", &project));
    for (sprint_name, group) in stats::group_by_sprint(&stories).iter() {
        let summary = stats::summarize_group(group);

        println!("* Sprint '{sprint_name}':");
        println!("  - Total Points: {}", summary.total_points);
        println!("  - Open Points: {}", summary.open_points);
        println!("  - Closed Stories: {}", summary.closed);
        println!("  - Open Stories: {}", summary.open);
        println!("  - Progress: {:.2}%", summary.progress_pct);

        if detailed {
            println!();
            println!("  Detailed user stories:");
            for &story in group {
                println!("  * {}", story_line(story));
            }
            println!();
        }
    }
    Ok(())
}

/// Report headline, e.g. `User Stories for Project 'X':`.
fn headline(kind: &str, project: &Project) -> String {
    format!("{kind} for Project '{}':", project.name)
}

/// Message for a report that matched nothing.
fn no_stories_line(project: &Project) -> String {
    format!("No user stories found for Project '{}'.", project.name)
}

/// Resolve context and fetch through the composed remote filter.
///
/// Unlike the sprint reports, the per-user restriction here is pushed
/// into the query itself.
fn fetch(
    api: &HttpApi,
    config: &TaigaConfig,
    args: &StoriesArgs,
) -> Result<(Vec<UserStory>, Project), CliError> {
    let ctx = context::resolve(
        config,
        args.project.as_deref(),
        args.sprint.as_deref(),
        args.all_sprints,
    )?;
    let query = StoryQuery {
        project_slug: &ctx.project_slug,
        sprint_slug: ctx.sprint_slug.as_deref(),
        user: args.user.as_deref(),
        all_users: args.all_users,
        is_closed: args.status.map(StoryStatus::is_closed),
    };
    Ok(api::fetch_stories(api, &query)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project {
            id: 10,
            slug: "proj1".to_string(),
            name: "Project One".to_string(),
        }
    }

    #[test]
    fn test_headlines_use_title_case() {
        assert_eq!(
            headline("User Stories", &project()),
            "User Stories for Project 'Project One':"
        );
        assert_eq!(
            headline("User Story Statistics", &project()),
            "User Story Statistics for Project 'Project One':"
        );
    }

    #[test]
    fn test_empty_report_message() {
        assert_eq!(
            no_stories_line(&project()),
            "No user stories found for Project 'Project One'."
        );
    }
}
