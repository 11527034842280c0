//! Project command implementations.

use crate::api::{self, TaigaApi};
use crate::cli::CliResult;
use crate::config::ConfigPaths;
use crate::context::ContextError;

use super::{connect, require_config};

/// List projects, either the caller's or every visible one.
pub fn ls(paths: &ConfigPaths, all: bool) -> CliResult {
    let (_config, api) = connect(paths)?;

    let member = if all {
        None
    } else {
        Some(api.current_user()?.id)
    };
    let projects = api.list_projects(member)?;

    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    let scope = if all { "all" } else { "your" };
    println!("Projects ({scope} projects):");
    for project in &projects {
        println!("- {} \x1b[2m(slug: {})\x1b[0m", project.name, project.slug);
    }
    Ok(())
}

/// Show the default configured project.
pub fn show_default(paths: &ConfigPaths) -> CliResult {
    let config = require_config(paths)?;
    let slug = config
        .default_project
        .ok_or(ContextError::NoDefaultProject)?;
    println!("Default project: \x1b[36m{slug}\x1b[0m");
    Ok(())
}

/// Set the default project after checking the slug resolves.
pub fn set_default(paths: &ConfigPaths, slug: &str) -> CliResult {
    let (mut config, api) = connect(paths)?;

    let project = api::find_project_by_slug(&api, slug)?;
    config.default_project = Some(project.slug.clone());
    config.save(paths)?;

    println!(
        "\x1b[32m✓\x1b[0m Default project set to '{}' (slug: {}).",
        project.name, project.slug
    );
    Ok(())
}
