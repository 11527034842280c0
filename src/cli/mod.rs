//! CLI commands and argument handling.
//!
//! This module contains the clap CLI definitions, the top-level error
//! taxonomy, and the boundary that maps every error kind to a single
//! user-facing line.

pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::ApiError;
use crate::config::StoreError;
use crate::context::ContextError;
use crate::session::SessionError;

/// Command-line reporting client for Taiga.
///
/// Queries a Taiga instance for projects, sprints, and user stories,
/// and renders aggregated text reports. Defaults for the project and
/// sprint come from the persisted configuration.
#[derive(Parser, Debug)]
#[command(name = "taiga")]
#[command(author, version = crate::VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run; shows a quick-start hint when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands for taiga.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure the server URL and user.
    ///
    /// Prompts for the API URL, username, and password, validates the
    /// credentials against the server, and saves the configuration
    /// (without the password).
    Config,

    /// Log in to the configured Taiga instance.
    ///
    /// Prompts for the password and caches a fresh token, valid for
    /// two hours.
    Login,

    /// Manage projects.
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Manage sprints (milestones).
    #[command(subcommand)]
    Sprint(SprintCommands),

    /// Report on user stories.
    #[command(subcommand)]
    Stories(StoriesCommands),

    /// Generate shell completions.
    ///
    /// Outputs completion script to stdout for bash, zsh, or fish.
    Completions(CompletionsCommand),
}

/// Subcommands for project management.
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects you are a member of.
    Ls(ProjectLsCommand),

    /// Show the default configured project.
    Default,

    /// Set the default project by slug.
    SetDefault(SetDefaultCommand),
}

/// Arguments for the 'project ls' command.
#[derive(Args, Debug)]
pub struct ProjectLsCommand {
    /// List all projects instead of only yours.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the 'set-default' commands.
#[derive(Args, Debug)]
pub struct SetDefaultCommand {
    /// Slug to persist as the default.
    pub slug: String,
}

/// Subcommands for sprint management.
#[derive(Subcommand, Debug)]
pub enum SprintCommands {
    /// List sprints of a project.
    Ls(SprintLsCommand),

    /// Show the default configured sprint.
    Default,

    /// Set the default sprint by slug (within the default project).
    SetDefault(SetDefaultCommand),

    /// Per-user statistics for one sprint.
    UserStats(SprintReportArgs),

    /// List the user stories of one sprint.
    UserStories(SprintReportArgs),
}

/// Arguments for the 'sprint ls' command.
#[derive(Args, Debug)]
pub struct SprintLsCommand {
    /// Project slug (defaults to the configured default project).
    #[arg(long, value_name = "SLUG")]
    pub project: Option<String>,
}

/// Filters shared by the sprint reporting commands.
#[derive(Args, Debug)]
pub struct SprintReportArgs {
    /// Project slug (defaults to the configured default project).
    #[arg(long, value_name = "SLUG")]
    pub project: Option<String>,

    /// Sprint slug (defaults to the configured default sprint).
    #[arg(long, value_name = "SLUG")]
    pub sprint: Option<String>,

    /// Username to report on (defaults to the authenticated user).
    #[arg(long)]
    pub user: Option<String>,

    /// Include every user instead of a single one.
    #[arg(long)]
    pub all_users: bool,
}

/// Subcommands for story reporting.
#[derive(Subcommand, Debug)]
pub enum StoriesCommands {
    /// List stories grouped by sprint.
    Ls(StoriesArgs),

    /// Per-sprint statistics over the matching stories.
    Stats(StoriesArgs),

    /// Per-sprint statistics plus the individual stories.
    StatsDetailed(StoriesArgs),
}

/// Filters shared by the stories commands.
#[derive(Args, Debug)]
pub struct StoriesArgs {
    /// Project slug (defaults to the configured default project).
    #[arg(long, value_name = "SLUG")]
    pub project: Option<String>,

    /// Sprint slug (defaults to the configured default sprint).
    #[arg(long, value_name = "SLUG")]
    pub sprint: Option<String>,

    /// Username to filter by (defaults to the authenticated user).
    #[arg(long)]
    pub user: Option<String>,

    /// Filter by story status.
    #[arg(long, value_enum)]
    pub status: Option<StoryStatus>,

    /// Include stories of every user.
    #[arg(long)]
    pub all_users: bool,

    /// Span all sprints and the backlog instead of one sprint.
    #[arg(long)]
    pub all_sprints: bool,
}

/// Story status filter values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoryStatus {
    /// Stories not yet closed.
    Open,
    /// Closed stories.
    Closed,
}

impl StoryStatus {
    /// The `is_closed` value this filter translates to.
    pub fn is_closed(self) -> bool {
        matches!(self, StoryStatus::Closed)
    }
}

/// Arguments for the 'completions' command.
#[derive(Args, Debug)]
pub struct CompletionsCommand {
    /// Shell to generate completions for.
    #[arg(value_parser = ["bash", "zsh", "fish"])]
    pub shell: String,
}

/// Result type for command handlers.
pub type CliResult = Result<(), CliError>;

/// Top-level error taxonomy; every kind renders as one line.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Config or token store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Session/credential failure (not configured, re-login rejected).
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Missing implicit context.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Remote API failure, including slug resolution misses.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Terminal input failure.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
    /// The requested completions shell is not supported.
    #[error("Unsupported shell: {0}")]
    UnsupportedShell(String),
}

/// Map a command result to the process exit code.
///
/// Errors are rendered as a single red line; nothing ever escapes as an
/// internal trace.
pub fn handle_result(result: CliResult) -> std::process::ExitCode {
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {e}");
            std::process::ExitCode::FAILURE
        }
    }
}
