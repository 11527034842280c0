//! taiga - command-line reporting client for Taiga.
//!
//! This is the main entry point for the taiga CLI tool.

use clap::Parser;
use taiga_cli::cli::{
    commands, handle_result, Cli, CliResult, Commands, ProjectCommands, SprintCommands,
    StoriesCommands,
};
use taiga_cli::config::ConfigPaths;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let paths = ConfigPaths::from_env();

    let result: CliResult = match cli.command {
        None => {
            // No subcommand provided - show help
            println!("taiga - command-line reporting client for Taiga.");
            println!();
            println!("Run 'taiga --help' for available commands.");
            println!();
            println!("Quick start:");
            println!("  taiga config                  # Configure server and user");
            println!("  taiga login                   # Cache an auth token");
            println!("  taiga project set-default X   # Pick your default project");
            println!("  taiga sprint user-stats       # Report on the current sprint");
            Ok(())
        }
        Some(cmd) => match cmd {
            Commands::Config => commands::config::run(&paths),
            Commands::Login => commands::login::run(&paths),
            Commands::Project(subcmd) => match subcmd {
                ProjectCommands::Ls(c) => commands::project::ls(&paths, c.all),
                ProjectCommands::Default => commands::project::show_default(&paths),
                ProjectCommands::SetDefault(c) => commands::project::set_default(&paths, &c.slug),
            },
            Commands::Sprint(subcmd) => match subcmd {
                SprintCommands::Ls(c) => commands::sprint::ls(&paths, c.project.as_deref()),
                SprintCommands::Default => commands::sprint::show_default(&paths),
                SprintCommands::SetDefault(c) => commands::sprint::set_default(&paths, &c.slug),
                SprintCommands::UserStats(args) => commands::sprint::user_stats(&paths, &args),
                SprintCommands::UserStories(args) => commands::sprint::user_stories(&paths, &args),
            },
            Commands::Stories(subcmd) => match subcmd {
                StoriesCommands::Ls(args) => commands::stories::ls(&paths, &args),
                StoriesCommands::Stats(args) => commands::stories::stats(&paths, &args, false),
                StoriesCommands::StatsDetailed(args) => {
                    commands::stories::stats(&paths, &args, true)
                }
            },
            Commands::Completions(c) => commands::completions::run(&c.shell),
        },
    };

    handle_result(result)
}
