//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for taskweave using
//! clap's derive API.
//!
//! # Commands
//!
//! - `init`: Initialize a new taskweave repository
//! - `create`: Create a new task
//! - `list`: List tasks with optional filters
//! - `show`: Show task details with dependencies and dependents
//! - `update`: Update a task; status changes cascade to dependents
//! - `delete`: Delete a task and its edges
//! - `dep`: Add, remove or list dependencies
//! - `check`: Check whether a dependency would create a cycle
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! taskweave create --title "Write parser"
//! taskweave dep add 2 1
//! taskweave update 1 --status completed
//! taskweave --json check 1 2
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{
    CheckArgs, CreateArgs, DeleteArgs, DepAction, DepArgs, InitArgs, ListArgs, ShowArgs,
    UpdateArgs,
};
pub use types::TaskStatusArg;
pub use validators::{validate_task_id, validate_title};

/// Taskweave - dependency-aware task tracking
///
/// Tasks depend on other tasks. Circular dependencies are rejected, and
/// status changes propagate to every dependent task.
#[derive(Parser, Debug)]
#[command(name = "taskweave")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new taskweave repository
    ///
    /// Creates the `.taskweave/` directory with configuration and an empty
    /// task file.
    Init(InitArgs),

    /// Create a new task
    Create(CreateArgs),

    /// List tasks with optional filters
    List(ListArgs),

    /// Show detailed information about one or more tasks
    Show(ShowArgs),

    /// Update an existing task
    ///
    /// Only provided fields are updated. A status change is propagated to
    /// every task that depends on this one.
    Update(UpdateArgs),

    /// Delete a task permanently
    ///
    /// Removes the task and every dependency edge touching it. Former
    /// dependents are re-evaluated.
    Delete(DeleteArgs),

    /// Manage dependencies between tasks
    Dep(DepArgs),

    /// Check whether a dependency would create a cycle
    ///
    /// Nothing is modified.
    Check(CheckArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::Create(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_create(&mut app, args, output_mode).await
            }
            Some(Commands::List(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_list(&app, args, output_mode).await
            }
            Some(Commands::Show(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_show(&app, args, output_mode).await
            }
            Some(Commands::Update(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_update(&mut app, args, output_mode).await
            }
            Some(Commands::Delete(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_delete(&mut app, args, output_mode).await
            }
            Some(Commands::Dep(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_dep(&mut app, args, output_mode).await
            }
            Some(Commands::Check(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_check(&app, args, output_mode).await
            }
            None => {
                println!("Taskweave dependency-aware task tracking");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}
