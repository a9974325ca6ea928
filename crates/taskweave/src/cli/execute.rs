//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Mutating
//! commands go through [`crate::engine`] so that every edge is cycle-checked
//! and every status change propagates before the store is saved.

use anyhow::Result;
use serde::Serialize;

use super::args::{
    CheckArgs, CreateArgs, DeleteArgs, DepAction, DepArgs, InitArgs, ListArgs, ShowArgs,
    UpdateArgs,
};
use crate::app::App;
use crate::domain::{NewTask, Task, TaskFilter, TaskId, TaskUpdate};
use crate::engine;
use crate::error::Error;
use crate::graph::{CycleCheck, StatusChange};
use crate::output::{self, OutputMode};

/// A task together with the tasks that depend on it.
#[derive(Debug, Serialize)]
struct TaskDetails {
    #[serde(flatten)]
    task: Task,
    dependents: Vec<TaskId>,
}

/// Result of a mutating command, for JSON output.
#[derive(Debug, Serialize)]
struct MutationResult<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
    changes: Vec<StatusChange>,
}

/// Save after a mutation, reloading on failure so the in-memory state
/// matches what is on disk.
async fn save_or_reload(app: &mut App) -> Result<()> {
    if let Err(save_err) = app.save().await {
        if let Err(reload_err) = app.storage_mut().reload().await {
            tracing::warn!(error = %reload_err, "Failed to reload after save error");
        }
        return Err(anyhow::anyhow!("Save failed: {save_err}"));
    }
    Ok(())
}

/// Print the outcome of a mutating command.
fn report_mutation(
    action: &str,
    task: Option<Task>,
    changes: Vec<StatusChange>,
    output_mode: OutputMode,
) -> Result<()> {
    match output_mode {
        OutputMode::Json => {
            output::print_json(&MutationResult {
                action,
                task,
                changes,
            })?;
        }
        OutputMode::Text => {
            if let Some(task) = &task {
                output::print_success(&format!("{action} task #{}: {}", task.id, task.title))?;
            }
            output::print_changes(&changes)?;
        }
    }
    Ok(())
}

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;

    if !args.quiet {
        println!("Initializing taskweave repository...");
    }

    let result = init::init(&current_dir).await?;

    if !args.quiet {
        output::print_success(&format!(
            "Initialized taskweave in {}",
            result.taskweave_dir.display()
        ))?;
        println!("  Config: {}", result.config_file.display());
        println!("  Tasks:  {}", result.tasks_file.display());
    }

    Ok(())
}

/// Execute the create command
pub async fn execute_create(app: &mut App, args: &CreateArgs, output_mode: OutputMode) -> Result<()> {
    let new_task = NewTask {
        title: args.title.clone(),
        description: args.description.clone().unwrap_or_default(),
        status: args.status.into(),
    };

    let task = app.storage_mut().create(new_task).await?;
    save_or_reload(app).await?;

    match output_mode {
        OutputMode::Json => output::print_task(&task, output_mode)?,
        OutputMode::Text => {
            output::print_success(&format!("Created task #{}: {}", task.id, task.title))?;
        }
    }
    Ok(())
}

/// Execute the list command
pub async fn execute_list(app: &App, args: &ListArgs, output_mode: OutputMode) -> Result<()> {
    let filter = TaskFilter {
        status: args.status.map(Into::into),
        limit: args.limit,
    };

    let tasks = app.storage().list(&filter).await?;
    output::print_tasks(&tasks, output_mode)?;
    Ok(())
}

/// Execute the show command
pub async fn execute_show(app: &App, args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    let mut results = Vec::with_capacity(args.task_ids.len());

    for id in &args.task_ids {
        let task = app
            .storage()
            .get_task(id)
            .await?
            .ok_or(Error::TaskNotFound(*id))?;
        let dependents = app.storage().dependents_of(id).await?;
        results.push(TaskDetails { task, dependents });
    }

    match output_mode {
        // Always an array for consistency in programmatic usage
        OutputMode::Json => output::print_json(&results)?,
        OutputMode::Text => {
            for (i, details) in results.iter().enumerate() {
                if i > 0 {
                    println!();
                    println!("---");
                    println!();
                }
                output::print_task_details(&details.task, &details.dependents)?;
            }
        }
    }

    Ok(())
}

/// Execute the update command
///
/// Title and description are written first; a status change then goes
/// through [`engine::update_status`] and cascades to dependents.
pub async fn execute_update(app: &mut App, args: &UpdateArgs, output_mode: OutputMode) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Nothing to update. Pass --title, --description or --status");
    }

    let id = args.task_id;
    let update = TaskUpdate {
        title: args.title.clone(),
        description: args.description.clone(),
    };
    if !update.is_empty() {
        app.storage_mut().update(&id, update).await?;
    }

    let changes = match args.status {
        Some(status) => engine::update_status(app.storage_mut(), &id, status.into()).await?,
        None => Vec::new(),
    };
    save_or_reload(app).await?;

    let task = app.storage().get_task(&id).await?;
    report_mutation("Updated", task, changes, output_mode)
}

/// Execute the delete command
pub async fn execute_delete(app: &mut App, args: &DeleteArgs, output_mode: OutputMode) -> Result<()> {
    let changes = engine::delete_task(app.storage_mut(), &args.task_id).await?;
    save_or_reload(app).await?;

    if output_mode == OutputMode::Text {
        output::print_success(&format!("Deleted task #{}", args.task_id))?;
    }
    report_mutation("Deleted", None, changes, output_mode)
}

/// Execute the dep command
pub async fn execute_dep(app: &mut App, args: &DepArgs, output_mode: OutputMode) -> Result<()> {
    match &args.action {
        DepAction::Add { task, depends_on } => {
            let changes = match engine::add_dependency(app.storage_mut(), task, depends_on).await
            {
                Ok(changes) => changes,
                Err(err) => {
                    if output_mode == OutputMode::Json {
                        match &err {
                            Error::CyclicDependency { path } => {
                                output::print_cycle_rejection(path, output_mode)?;
                            }
                            Error::SelfDependency(id) => {
                                output::print_cycle_rejection(&[*id, *id], output_mode)?;
                            }
                            _ => {}
                        }
                    }
                    return Err(err.into());
                }
            };
            save_or_reload(app).await?;

            if output_mode == OutputMode::Text {
                output::print_success(&format!("Added dependency: #{task} --> #{depends_on}"))?;
            }
            report_mutation("Added dependency", None, changes, output_mode)
        }
        DepAction::Remove { task, depends_on } => {
            let changes = engine::remove_dependency(app.storage_mut(), task, depends_on).await?;
            save_or_reload(app).await?;

            if output_mode == OutputMode::Text {
                output::print_success(&format!("Removed dependency: #{task} --> #{depends_on}"))?;
            }
            report_mutation("Removed dependency", None, changes, output_mode)
        }
        DepAction::List { task, reverse } => {
            if app.storage().get_task(task).await?.is_none() {
                return Err(Error::TaskNotFound(*task).into());
            }

            let ids = if *reverse {
                app.storage().dependents_of(task).await?
            } else {
                app.storage().dependencies_of(task).await?
            };

            match output_mode {
                OutputMode::Json => output::print_json(&ids)?,
                OutputMode::Text => {
                    if ids.is_empty() {
                        if *reverse {
                            println!("↑ No tasks depend on #{task}");
                        } else {
                            println!("↓ #{task} has no dependencies");
                        }
                    } else {
                        if *reverse {
                            println!("↑ Tasks depending on #{task} ({}):", ids.len());
                        } else {
                            println!("↓ Dependencies of #{task} ({}):", ids.len());
                        }
                        for id in &ids {
                            println!("  └── #{id}");
                        }
                    }
                }
            }
            Ok(())
        }
    }
}

/// Execute the check command
///
/// A dry run of `dep add`: reports whether the edge would close a cycle
/// without modifying anything.
pub async fn execute_check(app: &App, args: &CheckArgs, output_mode: OutputMode) -> Result<()> {
    let check = engine::check_dependency(app.storage(), &args.task, &args.depends_on).await?;

    match (&check, output_mode) {
        (CycleCheck::Cycle(path), _) => output::print_cycle_rejection(path, output_mode)?,
        (CycleCheck::Acyclic, OutputMode::Json) => {
            output::print_json(&serde_json::json!({
                "task": args.task,
                "depends_on": args.depends_on,
                "is_cycle": false,
                "path": [],
            }))?;
        }
        (CycleCheck::Acyclic, OutputMode::Text) => {
            println!(
                "OK: #{} can depend on #{} without creating a cycle",
                args.task, args.depends_on
            );
        }
    }

    Ok(())
}
