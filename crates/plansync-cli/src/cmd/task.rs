use crate::output::{print_json, print_table};
use anyhow::anyhow;
use clap::Subcommand;
use plansync_core::types::TaskStatus;
use plansync_core::{heal, task, PlanError, Task};
use std::path::Path;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Set a task's status and rewrite plan.json and plan.md
    Status {
        /// Task id, e.g. 2.3
        task_id: String,
        /// pending, in_progress, completed or blocked
        status: String,
        /// Blocker description (only recorded with `blocked`)
        #[arg(long)]
        reason: Option<String>,
    },

    /// Show a single task
    Get {
        task_id: String,
    },

    /// List every task in phase order
    List,

    /// Show the next actionable task
    Next,
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::Status {
            task_id,
            status,
            reason,
        } => set_status(root, &task_id, &status, reason.as_deref(), json),
        TaskSubcommand::Get { task_id } => get(root, &task_id, json),
        TaskSubcommand::List => list(root, json),
        TaskSubcommand::Next => next(root, json),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn set_status(
    root: &Path,
    task_id: &str,
    status: &str,
    reason: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let status: TaskStatus = status.parse()?;
    if reason.is_some() && status != TaskStatus::Blocked {
        tracing::warn!(task = task_id, "--reason is ignored unless the status is blocked");
    }

    let plan = task::update_status_with_reason(root, task_id, status, reason)?;
    let updated = plan
        .find_task(task_id)
        .ok_or_else(|| PlanError::TaskNotFound(task_id.to_string()))?;

    if json {
        return print_json(updated);
    }
    println!("{}: {}", updated.id, updated.status);
    println!("{}", task::summarize(&plan));
    Ok(())
}

fn get(root: &Path, task_id: &str, json: bool) -> anyhow::Result<()> {
    let plan = heal::load(root).ok_or_else(|| PlanError::PlanNotFound(root.to_path_buf()))?;
    let found = plan
        .find_task(task_id)
        .ok_or_else(|| PlanError::TaskNotFound(task_id.to_string()))?;

    if json {
        return print_json(found);
    }
    println!("ID:          {}", found.id);
    println!("Phase:       {}", found.phase);
    println!("Status:      {}", found.status);
    println!("Size:        {}", found.size);
    println!("Description: {}", found.description);
    if !found.depends.is_empty() {
        println!("Depends:     {}", found.depends.join(", "));
    }
    if !found.files_touched.is_empty() {
        println!("Files:       {}", found.files_touched.join(", "));
    }
    if let Some(reason) = &found.blocked_reason {
        println!("Blocked:     {reason}");
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let plan = heal::load(root).ok_or_else(|| PlanError::PlanNotFound(root.to_path_buf()))?;
    let tasks: Vec<&Task> = plan
        .sorted_phases()
        .into_iter()
        .flat_map(|p| p.sorted_tasks())
        .collect();

    if json {
        return print_json(&tasks);
    }
    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.status.to_string(),
                t.size.to_string(),
                t.description.clone(),
                t.blocked_reason.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(&["ID", "STATUS", "SIZE", "DESCRIPTION", "BLOCKER"], rows);
    Ok(())
}

fn next(root: &Path, json: bool) -> anyhow::Result<()> {
    let plan = heal::load(root).ok_or_else(|| PlanError::PlanNotFound(root.to_path_buf()))?;
    let next = plan.next_task();

    if json {
        return print_json(&next);
    }
    match next {
        Some(t) => println!("{}: {} [{}]", t.id, t.description, t.status),
        None => {
            let (done, total) = plan.progress();
            if done == total {
                println!("All {total} tasks completed.");
            } else {
                return Err(anyhow!(
                    "no actionable task: {}",
                    task::summarize(&plan)
                ));
            }
        }
    }
    Ok(())
}
