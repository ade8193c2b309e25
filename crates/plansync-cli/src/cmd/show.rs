use crate::output::{print_json, print_table};
use plansync_core::types::TaskStatus;
use plansync_core::{heal, task as task_ops, Plan};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let plan = heal::load(root);

    if json {
        return print_json(&plan);
    }

    match plan {
        Some(plan) => print_plan(&plan),
        None => println!("No plan found in {}.", root.display()),
    }
    Ok(())
}

/// Header, progress line and one row per phase.
pub fn print_plan(plan: &Plan) {
    println!("Plan:    {}", plan.title);
    println!("Swarm:   {}", plan.swarm);
    match plan.current() {
        Some(phase) => println!("Phase:   {} ({}) [{}]", phase.id, phase.name, phase.status),
        None => println!("Phase:   {}", plan.current_phase),
    }
    if let Some(status) = plan.migration_status {
        println!("Migration: {status}");
    }
    println!("Tasks:   {}", task_ops::summarize(plan));
    println!();

    let rows: Vec<Vec<String>> = plan
        .sorted_phases()
        .into_iter()
        .map(|p| {
            let done = p
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count();
            vec![
                p.id.to_string(),
                p.status.to_string(),
                format!("{done}/{}", p.tasks.len()),
                p.name.clone(),
            ]
        })
        .collect();
    print_table(&["PHASE", "STATUS", "DONE", "NAME"], rows);
}
