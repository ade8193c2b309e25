//! Deterministic markdown rendering of a [`Plan`].
//!
//! `derive` sorts phases by id and tasks (and their dependency lists) in
//! natural id order, so output never depends on the order of the input
//! collections. The trailing hash marker embeds [`fingerprint`].

use crate::hash::{fingerprint, marker};
use crate::ids::sort_natural;
use crate::plan::{Plan, Task};
use crate::types::TaskStatus;
use chrono::{DateTime, SecondsFormat, Utc};

pub const CURRENT_MARKER: &str = "← CURRENT";
pub const PHASE_SEPARATOR: &str = "---";

/// Render `plan` as markdown stamped with `generated_at`.
///
/// Pure in both arguments: identical inputs give byte-identical output.
pub fn derive(plan: &Plan, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n", plan.title));
    out.push_str(&format!("Swarm: {}\n", plan.swarm));
    let current_label = plan.current().map(|p| p.status.label()).unwrap_or("UNKNOWN");
    out.push_str(&format!(
        "Phase: {} [{}] | Updated: {}\n",
        plan.current_phase,
        current_label,
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));

    for phase in plan.sorted_phases() {
        out.push('\n');
        out.push_str(PHASE_SEPARATOR);
        out.push_str("\n\n");
        out.push_str(&format!(
            "## Phase {}: {} [{}]\n",
            phase.id,
            phase.name,
            phase.status.label()
        ));
        let tasks = phase.sorted_tasks();
        if !tasks.is_empty() {
            out.push('\n');
        }
        for task in tasks {
            let is_current = phase.id == plan.current_phase;
            out.push_str(&task_line(task, is_current));
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&marker(&fingerprint(plan)));
    out.push('\n');
    out
}

/// [`derive`] stamped with the current time, truncated to whole seconds.
pub fn derive_now(plan: &Plan) -> String {
    derive(plan, now_secs())
}

fn now_secs() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now)
}

/// One checkbox line. `in_current_phase` controls the `← CURRENT` suffix
/// for in-progress tasks.
fn task_line(task: &Task, in_current_phase: bool) -> String {
    let marker = match task.status {
        TaskStatus::Completed => "[x]",
        TaskStatus::Blocked => "[BLOCKED]",
        TaskStatus::Pending | TaskStatus::InProgress => "[ ]",
    };

    let mut line = format!("- {marker} {}: {}", task.id, task.description);

    if task.status == TaskStatus::Blocked {
        if let Some(reason) = task.blocked_reason.as_deref().filter(|r| !r.trim().is_empty()) {
            line.push_str(" - ");
            line.push_str(reason);
        }
    }

    line.push_str(&format!(" [{}]", task.size.label()));

    if !task.depends.is_empty() {
        let mut deps = task.depends.clone();
        sort_natural(&mut deps);
        line.push_str(&format!(" (depends: {})", deps.join(", ")));
    }

    if in_current_phase && task.status == TaskStatus::InProgress {
        line.push(' ');
        line.push_str(CURRENT_MARKER);
    }

    line
}
