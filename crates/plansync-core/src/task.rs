use crate::error::{PlanError, Result};
use crate::heal;
use crate::plan::Plan;
use crate::store;
use crate::types::TaskStatus;
use std::path::Path;

// ---------------------------------------------------------------------------
// Status updates (load -> locate -> mutate -> save)
// ---------------------------------------------------------------------------

/// Set a task's status and persist the plan. The rendering is re-derived
/// by the save path.
pub fn update_status(root: &Path, task_id: &str, status: TaskStatus) -> Result<Plan> {
    update_status_with_reason(root, task_id, status, None)
}

/// Like [`update_status`], recording `reason` when moving to `blocked`.
/// Leaving `blocked` clears any previous reason.
pub fn update_status_with_reason(
    root: &Path,
    task_id: &str,
    status: TaskStatus,
    reason: Option<&str>,
) -> Result<Plan> {
    let mut plan = heal::load(root).ok_or_else(|| PlanError::PlanNotFound(root.to_path_buf()))?;
    set_status(&mut plan, task_id, status, reason)?;
    store::save(root, &plan)?;
    tracing::debug!(task = task_id, status = %status, "updated task status");
    Ok(plan)
}

/// In-memory mutation shared by the persisted entry points.
pub fn set_status(
    plan: &mut Plan,
    task_id: &str,
    status: TaskStatus,
    reason: Option<&str>,
) -> Result<()> {
    let task = plan
        .find_task_mut(task_id)
        .ok_or_else(|| PlanError::TaskNotFound(task_id.to_string()))?;
    task.status = status;
    if status == TaskStatus::Blocked {
        if let Some(reason) = reason {
            task.blocked_reason = Some(reason.to_string());
        }
    } else {
        task.blocked_reason = None;
    }
    Ok(())
}

/// Human-readable summary: "3/5 completed, 1 in progress, 1 blocked"
pub fn summarize(plan: &Plan) -> String {
    let total = plan.total_tasks();
    let done = plan.completed_tasks();
    let in_progress = plan
        .tasks()
        .filter(|t| t.status == TaskStatus::InProgress)
        .count();
    let blocked = plan
        .tasks()
        .filter(|t| t.status == TaskStatus::Blocked)
        .count();
    format!("{done}/{total} completed, {in_progress} in progress, {blocked} blocked")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
