use crate::error::{PlanError, Result};
use crate::ids::{natural_cmp, parse_task_id, sort_natural};
use crate::types::{MigrationStatus, PhaseStatus, TaskSize, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The only `schema_version` value this engine reads or writes.
pub const SCHEMA_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub phase: u32,
    pub status: TaskStatus,
    pub size: TaskSize,
    pub description: String,
    #[serde(default)]
    pub depends: Vec<String>,
    #[serde(default)]
    pub files_touched: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
}

impl Task {
    pub fn new(phase: u32, index: u32, description: impl Into<String>) -> Self {
        Self {
            id: format!("{phase}.{index}"),
            phase,
            status: TaskStatus::Pending,
            size: TaskSize::default(),
            description: description.into(),
            depends: Vec::new(),
            files_touched: Vec::new(),
            blocked_reason: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: u32,
    pub name: String,
    pub status: PhaseStatus,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Phase {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: PhaseStatus::Pending,
            tasks: Vec::new(),
        }
    }

    /// Tasks in natural id order, regardless of storage order.
    pub fn sorted_tasks(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().collect();
        tasks.sort_by(|a, b| natural_cmp(&a.id, &b.id));
        tasks
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub schema_version: String,
    pub title: String,
    pub swarm: String,
    pub current_phase: u32,
    pub phases: Vec<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_status: Option<MigrationStatus>,
}

impl Plan {
    pub fn new(title: impl Into<String>, swarm: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            title: title.into(),
            swarm: swarm.into(),
            current_phase: 1,
            phases: Vec::new(),
            migration_status: None,
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn phase(&self, id: u32) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    pub fn current(&self) -> Option<&Phase> {
        self.phase(self.current_phase)
    }

    /// Phases in ascending id order, regardless of storage order.
    pub fn sorted_phases(&self) -> Vec<&Phase> {
        let mut phases: Vec<&Phase> = self.phases.iter().collect();
        phases.sort_by_key(|p| p.id);
        phases
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.phases
            .iter()
            .flat_map(|p| &p.tasks)
            .find(|t| t.id == task_id)
    }

    pub fn find_task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.phases
            .iter_mut()
            .flat_map(|p| p.tasks.iter_mut())
            .find(|t| t.id == task_id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.phases.iter().flat_map(|p| &p.tasks)
    }

    pub fn total_tasks(&self) -> usize {
        self.tasks().count()
    }

    pub fn completed_tasks(&self) -> usize {
        self.tasks()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    /// `(completed, total)` across every phase.
    pub fn progress(&self) -> (usize, usize) {
        (self.completed_tasks(), self.total_tasks())
    }

    /// First pending or in-progress task, in phase then natural id order,
    /// whose dependencies are all completed. Unknown dependency ids block.
    pub fn next_task(&self) -> Option<&Task> {
        let completed: HashSet<&str> = self
            .tasks()
            .filter(|t| t.status == TaskStatus::Completed)
            .map(|t| t.id.as_str())
            .collect();

        self.sorted_phases()
            .into_iter()
            .flat_map(|p| p.sorted_tasks())
            .find(|t| {
                matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress)
                    && t.depends.iter().all(|d| completed.contains(d.as_str()))
            })
    }

    /// Copy with phases, tasks and dependency lists in canonical order.
    /// Two plans that differ only in collection order normalize equal.
    pub fn normalized(&self) -> Plan {
        let mut plan = self.clone();
        plan.phases.sort_by_key(|p| p.id);
        for phase in &mut plan.phases {
            phase.tasks.sort_by(|a, b| natural_cmp(&a.id, &b.id));
            for task in &mut phase.tasks {
                sort_natural(&mut task.depends);
            }
        }
        plan
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Check the plan against the canonical schema. Returns the first
    /// violation found.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(invalid(format!(
                "unsupported schema_version '{}' (expected '{SCHEMA_VERSION}')",
                self.schema_version
            )));
        }
        if self.title.trim().is_empty() {
            return Err(invalid("title must not be empty"));
        }

        let mut phase_ids = HashSet::new();
        let mut task_ids = HashSet::new();
        for phase in &self.phases {
            if phase.id == 0 {
                return Err(invalid("phase ids must be positive"));
            }
            if !phase_ids.insert(phase.id) {
                return Err(invalid(format!("duplicate phase id {}", phase.id)));
            }
            for task in &phase.tasks {
                validate_task(phase.id, task)?;
                if !task_ids.insert(task.id.as_str()) {
                    return Err(invalid(format!("duplicate task id {}", task.id)));
                }
            }
        }
        Ok(())
    }
}

fn validate_task(phase_id: u32, task: &Task) -> Result<()> {
    match parse_task_id(&task.id) {
        Some((prefix, index)) if prefix == phase_id && index >= 1 => {}
        _ => {
            return Err(invalid(format!(
                "task id '{}' must have the form '{phase_id}.<n>'",
                task.id
            )))
        }
    }
    if task.phase != phase_id {
        return Err(invalid(format!(
            "task {} declares phase {} but belongs to phase {phase_id}",
            task.id, task.phase
        )));
    }
    if task.description.trim().is_empty() {
        return Err(invalid(format!("task {} has an empty description", task.id)));
    }
    if task.depends.iter().any(|d| d == &task.id) {
        return Err(invalid(format!("task {} depends on itself", task.id)));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> PlanError {
    PlanError::Validation(msg.into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
