//! Best-effort recovery of a [`Plan`] from a legacy free-form `plan.md`.
//!
//! Recognized structure:
//!
//! ```markdown
//! # Title
//! Swarm: mega
//! Phase: 2
//!
//! ## Phase 1: Setup [COMPLETE]
//! - [x] 1.1: Scaffold crate [SMALL]
//! - [BLOCKED] 1.2: Wire CI - runner offline [MEDIUM]
//!
//! ## Phase 2: Build [IN PROGRESS]
//! - [ ] 2.1: Login endpoint [LARGE] (depends: 1.1) ← CURRENT
//! ```
//!
//! [`migrate`] is total: text with no recognizable phase headings yields a
//! single blocked placeholder phase tagged `migration_failed`.
//!
//! The blocked-reason capture keeps everything after the first `" - "`
//! verbatim, size tag and dependency suffix included.

use crate::ids::parse_task_id;
use crate::plan::{Phase, Plan, Task};
use crate::types::{MigrationStatus, PhaseStatus, TaskSize, TaskStatus};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

pub const FALLBACK_TITLE: &str = "Migrated Plan";
pub const FAILED_PHASE_NAME: &str = "Migration Failed";
pub const FAILED_TASK_DESCRIPTION: &str = "Review legacy plan.md and rebuild plan.json manually";
pub const FAILED_TASK_REASON: &str = "Legacy plan could not be parsed";

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static TITLE_RE: OnceLock<Regex> = OnceLock::new();
static SWARM_RE: OnceLock<Regex> = OnceLock::new();
static CURRENT_PHASE_RE: OnceLock<Regex> = OnceLock::new();
static PHASE_HEADING_RE: OnceLock<Regex> = OnceLock::new();
static TASK_RE: OnceLock<Regex> = OnceLock::new();
static TAIL_RE: OnceLock<Regex> = OnceLock::new();
static SIZE_RE: OnceLock<Regex> = OnceLock::new();
static DEPENDS_RE: OnceLock<Regex> = OnceLock::new();
static BLOCKED_RE: OnceLock<Regex> = OnceLock::new();

fn title_re() -> &'static Regex {
    TITLE_RE.get_or_init(|| Regex::new(r"^#[ \t]+(.+?)[ \t]*$").unwrap())
}

fn swarm_re() -> &'static Regex {
    SWARM_RE.get_or_init(|| Regex::new(r"^Swarm:[ \t]*(.+?)[ \t]*$").unwrap())
}

fn current_phase_re() -> &'static Regex {
    CURRENT_PHASE_RE.get_or_init(|| Regex::new(r"^Phase:[ \t]*(\d+)").unwrap())
}

fn phase_heading_re() -> &'static Regex {
    PHASE_HEADING_RE.get_or_init(|| {
        Regex::new(r"(?i)^##[ \t]+Phase[ \t]+(\d+)[ \t]*:[ \t]*(.+?)(?:[ \t]*\[([a-z _]+)\])?[ \t]*$")
            .unwrap()
    })
}

fn task_re() -> &'static Regex {
    TASK_RE.get_or_init(|| {
        Regex::new(r"^[-*][ \t]+\[(x|X| |BLOCKED)\][ \t]+(?:Task[ \t]+)?(\d+\.\d+):[ \t]*(.*)$")
            .unwrap()
    })
}

/// Splits a task body into description and trailing metadata tokens
/// (size tag, dependency list, current marker) in any order.
fn tail_re() -> &'static Regex {
    TAIL_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(.*?)((?:[ \t]*(?:\[(?:small|medium|large)\]|\(depends:[^)]*\)|←[ \t]*current))*)[ \t]*$",
        )
        .unwrap()
    })
}

fn size_re() -> &'static Regex {
    SIZE_RE.get_or_init(|| Regex::new(r"(?i)\[(small|medium|large)\]").unwrap())
}

fn depends_re() -> &'static Regex {
    DEPENDS_RE.get_or_init(|| Regex::new(r"\(depends:[ \t]*([^)]*)\)").unwrap())
}

fn blocked_re() -> &'static Regex {
    BLOCKED_RE.get_or_init(|| Regex::new(r"^(.+?) - (.+)$").unwrap())
}

// ---------------------------------------------------------------------------
// Migration
// ---------------------------------------------------------------------------

/// Recover a plan from legacy markdown. Never fails and performs no I/O.
///
/// `swarm_override` is used when the text has no `Swarm:` line.
pub fn migrate(rendering: &str, swarm_override: Option<&str>) -> Plan {
    let mut title: Option<String> = None;
    let mut swarm: Option<String> = None;
    let mut current_phase: Option<u32> = None;
    let mut phases: Vec<Phase> = Vec::new();
    let mut active: Option<usize> = None;
    let mut written: HashSet<(u32, String)> = HashSet::new();
    let mut seen_tasks: HashSet<String> = HashSet::new();
    let mut renamed: HashMap<String, String> = HashMap::new();

    for line in rendering.lines() {
        let trimmed = line.trim();

        if let Some(caps) = phase_heading_re().captures(trimmed) {
            active = open_phase(&mut phases, &caps[1], &caps[2], caps.get(3).map(|m| m.as_str()));
            continue;
        }

        if let Some(caps) = task_re().captures(trimmed) {
            let Some(idx) = active else {
                tracing::debug!(line = trimmed, "ignoring task line outside any phase");
                continue;
            };
            let phase = &mut phases[idx];
            let mut task = parse_task(phase.id, &caps[1], &caps[2], &caps[3]);
            if !written.insert((phase.id, task.id.clone())) {
                tracing::debug!(id = %task.id, "dropping duplicate legacy task");
                continue;
            }
            if seen_tasks.contains(&task.id) || !id_belongs_to(&task.id, phase.id) {
                let original = task.id.clone();
                task.id = next_free_id(phase, &seen_tasks);
                tracing::debug!(from = %original, to = %task.id, "renumbered legacy task");
                renamed.insert(original, task.id.clone());
            }
            seen_tasks.insert(task.id.clone());
            phase.tasks.push(task);
            continue;
        }

        if title.is_none() {
            if let Some(caps) = title_re().captures(trimmed) {
                title = Some(caps[1].to_string());
                continue;
            }
        }

        if swarm.is_none() {
            if let Some(caps) = swarm_re().captures(trimmed) {
                swarm = Some(caps[1].to_string());
                continue;
            }
        }

        if current_phase.is_none() {
            if let Some(caps) = current_phase_re().captures(trimmed) {
                current_phase = caps[1].parse().ok();
            }
        }
    }

    // A rename only applies to ids that no kept task still carries.
    renamed.retain(|original, _| !seen_tasks.contains(original));

    if phases.is_empty() {
        tracing::warn!("no phase headings found in legacy plan; producing placeholder");
        return failed_plan(title, swarm.or_else(|| swarm_override.map(str::to_string)));
    }

    for task in phases.iter_mut().flat_map(|p| p.tasks.iter_mut()) {
        for dep in task.depends.iter_mut() {
            if let Some(new_id) = renamed.get(dep) {
                *dep = new_id.clone();
            }
        }
        task.depends.retain(|d| d != &task.id);
    }

    phases.sort_by_key(|p| p.id);
    let current_phase = current_phase.unwrap_or_else(|| {
        phases
            .iter()
            .find(|p| p.status == PhaseStatus::InProgress)
            .unwrap_or(&phases[0])
            .id
    });

    Plan {
        schema_version: crate::plan::SCHEMA_VERSION.to_string(),
        title: title.unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        swarm: swarm
            .or_else(|| swarm_override.map(str::to_string))
            .unwrap_or_default(),
        current_phase,
        phases,
        migration_status: Some(MigrationStatus::Migrated),
    }
}

/// Start (or resume) a phase block; returns its index, or `None` when the
/// heading is unusable (phase id 0 or out of range).
fn open_phase(phases: &mut Vec<Phase>, id: &str, name: &str, status: Option<&str>) -> Option<usize> {
    let id: u32 = id.parse().ok().filter(|id| *id > 0)?;
    if let Some(idx) = phases.iter().position(|p| p.id == id) {
        return Some(idx);
    }
    let mut phase = Phase::new(id, name.trim());
    phase.status = status.map(PhaseStatus::from_label).unwrap_or(PhaseStatus::Pending);
    phases.push(phase);
    Some(phases.len() - 1)
}

fn parse_task(phase_id: u32, marker: &str, id: &str, body: &str) -> Task {
    let body = body.trim();
    let (description, tail) = match tail_re().captures(body) {
        Some(caps) => (
            caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
            caps.get(2).map_or("", |m| m.as_str()).to_string(),
        ),
        None => (body.to_string(), String::new()),
    };

    let size = size_re()
        .captures_iter(body)
        .last()
        .and_then(|c| c[1].parse::<TaskSize>().ok())
        .unwrap_or_default();

    let depends = depends_re()
        .captures(body)
        .map(|c| {
            c[1].split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let is_current = tail.to_ascii_uppercase().contains("CURRENT");

    let mut task = Task {
        id: id.to_string(),
        phase: phase_id,
        status: TaskStatus::Pending,
        size,
        description,
        depends,
        files_touched: Vec::new(),
        blocked_reason: None,
    };

    match marker {
        "x" | "X" => task.status = TaskStatus::Completed,
        "BLOCKED" => {
            task.status = TaskStatus::Blocked;
            if let Some(caps) = blocked_re().captures(body) {
                task.description = caps[1].trim().to_string();
                task.blocked_reason = Some(caps[2].trim().to_string());
            }
        }
        _ if is_current => task.status = TaskStatus::InProgress,
        _ => {}
    }

    if task.description.is_empty() {
        task.description = format!("Task {id}");
    }
    task
}

fn id_belongs_to(id: &str, phase_id: u32) -> bool {
    matches!(parse_task_id(id), Some((prefix, index)) if prefix == phase_id && index >= 1)
}

fn next_free_id(phase: &Phase, taken: &HashSet<String>) -> String {
    let mut index = phase.tasks.len() as u32 + 1;
    loop {
        let candidate = format!("{}.{index}", phase.id);
        if !taken.contains(&candidate) {
            return candidate;
        }
        index += 1;
    }
}

/// Placeholder plan for text with no recognizable structure.
pub fn failed_plan(title: Option<String>, swarm: Option<String>) -> Plan {
    let mut phase = Phase::new(1, FAILED_PHASE_NAME);
    phase.status = PhaseStatus::Blocked;

    let mut task = Task::new(1, 1, FAILED_TASK_DESCRIPTION);
    task.status = TaskStatus::Blocked;
    task.size = TaskSize::Small;
    task.blocked_reason = Some(FAILED_TASK_REASON.to_string());
    phase.tasks.push(task);

    Plan {
        schema_version: crate::plan::SCHEMA_VERSION.to_string(),
        title: title.unwrap_or_else(|| FAILED_PHASE_NAME.to_string()),
        swarm: swarm.unwrap_or_default(),
        current_phase: 1,
        phases: vec![phase],
        migration_status: Some(MigrationStatus::MigrationFailed),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
