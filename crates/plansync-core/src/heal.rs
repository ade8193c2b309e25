//! Load-time reconciliation of `plan.json` and `plan.md`.
//!
//! | canonical      | rendering              | action                      |
//! |----------------|------------------------|-----------------------------|
//! | valid          | absent / stale         | derive + write `plan.md`    |
//! | valid          | fresh                  | nothing                     |
//! | invalid/absent | recognizable structure | migrate, write both files   |
//! | invalid/absent | absent / blank / prose | `None`, nothing written     |
//!
//! Write failures while healing are logged and swallowed; the plan value is
//! still returned.

use crate::config::Config;
use crate::hash::is_stale;
use crate::migrate::migrate;
use crate::plan::Plan;
use crate::render::derive_now;
use crate::store;
use crate::types::MigrationStatus;
use serde::Serialize;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// LoadOutcome
// ---------------------------------------------------------------------------

/// Which branch of the heal table a load took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Canonical valid, rendering already matched its fingerprint.
    Fresh,
    /// Canonical valid, rendering was missing or stale and has been rewritten.
    Regenerated,
    /// Canonical valid, rendering was stale but rewriting it failed.
    RegenerationFailed,
    /// Canonical unusable, plan recovered from the legacy rendering.
    Migrated,
    /// Canonical unusable, rendering had no recognizable structure. No plan
    /// is returned and nothing is written.
    MigrationFailed,
    /// Nothing to load.
    Missing,
    /// Healing disabled by config; canonical read without side effects.
    ReadOnly,
}

impl LoadOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadOutcome::Fresh => "fresh",
            LoadOutcome::Regenerated => "regenerated",
            LoadOutcome::RegenerationFailed => "regeneration_failed",
            LoadOutcome::Migrated => "migrated",
            LoadOutcome::MigrationFailed => "migration_failed",
            LoadOutcome::Missing => "missing",
            LoadOutcome::ReadOnly => "read_only",
        }
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub plan: Option<Plan>,
    pub outcome: LoadOutcome,
}

impl LoadReport {
    fn new(plan: Option<Plan>, outcome: LoadOutcome) -> Self {
        Self { plan, outcome }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Load the plan under `root`, healing the on-disk artifacts as needed.
/// `None` means no plan exists (or nothing recoverable does).
pub fn load(root: &Path) -> Option<Plan> {
    load_with_outcome(root).plan
}

/// Strict read of `plan.json`: no healing, no writes, `None` on any
/// validation failure.
pub fn read_canonical_only(root: &Path) -> Option<Plan> {
    store::read_canonical(root)
}

/// [`load`], also reporting which branch ran.
pub fn load_with_outcome(root: &Path) -> LoadReport {
    let config = Config::load_or_default(root);
    if !config.auto_heal {
        let plan = read_canonical_only(root);
        let outcome = if plan.is_some() {
            LoadOutcome::ReadOnly
        } else {
            LoadOutcome::Missing
        };
        return LoadReport::new(plan, outcome);
    }

    let rendering = store::read_rendering(root);

    if let Some(plan) = store::read_canonical(root) {
        return refresh_rendering(root, plan, rendering.as_deref());
    }

    match rendering.filter(|text| !text.trim().is_empty()) {
        Some(text) => recover_from_rendering(root, &text, &config),
        None => {
            tracing::debug!(root = %root.display(), "no plan artifacts to load");
            LoadReport::new(None, LoadOutcome::Missing)
        }
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

fn refresh_rendering(root: &Path, plan: Plan, rendering: Option<&str>) -> LoadReport {
    if !is_stale(&plan, rendering) {
        tracing::debug!(root = %root.display(), "plan.md is fresh");
        return LoadReport::new(Some(plan), LoadOutcome::Fresh);
    }

    match store::write_rendering(root, &derive_now(&plan)) {
        Ok(()) => {
            tracing::info!(root = %root.display(), "regenerated stale plan.md");
            LoadReport::new(Some(plan), LoadOutcome::Regenerated)
        }
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "failed to regenerate plan.md");
            LoadReport::new(Some(plan), LoadOutcome::RegenerationFailed)
        }
    }
}

fn recover_from_rendering(root: &Path, text: &str, config: &Config) -> LoadReport {
    let plan = migrate(text, config.default_swarm.as_deref());

    if plan.migration_status == Some(MigrationStatus::MigrationFailed) {
        // Unrecoverable: no plan, and the operator's text stays as it is.
        tracing::warn!(root = %root.display(), "plan.md could not be migrated; leaving files untouched");
        return LoadReport::new(None, LoadOutcome::MigrationFailed);
    }

    if config.preserve_invalid && store::canonical_exists(root) {
        if let Err(e) = store::preserve_invalid_canonical(root) {
            tracing::warn!(root = %root.display(), error = %e, "failed to preserve invalid plan.json");
        }
    }

    match store::write_canonical(root, &plan) {
        Ok(()) => {
            if let Err(e) = store::write_rendering(root, &derive_now(&plan)) {
                tracing::warn!(root = %root.display(), error = %e, "failed to write migrated plan.md");
            }
            tracing::info!(
                root = %root.display(),
                phases = plan.phases.len(),
                tasks = plan.total_tasks(),
                "migrated legacy plan.md"
            );
        }
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "failed to write migrated plan.json");
        }
    }

    LoadReport::new(Some(plan), LoadOutcome::Migrated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
