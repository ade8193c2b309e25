use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File name constants (relative to a plan root)
// ---------------------------------------------------------------------------

pub const PLAN_JSON: &str = "plan.json";
pub const PLAN_MD: &str = "plan.md";
pub const INVALID_PLAN_JSON: &str = "plan.json.invalid";
pub const CONFIG_FILE: &str = "plansync.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn plan_json_path(root: &Path) -> PathBuf {
    root.join(PLAN_JSON)
}

pub fn plan_md_path(root: &Path) -> PathBuf {
    root.join(PLAN_MD)
}

pub fn invalid_plan_json_path(root: &Path) -> PathBuf {
    root.join(INVALID_PLAN_JSON)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// True when either plan artifact exists directly under `dir`.
pub fn has_plan_artifacts(dir: &Path) -> bool {
    plan_json_path(dir).is_file() || plan_md_path(dir).is_file()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
