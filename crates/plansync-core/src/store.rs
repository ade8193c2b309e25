//! On-disk persistence for `plan.json` (canonical) and `plan.md` (derived).
//!
//! Reads never fail: anything unreadable, malformed or schema-invalid comes
//! back as `None`. Writes validate first and replace files atomically.

use crate::error::Result;
use crate::io::{atomic_write, read_optional};
use crate::paths;
use crate::plan::Plan;
use crate::render::derive_now;
use std::path::Path;

/// Parse and validate `plan.json`. `None` on missing file, bad JSON, or a
/// plan that fails [`Plan::validate`].
pub fn read_canonical(root: &Path) -> Option<Plan> {
    let path = paths::plan_json_path(root);
    let data = match read_optional(&path) {
        Ok(Some(data)) => data,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read canonical plan");
            return None;
        }
    };
    let plan: Plan = match serde_json::from_str(&data) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "canonical plan is not valid JSON");
            return None;
        }
    };
    if let Err(e) = plan.validate() {
        tracing::warn!(path = %path.display(), error = %e, "canonical plan failed validation");
        return None;
    }
    Some(plan)
}

/// Raw `plan.md` text, or `None` if absent or unreadable.
pub fn read_rendering(root: &Path) -> Option<String> {
    let path = paths::plan_md_path(root);
    match read_optional(&path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read plan rendering");
            None
        }
    }
}

/// Validate and atomically write `plan.json`. Invalid plans are rejected
/// before anything touches the disk.
pub fn write_canonical(root: &Path, plan: &Plan) -> Result<()> {
    plan.validate()?;
    let mut data = serde_json::to_string_pretty(plan)?;
    data.push('\n');
    atomic_write(&paths::plan_json_path(root), data.as_bytes())
}

/// Atomically write `plan.md`.
pub fn write_rendering(root: &Path, text: &str) -> Result<()> {
    atomic_write(&paths::plan_md_path(root), text.as_bytes())
}

/// Persist a plan: `plan.json` first (errors propagate), then a freshly
/// derived `plan.md` (errors are logged and swallowed).
pub fn save(root: &Path, plan: &Plan) -> Result<()> {
    write_canonical(root, plan)?;
    if let Err(e) = write_rendering(root, &derive_now(plan)) {
        tracing::warn!(root = %root.display(), error = %e, "failed to regenerate plan.md after save");
    }
    Ok(())
}

/// True when a `plan.json` file exists, valid or not.
pub fn canonical_exists(root: &Path) -> bool {
    paths::plan_json_path(root).is_file()
}

/// Copy an existing `plan.json` aside to `plan.json.invalid`.
pub fn preserve_invalid_canonical(root: &Path) -> Result<()> {
    let data = std::fs::read(paths::plan_json_path(root))?;
    atomic_write(&paths::invalid_plan_json_path(root), &data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::hash::{extract_embedded, fingerprint};
    use crate::plan::tests::sample_plan;
    use tempfile::TempDir;

    #[test]
    fn save_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let plan = sample_plan();
        save(dir.path(), &plan).unwrap();
        assert_eq!(read_canonical(dir.path()), Some(plan));
    }

    #[test]
    fn save_writes_fresh_rendering() {
        let dir = TempDir::new().unwrap();
        let plan = sample_plan();
        save(dir.path(), &plan).unwrap();
        let md = read_rendering(dir.path()).unwrap();
        assert!(md.starts_with("# Ship auth\n"));
        assert_eq!(extract_embedded(&md), Some(fingerprint(&plan)));
    }

    #[test]
    fn missing_files_read_as_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_canonical(dir.path()).is_none());
        assert!(read_rendering(dir.path()).is_none());
        assert!(!canonical_exists(dir.path()));
    }

    #[test]
    fn malformed_json_reads_as_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("plan.json"), "{ not json").unwrap();
        assert!(read_canonical(dir.path()).is_none());
        assert!(canonical_exists(dir.path()));
    }

    #[test]
    fn wrong_schema_version_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let mut plan = sample_plan();
        plan.schema_version = "0.9.0".to_string();
        std::fs::write(
            dir.path().join("plan.json"),
            serde_json::to_string(&plan).unwrap(),
        )
        .unwrap();
        assert!(read_canonical(dir.path()).is_none());
    }

    #[test]
    fn wrong_shape_reads_as_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("plan.json"), r#"{"title": "x", "phases": 3}"#).unwrap();
        assert!(read_canonical(dir.path()).is_none());
    }

    #[test]
    fn write_canonical_rejects_empty_title() {
        let dir = TempDir::new().unwrap();
        let mut plan = sample_plan();
        plan.title = String::new();
        let err = write_canonical(dir.path(), &plan).unwrap_err();
        assert!(matches!(err, PlanError::Validation(_)));
        assert!(!canonical_exists(dir.path()));
    }

    #[test]
    fn save_rejects_invalid_without_touching_disk() {
        let dir = TempDir::new().unwrap();
        let mut plan = sample_plan();
        plan.phases[0].tasks[0].description = " ".to_string();
        assert!(save(dir.path(), &plan).is_err());
        assert!(read_rendering(dir.path()).is_none());
    }

    #[test]
    fn preserve_invalid_copies_bytes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("plan.json"), "garbage").unwrap();
        preserve_invalid_canonical(dir.path()).unwrap();
        let copied = std::fs::read_to_string(dir.path().join("plan.json.invalid")).unwrap();
        assert_eq!(copied, "garbage");
    }
}
