use plansync_core::paths::has_plan_artifacts;
use std::path::{Path, PathBuf};

/// Resolve the plan root directory.
///
/// Priority:
/// 1. `--root` flag / `PLANSYNC_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `plan.json` or `plan.md`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_plan_root(&cwd).unwrap_or(cwd)
}

fn find_plan_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| has_plan_artifacts(dir))
        .map(Path::to_path_buf)
}
