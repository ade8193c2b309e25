//! Content fingerprints that gate regeneration of `plan.md`.
//!
//! The rendering carries a trailing `<!-- PLAN_HASH: <hex> -->` marker. A
//! rendering whose marker is missing or differs from the fingerprint of the
//! canonical plan is stale and gets rewritten on the next load.

use crate::plan::Plan;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

pub const HASH_MARKER_PREFIX: &str = "<!-- PLAN_HASH: ";
pub const HASH_MARKER_SUFFIX: &str = " -->";

static MARKER_RE: OnceLock<Regex> = OnceLock::new();

fn marker_re() -> &'static Regex {
    MARKER_RE.get_or_init(|| Regex::new(r"<!--\s*PLAN_HASH:\s*([0-9a-fA-F]+)\s*-->").unwrap())
}

/// SHA-256 of the plan's normalized JSON, lower-case hex.
pub fn fingerprint(plan: &Plan) -> String {
    // Serializing plain structs and enums to JSON cannot fail.
    let canonical = serde_json::to_vec(&plan.normalized()).unwrap_or_default();
    let digest = Sha256::digest(&canonical);
    format!("{digest:x}")
}

/// The marker comment line for a digest.
pub fn marker(digest: &str) -> String {
    format!("{HASH_MARKER_PREFIX}{digest}{HASH_MARKER_SUFFIX}")
}

/// Digest from the last hash marker in `rendering`, if any.
pub fn extract_embedded(rendering: &str) -> Option<String> {
    marker_re()
        .captures_iter(rendering)
        .last()
        .map(|c| c[1].to_ascii_lowercase())
}

/// True when the rendering is absent, carries no marker, or carries a digest
/// that does not match `plan`.
pub fn is_stale(plan: &Plan, rendering: Option<&str>) -> bool {
    let Some(text) = rendering else {
        return true;
    };
    match extract_embedded(text) {
        Some(embedded) => embedded != fingerprint(plan),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tests::sample_plan;
    use crate::types::TaskStatus;

    #[test]
    fn fingerprint_is_stable() {
        let plan = sample_plan();
        let a = fingerprint(&plan);
        let b = fingerprint(&plan);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn fingerprint_changes_with_any_field() {
        let base = fingerprint(&sample_plan());

        let mut plan = sample_plan();
        plan.title.push('!');
        assert_ne!(fingerprint(&plan), base);

        let mut plan = sample_plan();
        plan.find_task_mut("2.1").unwrap().status = TaskStatus::Blocked;
        assert_ne!(fingerprint(&plan), base);

        let mut plan = sample_plan();
        plan.find_task_mut("1.2").unwrap().files_touched.clear();
        assert_ne!(fingerprint(&plan), base);

        let mut plan = sample_plan();
        plan.current_phase = 2;
        assert_ne!(fingerprint(&plan), base);
    }

    #[test]
    fn fingerprint_ignores_collection_order() {
        let plan = sample_plan();
        let mut shuffled = plan.clone();
        shuffled.phases.reverse();
        assert_eq!(fingerprint(&plan), fingerprint(&shuffled));
    }

    #[test]
    fn extract_finds_last_marker() {
        let text = "# Plan\n<!-- PLAN_HASH: aaaa -->\nbody\n<!-- PLAN_HASH: BEEF -->\n";
        assert_eq!(extract_embedded(text).as_deref(), Some("beef"));
    }

    #[test]
    fn extract_none_without_marker() {
        assert!(extract_embedded("# Plan\n\n## Phase 1: A [PENDING]\n").is_none());
    }

    #[test]
    fn staleness() {
        let plan = sample_plan();
        let fresh = format!("# x\n{}\n", marker(&fingerprint(&plan)));
        assert!(!is_stale(&plan, Some(&fresh)));
        assert!(is_stale(&plan, None));
        assert!(is_stale(&plan, Some("# legacy without marker\n")));
        assert!(is_stale(&plan, Some("<!-- PLAN_HASH: 00 -->")));
    }
}
