use crate::output::print_json;
use anyhow::Context;
use plansync_core::migrate;
use std::path::Path;

pub fn run(file: &Path, swarm: Option<&str>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let plan = migrate::migrate(&text, swarm);
    if let Some(status) = plan.migration_status {
        tracing::info!(file = %file.display(), status = %status, "migrated legacy plan");
    }
    print_json(&plan)
}
