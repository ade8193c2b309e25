use crate::cmd::show::print_plan;
use crate::output::print_json;
use anyhow::Context;
use plansync_core::heal;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let plan = heal::read_canonical_only(root)
        .with_context(|| format!("plan.json in {} is missing or invalid", root.display()))?;

    if json {
        return print_json(&plan);
    }
    print_plan(&plan);
    Ok(())
}
