use anyhow::Context;
use plansync_core::{heal, render};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let plan = heal::read_canonical_only(root)
        .with_context(|| format!("plan.json in {} is missing or invalid", root.display()))?;
    print!("{}", render::derive_now(&plan));
    Ok(())
}
