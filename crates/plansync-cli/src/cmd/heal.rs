use crate::output::print_json;
use plansync_core::heal;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let report = heal::load_with_outcome(root);

    if json {
        return print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "outcome": report.outcome,
            "plan": report.plan,
        }));
    }

    match &report.plan {
        Some(plan) => println!("{}: {} ({})", report.outcome, plan.title, root.display()),
        None => println!("{}: no plan in {}", report.outcome, root.display()),
    }
    Ok(())
}
