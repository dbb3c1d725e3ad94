//! Prerequisite path commands: chain readiness and skill bottlenecks.

use anyhow::{Result, bail};
use comfy_table::Cell;
use console::style;

use skillcascade_types::catalog::DomainId;
use skillcascade_types::health::ReadinessStatus;

use super::render::{self, readiness_cell};
use crate::state::AppState;

/// Show the prerequisite chain leading to `domain` and how ready each step is.
pub fn chain(state: &AppState, domain: &DomainId, json: bool) -> Result<()> {
    let chain = state.engine.find_prerequisite_chain(domain);
    if chain.is_empty() {
        bail!("unknown domain '{domain}'");
    }
    let steps = state.engine.compute_path_readiness(&chain, &state.assessment);

    if json {
        return render::print_json(&steps);
    }

    let mut table = render::table(&["Step", "Domain", "Avg", "Assessed", "Readiness"]);
    for (i, step) in steps.iter().enumerate() {
        let name = state
            .engine
            .catalog()
            .domain(&step.domain_id)
            .map(|d| d.name.as_str())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{} {}", step.domain_id, name)),
            Cell::new(format!("{:.2}", step.avg)),
            Cell::new(step.assessed),
            readiness_cell(step.status),
        ]);
    }

    println!();
    println!("{table}");

    let first_gap = steps
        .iter()
        .find(|s| matches!(s.status, Some(ReadinessStatus::Unmet | ReadinessStatus::Close)));
    match first_gap {
        Some(step) => println!(
            "  Start with {} ({})",
            style(&step.domain_id).yellow().bold(),
            step.status.map(render::readiness_word).unwrap_or_default()
        ),
        None if steps.len() > 1 => {
            println!("  {} Every prerequisite is ready.", style("✓").green().bold())
        }
        None => println!("  {}", style("No prerequisites.").dim()),
    }
    println!();
    Ok(())
}

/// List skills that gate the most higher-tier skills and are not yet acquired.
pub fn bottlenecks(state: &AppState, limit: usize, json: bool) -> Result<()> {
    let found = state.engine.find_skill_bottlenecks(&state.assessment, limit);

    if json {
        return render::print_json(&found);
    }

    if found.is_empty() {
        render::info("No skill bottlenecks: every gating skill is acquired.");
        return Ok(());
    }

    let mut table = render::table(&["Skill", "Name", "Domain", "Group", "Tier", "Level", "Blocks"]);
    for b in &found {
        table.add_row(vec![
            Cell::new(&b.skill_id),
            Cell::new(&b.name),
            Cell::new(&b.domain_id),
            Cell::new(&b.skill_group_id),
            Cell::new(b.tier),
            Cell::new(b.current_level.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(b.blocked_count),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
