//! Insight commands: leverage ranking and risk detection.

use anyhow::Result;
use comfy_table::Cell;
use console::style;

use super::render::{self, risk_cell};
use crate::state::AppState;

/// Rank domains by downstream leverage.
pub fn leverage(state: &AppState, json: bool) -> Result<()> {
    let rankings = state.engine.rank_by_leverage(&state.assessment);

    if json {
        return render::print_json(&rankings);
    }

    let top = rankings.first().map(|r| r.leverage_score).unwrap_or(0.0);
    if top == 0.0 {
        render::info("No domain has anything downstream; leverage is zero everywhere.");
        return Ok(());
    }

    let mut table = render::table(&["#", "Domain", "Score", "", "Downstream domains", "Downstream skills"]);
    for (rank, r) in rankings.iter().enumerate() {
        let name = state
            .engine
            .catalog()
            .domain(&r.domain_id)
            .map(|d| d.name.as_str())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{} {}", r.domain_id, name)),
            Cell::new(format!("{:.2}", r.leverage_score)),
            Cell::new(render::bar(r.leverage_score, top, 10)),
            Cell::new(r.downstream_domains),
            Cell::new(r.downstream_skills),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// List structural risks, most severe first.
pub fn risks(state: &AppState, json: bool) -> Result<()> {
    let risks = state
        .engine
        .detect_cascade_risks(&state.assessment, &state.snapshots);

    if json {
        return render::print_json(&risks);
    }

    if risks.is_empty() {
        println!();
        println!("  {} No cascade risks detected.", style("✓").green().bold());
        if state.snapshots.is_empty() {
            println!(
                "  {}",
                style("Regression checks need a snapshot history (--snapshots).").dim()
            );
        }
        println!();
        return Ok(());
    }

    let mut table = render::table(&["Kind", "Severity", "Act on", "Affected", "Details"]);
    for risk in &risks {
        let affected = risk
            .affected_domains
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            risk_cell(risk.kind),
            Cell::new(format!("{:.2}", risk.severity)),
            Cell::new(&risk.action_domain_id),
            Cell::new(affected),
            Cell::new(&risk.description),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
