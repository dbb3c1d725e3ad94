//! Cascade commands: what-if projection and live trigger.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use comfy_table::{Cell, Color};
use console::style;

use skillcascade_types::catalog::DomainId;

use super::render::{self, state_cell};
use crate::state::AppState;

/// Project health after applying domain overrides and show what moved.
pub fn what_if(state: &AppState, overrides: &[(DomainId, f64)], json: bool) -> Result<()> {
    for (domain, _) in overrides {
        if !state.engine.catalog().contains_domain(domain) {
            bail!("unknown domain '{domain}'");
        }
    }
    let overrides: BTreeMap<DomainId, f64> = overrides.iter().cloned().collect();

    let current = state
        .cache
        .get_or_compute(&state.engine, &state.assessment, &BTreeMap::new());
    let projected = state
        .cache
        .get_or_compute(&state.engine, &state.assessment, &overrides);

    if json {
        let rows: Vec<_> = state
            .engine
            .catalog()
            .domains()
            .iter()
            .filter_map(|d| {
                let before = current.get(&d.id)?;
                let after = projected.get(&d.id)?;
                Some(serde_json::json!({
                    "domain_id": d.id,
                    "overridden": overrides.contains_key(&d.id),
                    "current": before,
                    "projected": after,
                    "delta": after.avg - before.avg,
                }))
            })
            .collect();
        return render::print_json(&rows);
    }

    let mut table = render::table(&["Domain", "Current", "Projected", "Δ", "State"]);
    for domain in state.engine.catalog().domains() {
        let (Some(before), Some(after)) = (current.get(&domain.id), projected.get(&domain.id)) else {
            continue;
        };
        let delta = after.avg - before.avg;
        let delta_cell = if delta > 1e-9 {
            Cell::new(format!("+{delta:.2}")).fg(Color::Green)
        } else if delta < -1e-9 {
            Cell::new(format!("{delta:.2}")).fg(Color::Red)
        } else {
            Cell::new("·").fg(Color::DarkGrey)
        };
        let label = if overrides.contains_key(&domain.id) {
            format!("{} *", domain.id)
        } else {
            domain.id.to_string()
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format!("{:.2}", before.avg)),
            Cell::new(format!("{:.2}", after.avg)),
            delta_cell,
            state_cell(after.state),
        ]);
    }

    println!();
    println!("{table}");
    println!("  {}", style("* overridden").dim());
    println!();
    Ok(())
}

/// Show every domain a change in `domain` reaches, strongest first.
pub fn trigger(state: &AppState, domain: &DomainId, json: bool) -> Result<()> {
    let cascade = state.engine.trigger_cascade(domain);
    if !cascade.active {
        bail!("unknown domain '{domain}'");
    }

    if json {
        return render::print_json(&cascade);
    }

    if cascade.affected.is_empty() {
        render::info(&format!("Nothing downstream of {domain}."));
        return Ok(());
    }

    let mut affected: Vec<_> = cascade.affected.iter().collect();
    affected.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut table = render::table(&["Domain", "Name", "Strength", ""]);
    for (id, strength) in affected {
        let name = state
            .engine
            .catalog()
            .domain(id)
            .map(|d| d.name.as_str())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(id),
            Cell::new(name),
            Cell::new(format!("{:.3}", strength)),
            Cell::new(render::bar(*strength, 1.0, 10)),
        ]);
    }

    println!();
    println!("  Cascade from {}", style(domain).cyan().bold());
    println!("{table}");
    println!();
    Ok(())
}
