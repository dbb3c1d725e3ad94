//! Health commands: domain health, sub-area breakdown, graph view.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color};
use console::style;

use skillcascade_types::catalog::{DomainId, EdgeKind};

use super::render::{self, bar, percent, state_cell};
use crate::state::AppState;

/// Show health for every domain in catalog order.
pub fn health(state: &AppState, json: bool) -> Result<()> {
    let health = state
        .cache
        .get_or_compute(&state.engine, &state.assessment, &Default::default());

    if json {
        return render::print_json(&*health);
    }

    let mut table = render::table(&["Domain", "Name", "Avg", "", "Assessed", "State"]);
    for domain in state.engine.catalog().domains() {
        let Some(h) = health.get(&domain.id) else {
            continue;
        };
        table.add_row(vec![
            Cell::new(&domain.id),
            Cell::new(&domain.name),
            Cell::new(format!("{:.2}", h.avg)),
            Cell::new(bar(h.avg, 3.0, 12)),
            Cell::new(format!("{}/{} ({})", h.assessed, h.total, percent(h.health_pct))),
            state_cell(h.state),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Show sub-area health, tier breakdown and optional prerequisite readiness.
pub fn sub_areas(state: &AppState, domain: &DomainId, prerequisites: bool, json: bool) -> Result<()> {
    let Some(entry) = state.engine.catalog().domain(domain) else {
        bail!("unknown domain '{domain}'");
    };
    let areas = state
        .engine
        .sub_area_health(&state.assessment, domain, prerequisites);

    if json {
        return render::print_json(&areas);
    }

    println!();
    println!(
        "  {} {}",
        style(&entry.name).cyan().bold(),
        style(format!("({domain})")).dim()
    );

    let mut table = render::table(&["Sub-area", "Avg", "Assessed", "State", "Tiers met (1-5)"]);
    for area in &areas {
        let tiers = area
            .tiers
            .iter()
            .map(|t| {
                if t.total == 0 {
                    "-".to_string()
                } else {
                    format!("{}/{}", t.met, t.total)
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        table.add_row(vec![
            Cell::new(&area.name),
            Cell::new(format!("{:.2}", area.health.avg)),
            Cell::new(format!("{}/{}", area.health.assessed, area.health.total)),
            state_cell(area.health.state),
            Cell::new(tiers),
        ]);
    }
    println!("{table}");

    if prerequisites {
        render::section("Cross-domain prerequisites");
        let rows: Vec<_> = areas
            .iter()
            .flat_map(|a| a.prerequisites.iter().flatten().map(move |p| (a, p)))
            .collect();
        if rows.is_empty() {
            println!("  {}", style("none").dim());
        } else {
            let mut table = render::table(&["Sub-area", "Skill", "Needs", "From", "Level", "Status"]);
            for (area, p) in rows {
                table.add_row(vec![
                    Cell::new(&area.name),
                    Cell::new(&p.skill_id),
                    Cell::new(&p.prerequisite_id),
                    Cell::new(&p.prerequisite_domain),
                    Cell::new(
                        p.current_level
                            .map(|l| format!("{l:.1}"))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    render::readiness_cell(Some(p.status)),
                ]);
            }
            println!("{table}");
        }
    }
    println!();
    Ok(())
}

/// Show the dependency graph with health annotations.
pub fn graph(state: &AppState, json: bool) -> Result<()> {
    let view = state.engine.graph_view(&state.assessment);

    if json {
        return render::print_json(&view);
    }

    render::section("Domains");
    let mut nodes = render::table(&["Row", "Col", "Domain", "Avg", "State", "Independent"]);
    let mut sorted: Vec<_> = view.nodes.iter().collect();
    sorted.sort_by_key(|n| (n.tier, n.column));
    for node in sorted {
        nodes.add_row(vec![
            Cell::new(node.tier),
            Cell::new(node.column),
            Cell::new(format!("{} {}", node.domain_id, node.name)),
            Cell::new(format!("{:.2}", node.avg)),
            state_cell(node.state),
            Cell::new(if node.independent { "yes" } else { "" }),
        ]);
    }
    println!("{nodes}");

    render::section("Edges");
    if view.edges.is_empty() {
        println!("  {}", style("none").dim());
    } else {
        let mut edges = render::table(&["From", "", "To", "Source health"]);
        for edge in &view.edges {
            let arrow = match edge.kind {
                EdgeKind::Requires => Cell::new("══▶ requires"),
                EdgeKind::Supports => Cell::new("──▷ supports").fg(Color::DarkGrey),
            };
            let health = Cell::new(percent(edge.source_health_pct));
            let health = if edge.is_weak { health.fg(Color::Red) } else { health };
            edges.add_row(vec![Cell::new(&edge.from), arrow, Cell::new(&edge.to), health]);
        }
        println!("{edges}");
    }
    println!();
    Ok(())
}

