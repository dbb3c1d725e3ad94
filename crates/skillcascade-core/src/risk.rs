//! Structural risk detection: inversions, regressions and bottlenecks.
//!
//! Severity formulas:
//!
//! - inversion: `dependent.avg - prerequisite.avg`
//! - regression: `baseline.avg - current.avg`
//! - bottleneck: `(readiness_threshold - avg) * (1 + downstream_domains / (domains - 1))`
//!
//! All three are strictly positive whenever a risk is reported, and share the
//! 0-3 rating scale so they can be sorted together.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use skillcascade_types::assessment::{Assessment, Snapshot};
use skillcascade_types::catalog::{DomainId, EdgeKind};
use skillcascade_types::config::{EngineConfig, RegressionBaseline};
use skillcascade_types::health::DomainHealth;
use skillcascade_types::insight::{Risk, RiskKind};

use crate::catalog::Catalog;
use crate::graph::DependencyGraph;
use crate::health::compute_domain_health;
use crate::leverage::rank_by_leverage;

/// Scan current health and snapshot history for structural risks.
///
/// Returns risks sorted by descending severity. Regression risks need at
/// least one snapshot; with an empty history none are reported.
pub fn detect_cascade_risks(
    catalog: &Catalog,
    graph: &DependencyGraph,
    config: &EngineConfig,
    assessment: &Assessment,
    snapshots: &[Snapshot],
) -> Vec<Risk> {
    let health = compute_domain_health(catalog, graph, &config.health, assessment);

    let mut risks = detect_inversions(catalog, graph, &health);
    risks.extend(detect_regressions(catalog, graph, config, &health, snapshots));
    risks.extend(detect_bottlenecks(catalog, graph, config, &health));

    risks.sort_by(compare_risks);
    tracing::debug!(count = risks.len(), "cascade risk scan complete");
    risks
}

fn compare_risks(a: &Risk, b: &Risk) -> Ordering {
    b.severity
        .total_cmp(&a.severity)
        .then_with(|| a.kind.cmp(&b.kind))
        .then_with(|| a.action_domain_id.cmp(&b.action_domain_id))
        .then_with(|| a.affected_domains.cmp(&b.affected_domains))
}

fn name_of<'a>(catalog: &'a Catalog, id: &'a DomainId) -> &'a str {
    catalog.domain(id).map(|d| d.name.as_str()).unwrap_or(id.as_str())
}

/// Weakest assessed domain among `candidates`, preferring foundational ones
/// on equal averages. Falls back to `fallback` when none is assessed.
fn weakest_contributor(
    catalog: &Catalog,
    health: &BTreeMap<DomainId, DomainHealth>,
    candidates: impl IntoIterator<Item = DomainId>,
    fallback: &DomainId,
) -> DomainId {
    candidates
        .into_iter()
        .filter_map(|id| {
            let h = health.get(&id)?;
            h.is_assessed().then_some((id, h.avg))
        })
        .min_by(|(a_id, a_avg), (b_id, b_avg)| {
            a_avg
                .total_cmp(b_avg)
                .then_with(|| catalog.tier_position(a_id).cmp(&catalog.tier_position(b_id)))
                .then_with(|| a_id.cmp(b_id))
        })
        .map(|(id, _)| id)
        .unwrap_or_else(|| fallback.clone())
}

// ---------------------------------------------------------------------------
// Inversions
// ---------------------------------------------------------------------------

fn detect_inversions(
    catalog: &Catalog,
    graph: &DependencyGraph,
    health: &BTreeMap<DomainId, DomainHealth>,
) -> Vec<Risk> {
    let mut seen = BTreeSet::new();
    let mut risks = Vec::new();

    for edge in catalog.edges().iter().filter(|e| e.kind == EdgeKind::Requires) {
        if !seen.insert((&edge.from, &edge.to)) {
            continue;
        }
        let (Some(upstream), Some(dependent)) = (health.get(&edge.from), health.get(&edge.to)) else {
            continue;
        };
        if !upstream.is_assessed() || !dependent.is_assessed() || dependent.avg <= upstream.avg {
            continue;
        }

        let gap = dependent.avg - upstream.avg;
        let mut candidates = graph.requires_ancestors(&edge.from);
        candidates.insert(edge.from.clone());
        let action = weakest_contributor(catalog, health, candidates, &edge.from);

        risks.push(Risk {
            kind: RiskKind::Inversion,
            severity: gap,
            affected_domains: BTreeSet::from([edge.from.clone(), edge.to.clone()]),
            action_domain_id: action,
            description: format!(
                "{} ({:.2}) is ahead of its prerequisite {} ({:.2})",
                name_of(catalog, &edge.to),
                dependent.avg,
                name_of(catalog, &edge.from),
                upstream.avg,
            ),
        });
    }
    risks
}

// ---------------------------------------------------------------------------
// Regressions
// ---------------------------------------------------------------------------

fn select_baseline<'a>(baseline: &RegressionBaseline, snapshots: &'a [Snapshot]) -> Option<&'a Snapshot> {
    let earliest = || snapshots.iter().min_by_key(|s| s.timestamp);
    match baseline {
        RegressionBaseline::Earliest => earliest(),
        RegressionBaseline::Latest => snapshots.iter().max_by_key(|s| s.timestamp),
        RegressionBaseline::Snapshot(id) => snapshots.iter().find(|s| &s.id == id).or_else(|| {
            tracing::debug!(snapshot = %id, "baseline snapshot not found, using earliest");
            earliest()
        }),
    }
}

fn detect_regressions(
    catalog: &Catalog,
    graph: &DependencyGraph,
    config: &EngineConfig,
    current: &BTreeMap<DomainId, DomainHealth>,
    snapshots: &[Snapshot],
) -> Vec<Risk> {
    let Some(baseline) = select_baseline(&config.risk.regression_baseline, snapshots) else {
        return Vec::new();
    };
    let before = compute_domain_health(catalog, graph, &config.health, &baseline.assessment);

    let mut risks = Vec::new();
    for domain in catalog.domains() {
        let (Some(then), Some(now)) = (before.get(&domain.id), current.get(&domain.id)) else {
            continue;
        };
        if !then.is_assessed() || !now.is_assessed() {
            continue;
        }
        let drop = then.avg - now.avg;
        if drop <= config.risk.regression_threshold {
            continue;
        }

        let mut affected = graph.requires_descendants(&domain.id);
        affected.insert(domain.id.clone());

        risks.push(Risk {
            kind: RiskKind::Regression,
            severity: drop,
            affected_domains: affected,
            action_domain_id: domain.id.clone(),
            description: format!(
                "{} fell from {:.2} to {:.2} since '{}'",
                domain.name, then.avg, now.avg, baseline.label
            ),
        });
    }
    risks
}

// ---------------------------------------------------------------------------
// Bottlenecks
// ---------------------------------------------------------------------------

fn detect_bottlenecks(
    catalog: &Catalog,
    graph: &DependencyGraph,
    config: &EngineConfig,
    health: &BTreeMap<DomainId, DomainHealth>,
) -> Vec<Risk> {
    let rankings = rank_by_leverage(catalog, graph, &config.leverage, health);
    if rankings.is_empty() {
        return Vec::new();
    }

    let mean_reach =
        rankings.iter().map(|r| r.downstream_skills as f64).sum::<f64>() / rankings.len() as f64;
    let threshold = config.health.readiness_threshold;
    let peers = graph.domain_count().saturating_sub(1).max(1) as f64;

    // Rankings are already sorted by leverage.
    rankings
        .iter()
        .filter(|r| r.downstream_skills > 0 && r.downstream_skills as f64 >= mean_reach)
        .filter_map(|r| {
            let domain = catalog.domain(&r.domain_id)?;
            let h = health.get(&r.domain_id)?;
            let weak = !domain.independent && h.is_assessed() && h.avg < threshold;
            weak.then_some((r, domain, h))
        })
        .take(config.risk.bottleneck_limit)
        .map(|(r, domain, h)| {
            let mut candidates = graph.requires_ancestors(&r.domain_id);
            candidates.insert(r.domain_id.clone());
            let action = weakest_contributor(catalog, health, candidates, &r.domain_id);

            let mut affected = graph.downstream(&r.domain_id);
            affected.insert(r.domain_id.clone());

            Risk {
                kind: RiskKind::Bottleneck,
                severity: (threshold - h.avg) * (1.0 + r.downstream_domains as f64 / peers),
                affected_domains: affected,
                action_domain_id: action,
                description: format!(
                    "{} ({:.2}) gates {} downstream skills across {} domains",
                    domain.name, h.avg, r.downstream_skills, r.downstream_domains
                ),
            }
        })
        .collect()
}
