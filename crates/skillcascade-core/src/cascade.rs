//! Cascade simulation: what-if projection and live impact.
//!
//! Both operations share one propagation model, [`DependencyGraph::path_strengths`].
//! A change of `delta` in a source domain moves every reachable domain by
//! `strength * delta`; contributions from several overridden sources add up.
//! All coefficients are non-negative, so raising any override target can
//! never lower any simulated average.

use std::collections::BTreeMap;

use skillcascade_types::assessment::{Assessment, MAX_RATING, SimulatedAssessment, SkillLevels};
use skillcascade_types::cascade::CascadeState;
use skillcascade_types::catalog::{DomainId, SkillId};
use skillcascade_types::config::CascadeConfig;

use crate::catalog::Catalog;
use crate::graph::DependencyGraph;

const MAX_LEVEL: f64 = MAX_RATING as f64;

/// Apply what-if domain targets and propagate the change downstream.
///
/// Overrides for unknown domains or with non-finite targets are ignored;
/// targets are clamped to `[0, 3]`. An empty override set returns an
/// unchanged copy. Domains with no assessed skills are only changed when
/// overridden directly to a non-zero target, in which case every skill is
/// set to the target.
pub fn simulate_cascade(
    catalog: &Catalog,
    graph: &DependencyGraph,
    config: &CascadeConfig,
    assessment: &Assessment,
    overrides: &BTreeMap<DomainId, f64>,
) -> SimulatedAssessment {
    let mut simulated = SimulatedAssessment::from_assessment(assessment);

    let targets: BTreeMap<&DomainId, f64> = overrides
        .iter()
        .filter_map(|(id, target)| {
            if !catalog.contains_domain(id) {
                tracing::debug!(domain = %id, "ignoring override for unknown domain");
                return None;
            }
            if !target.is_finite() {
                tracing::warn!(domain = %id, target, "ignoring non-finite override target");
                return None;
            }
            Some((id, target.clamp(0.0, MAX_LEVEL)))
        })
        .collect();

    let current: BTreeMap<&DomainId, (f64, usize)> = catalog
        .domains()
        .iter()
        .map(|d| (&d.id, current_average(catalog, assessment, &d.id)))
        .collect();

    // An unassessed domain held at 0 is not a change.
    let targets: BTreeMap<&DomainId, f64> = targets
        .into_iter()
        .filter(|&(id, target)| current[id].1 > 0 || target != 0.0)
        .collect();

    if targets.is_empty() {
        return simulated;
    }

    let mut deltas: BTreeMap<DomainId, f64> = BTreeMap::new();
    for (&source, &target) in &targets {
        let delta = target - current[source].0;
        for (downstream, strength) in graph.path_strengths(source, config) {
            if !targets.contains_key(&downstream) {
                *deltas.entry(downstream).or_insert(0.0) += strength * delta;
            }
        }
    }

    for domain in graph.topological_order() {
        let (avg, assessed) = current[domain];
        if let Some(&target) = targets.get(domain) {
            if assessed == 0 {
                for skill in catalog.domain_skills(domain) {
                    simulated.set(skill.id.clone(), target);
                }
            } else {
                rescale_domain(catalog, assessment, &mut simulated, domain, avg, target);
            }
        } else if let Some(&delta) = deltas.get(domain) {
            if assessed > 0 && delta != 0.0 {
                let target = (avg + delta).clamp(0.0, MAX_LEVEL);
                rescale_domain(catalog, assessment, &mut simulated, domain, avg, target);
            }
        }
    }

    simulated
}

/// Mean rating and assessed count of one domain.
fn current_average(catalog: &Catalog, assessment: &Assessment, domain: &DomainId) -> (f64, usize) {
    let (sum, count) = catalog
        .domain_skills(domain)
        .filter_map(|s| assessment.level(&s.id))
        .fold((0.0, 0usize), |(sum, count), level| (sum + level, count + 1));
    if count == 0 { (0.0, 0) } else { (sum / count as f64, count) }
}

/// Move every assessed skill of `domain` so the domain mean becomes `target`.
///
/// Raising interpolates each level toward 3 by the same fraction; lowering
/// scales each level toward 0 by the same factor. Both hit the target mean
/// exactly, are monotonic in `target`, and leave levels untouched when
/// `target == current`.
fn rescale_domain(
    catalog: &Catalog,
    assessment: &Assessment,
    simulated: &mut SimulatedAssessment,
    domain: &DomainId,
    current: f64,
    target: f64,
) {
    let assessed: Vec<(SkillId, f64)> = catalog
        .domain_skills(domain)
        .filter_map(|s| assessment.level(&s.id).map(|l| (s.id.clone(), l)))
        .collect();

    for (skill, level) in assessed {
        simulated.set(skill, rescale_level(level, current, target));
    }
}

fn rescale_level(level: f64, current: f64, target: f64) -> f64 {
    if target >= current {
        if current >= MAX_LEVEL {
            return level;
        }
        let fraction = (target - current) / (MAX_LEVEL - current);
        level + (MAX_LEVEL - level) * fraction
    } else {
        // target < current implies current > 0
        level * (target / current)
    }
}

/// Compute the live cascade from one domain.
///
/// Returns an inactive state for an unknown domain.
pub fn trigger_cascade(graph: &DependencyGraph, config: &CascadeConfig, source: &DomainId) -> CascadeState {
    if !graph.contains(source) {
        tracing::debug!(domain = %source, "cascade triggered for unknown domain");
        return CascadeState::inactive();
    }
    CascadeState {
        active: true,
        source: Some(source.clone()),
        affected: graph
            .path_strengths(source, config)
            .into_iter()
            .filter(|(_, strength)| *strength > 0.0)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::compute_domain_health;
    use crate::testing::{approx_eq, nine_domain_graph, overrides, rate_domain, rate_skills};
    use skillcascade_types::catalog::DependencyEdge;
    use skillcascade_types::config::HealthConfig;
    use skillcascade_types::health::{DomainHealth, HealthState};

    fn id(s: &str) -> DomainId {
        DomainId::from(s)
    }

    fn chain_graph() -> (Catalog, DependencyGraph) {
        nine_domain_graph(vec![
            DependencyEdge::requires("d1", "d2"),
            DependencyEdge::requires("d2", "d3"),
            DependencyEdge::supports("d1", "d5"),
            DependencyEdge::supports("d3", "d1"),
        ])
    }

    fn baseline() -> Assessment {
        let mut a = Assessment::new();
        rate_skills(&mut a, "d1", [2, 1, 2]);
        rate_skills(&mut a, "d2", [1, 2, 1]);
        rate_skills(&mut a, "d3", [1, 1, 0]);
        rate_skills(&mut a, "d5", [3, 2, 2]);
        rate_domain(&mut a, "d6", 2);
        a
    }

    fn simulated_health(
        catalog: &Catalog,
        graph: &DependencyGraph,
        a: &Assessment,
        entries: &[(&str, f64)],
    ) -> BTreeMap<DomainId, DomainHealth> {
        let sim = simulate_cascade(catalog, graph, &CascadeConfig::default(), a, &overrides(entries));
        compute_domain_health(catalog, graph, &HealthConfig::default(), &sim)
    }

    #[test]
    fn test_empty_overrides_is_identity() {
        let (catalog, graph) = chain_graph();
        let a = baseline();
        let sim = simulate_cascade(&catalog, &graph, &CascadeConfig::default(), &a, &BTreeMap::new());
        assert_eq!(sim, SimulatedAssessment::from_assessment(&a));

        let config = HealthConfig::default();
        assert_eq!(
            compute_domain_health(&catalog, &graph, &config, &sim),
            compute_domain_health(&catalog, &graph, &config, &a)
        );
    }

    #[test]
    fn test_override_hits_target_average() {
        let (catalog, graph) = chain_graph();
        let a = baseline();
        let up = simulated_health(&catalog, &graph, &a, &[("d1", 2.8)]);
        assert!(approx_eq(up[&id("d1")].avg, 2.8));
        let down = simulated_health(&catalog, &graph, &a, &[("d1", 0.5)]);
        assert!(approx_eq(down[&id("d1")].avg, 0.5));
    }

    #[test]
    fn test_override_at_current_average_changes_nothing() {
        let (catalog, graph) = chain_graph();
        let a = baseline();
        let current = 5.0 / 3.0;
        let sim = simulate_cascade(&catalog, &graph, &CascadeConfig::default(), &a, &overrides(&[("d1", current)]));
        for (skill, level) in SimulatedAssessment::from_assessment(&a).iter() {
            assert!(approx_eq(sim.level(skill).unwrap(), level), "skill {skill} moved");
        }
    }

    #[test]
    fn test_zero_override_on_unassessed_domain_changes_nothing() {
        let (catalog, graph) = nine_domain_graph(vec![DependencyEdge::requires("d1", "d2")]);
        let a = Assessment::new();
        let before = compute_domain_health(&catalog, &graph, &HealthConfig::default(), &a);
        let after = simulated_health(&catalog, &graph, &a, &[("d2", 0.0)]);
        assert_eq!(after, before);
        assert_eq!(after[&id("d2")].assessed, 0);
        assert_eq!(after[&id("d2")].state, HealthState::Locked);

        let sim = simulate_cascade(&catalog, &graph, &CascadeConfig::default(), &a, &overrides(&[("d2", 0.0)]));
        assert!(sim.is_empty());
    }

    #[test]
    fn test_downward_override_propagates_downstream() {
        let (catalog, graph) = nine_domain_graph(vec![DependencyEdge::requires("d1", "d2")]);
        let mut a = Assessment::new();
        rate_domain(&mut a, "d1", 3);
        rate_skills(&mut a, "d2", [2, 2, 1]);
        let config = HealthConfig::default();
        let before = compute_domain_health(&catalog, &graph, &config, &a);
        let after = simulated_health(&catalog, &graph, &a, &[("d1", 0.0)]);
        assert!(approx_eq(after[&id("d1")].avg, 0.0));
        assert!(after[&id("d2")].avg < before[&id("d2")].avg);
        // delta -3 * 0.6 = -1.8 from 1.667 clamps at 0
        assert!(approx_eq(after[&id("d2")].avg, 0.0));
    }

    #[test]
    fn test_downward_override_with_unassessed_dependent() {
        let (catalog, graph) = nine_domain_graph(vec![DependencyEdge::requires("d1", "d2")]);
        let mut a = Assessment::new();
        rate_domain(&mut a, "d1", 3);
        let config = HealthConfig::default();
        let before = compute_domain_health(&catalog, &graph, &config, &a);
        let after = simulated_health(&catalog, &graph, &a, &[("d1", 0.0)]);
        assert!(after[&id("d2")].avg <= before[&id("d2")].avg);
        assert_eq!(after[&id("d2")].assessed, 0);
    }

    #[test]
    fn test_unreachable_domains_unchanged() {
        let (catalog, graph) = chain_graph();
        let a = baseline();
        let before = compute_domain_health(&catalog, &graph, &HealthConfig::default(), &a);
        let after = simulated_health(&catalog, &graph, &a, &[("d2", 3.0)]);
        assert_eq!(after[&id("d6")], before[&id("d6")]);
        assert_eq!(after[&id("d4")], before[&id("d4")]);
        assert!(after[&id("d3")].avg > before[&id("d3")].avg);
        // d2 reaches d1 only through d3's supports edge, and d5 through d1.
        assert!(after[&id("d1")].avg > before[&id("d1")].avg);
        assert!(after[&id("d5")].avg > before[&id("d5")].avg);
    }

    #[test]
    fn test_simulation_is_monotonic_in_targets() {
        let (catalog, graph) = chain_graph();
        let a = baseline();
        let targets = [0.0, 0.4, 1.0, 1.6, 2.2, 2.9, 3.0];
        for pair in targets.windows(2) {
            let low = simulated_health(&catalog, &graph, &a, &[("d1", pair[0]), ("d2", 1.0)]);
            let high = simulated_health(&catalog, &graph, &a, &[("d1", pair[1]), ("d2", 1.2)]);
            for (domain, h) in &low {
                assert!(
                    high[domain].avg + 1e-9 >= h.avg,
                    "{domain} dropped from {} to {} raising d1 {} -> {}",
                    h.avg,
                    high[domain].avg,
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_unassessed_override_fills_domain() {
        let (catalog, graph) = chain_graph();
        let a = baseline();
        let after = simulated_health(&catalog, &graph, &a, &[("d4", 2.0)]);
        assert_eq!(after[&id("d4")].assessed, 3);
        assert!(approx_eq(after[&id("d4")].avg, 2.0));
    }

    #[test]
    fn test_unknown_and_non_finite_overrides_ignored() {
        let (catalog, graph) = chain_graph();
        let a = baseline();
        let sim = simulate_cascade(
            &catalog,
            &graph,
            &CascadeConfig::default(),
            &a,
            &overrides(&[("d42", 3.0), ("d1", f64::NAN)]),
        );
        assert_eq!(sim, SimulatedAssessment::from_assessment(&a));
    }

    #[test]
    fn test_targets_are_clamped() {
        let (catalog, graph) = chain_graph();
        let a = baseline();
        let after = simulated_health(&catalog, &graph, &a, &[("d1", 7.5)]);
        assert!(approx_eq(after[&id("d1")].avg, 3.0));
    }

    #[test]
    fn test_trigger_cascade_strengths() {
        let (_, graph) = chain_graph();
        let state = trigger_cascade(&graph, &CascadeConfig::default(), &id("d1"));
        assert!(state.active);
        assert_eq!(state.source, Some(id("d1")));
        assert_eq!(state.affected.len(), 3);
        assert!(approx_eq(state.affected[&id("d2")], 0.6));
        assert!(approx_eq(state.affected[&id("d5")], 0.25));
        assert!(state.affected.values().all(|s| *s > 0.0 && *s <= 1.0));
        assert!(!state.affected.contains_key(&id("d1")));
    }

    #[test]
    fn test_trigger_cascade_on_leaf_and_unknown() {
        let (_, graph) = chain_graph();
        let leaf = trigger_cascade(&graph, &CascadeConfig::default(), &id("d5"));
        assert!(leaf.active);
        assert!(leaf.affected.is_empty());

        let unknown = trigger_cascade(&graph, &CascadeConfig::default(), &id("d42"));
        assert_eq!(unknown, CascadeState::inactive());
    }

    #[test]
    fn test_reset_after_trigger_leaves_no_residue() {
        let (_, graph) = chain_graph();
        let mut state = trigger_cascade(&graph, &CascadeConfig::default(), &id("d1"));
        state.reset();
        state.reset();
        assert_eq!(state, CascadeState::inactive());
    }
}
