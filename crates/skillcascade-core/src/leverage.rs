//! Leverage ranking: which domain is worth improving first.
//!
//! ```text
//! reach    = downstream_domains + skill_weight * downstream_skills
//! weakness = (3 - avg) / 3
//! score    = reach * (1 + weakness)
//! ```
//!
//! A domain with nothing downstream has zero reach and therefore a score of
//! exactly 0, regardless of its own weakness.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use skillcascade_types::assessment::MAX_RATING;
use skillcascade_types::catalog::DomainId;
use skillcascade_types::config::LeverageConfig;
use skillcascade_types::health::DomainHealth;
use skillcascade_types::insight::ImpactRanking;

use crate::catalog::Catalog;
use crate::graph::DependencyGraph;

/// Rank every domain by downstream leverage, highest first.
///
/// Ties are broken by ascending tier position (more foundational first),
/// then by domain id.
pub fn rank_by_leverage(
    catalog: &Catalog,
    graph: &DependencyGraph,
    config: &LeverageConfig,
    health: &BTreeMap<DomainId, DomainHealth>,
) -> Vec<ImpactRanking> {
    let max = f64::from(MAX_RATING);

    let mut rankings: Vec<ImpactRanking> = catalog
        .domains()
        .iter()
        .map(|domain| {
            let downstream = graph.downstream(&domain.id);
            let downstream_domains = downstream.len();
            let downstream_skills: usize = downstream.iter().map(|d| catalog.skill_count(d)).sum();

            let avg = health.get(&domain.id).map(|h| h.avg).unwrap_or(0.0);
            let weakness = ((max - avg) / max).clamp(0.0, 1.0);
            let reach = downstream_domains as f64 + config.skill_weight * downstream_skills as f64;

            ImpactRanking {
                domain_id: domain.id.clone(),
                leverage_score: reach * (1.0 + weakness),
                downstream_domains,
                downstream_skills,
            }
        })
        .collect();

    rankings.sort_by(|a, b| compare_rankings(catalog, a, b));
    rankings
}

fn compare_rankings(catalog: &Catalog, a: &ImpactRanking, b: &ImpactRanking) -> Ordering {
    b.leverage_score
        .total_cmp(&a.leverage_score)
        .then_with(|| {
            catalog
                .tier_position(&a.domain_id)
                .cmp(&catalog.tier_position(&b.domain_id))
        })
        .then_with(|| a.domain_id.cmp(&b.domain_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::compute_domain_health;
    use crate::testing::{approx_eq, nine_domain_graph, rate_domain};
    use skillcascade_types::assessment::Assessment;
    use skillcascade_types::catalog::DependencyEdge;
    use skillcascade_types::config::HealthConfig;

    fn ranking_for<'a>(rankings: &'a [ImpactRanking], id: &str) -> &'a ImpactRanking {
        rankings.iter().find(|r| r.domain_id.as_str() == id).unwrap()
    }

    #[test]
    fn test_no_edges_all_zero() {
        let (catalog, graph) = nine_domain_graph(vec![]);
        let health = compute_domain_health(&catalog, &graph, &HealthConfig::default(), &Assessment::new());
        let rankings = rank_by_leverage(&catalog, &graph, &LeverageConfig::default(), &health);
        assert_eq!(rankings.len(), 9);
        assert!(rankings.iter().all(|r| r.leverage_score == 0.0));
        assert!(rankings.iter().all(|r| r.downstream_domains == 0 && r.downstream_skills == 0));
        // All tied: ordered by tier position, then id.
        let ids: Vec<&str> = rankings.iter().map(|r| r.domain_id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3", "d4", "d5", "d6", "d7", "d8", "d9"]);
    }

    #[test]
    fn test_leaf_domains_score_zero() {
        let (catalog, graph) = nine_domain_graph(vec![
            DependencyEdge::requires("d1", "d2"),
            DependencyEdge::requires("d2", "d3"),
            DependencyEdge::supports("d1", "d4"),
        ]);
        let health = compute_domain_health(&catalog, &graph, &HealthConfig::default(), &Assessment::new());
        let rankings = rank_by_leverage(&catalog, &graph, &LeverageConfig::default(), &health);
        for leaf in ["d3", "d4", "d5", "d9"] {
            assert_eq!(ranking_for(&rankings, leaf).leverage_score, 0.0, "{leaf}");
        }
        let d1 = ranking_for(&rankings, "d1");
        assert_eq!(d1.downstream_domains, 3);
        assert_eq!(d1.downstream_skills, 9);
        // (3 + 0.1 * 9) * (1 + 1)
        assert!(approx_eq(d1.leverage_score, 7.8));
        assert_eq!(rankings[0].domain_id.as_str(), "d1");
    }

    #[test]
    fn test_weaker_domain_ranks_higher_at_equal_reach() {
        let (catalog, graph) = nine_domain_graph(vec![
            DependencyEdge::requires("d1", "d5"),
            DependencyEdge::requires("d3", "d6"),
        ]);
        let mut a = Assessment::new();
        rate_domain(&mut a, "d1", 3);
        rate_domain(&mut a, "d3", 1);
        let health = compute_domain_health(&catalog, &graph, &HealthConfig::default(), &a);
        let rankings = rank_by_leverage(&catalog, &graph, &LeverageConfig::default(), &health);
        assert_eq!(rankings[0].domain_id.as_str(), "d3");
        assert_eq!(rankings[1].domain_id.as_str(), "d1");
        assert!(rankings[0].leverage_score > rankings[1].leverage_score);
        // Mastered domain keeps its reach with no weakness bonus.
        assert!(approx_eq(rankings[1].leverage_score, 1.3));
    }

    #[test]
    fn test_ties_break_by_tier_position() {
        let (catalog, graph) = nine_domain_graph(vec![
            DependencyEdge::requires("d5", "d6"),
            DependencyEdge::requires("d1", "d2"),
        ]);
        let health = compute_domain_health(&catalog, &graph, &HealthConfig::default(), &Assessment::new());
        let rankings = rank_by_leverage(&catalog, &graph, &LeverageConfig::default(), &health);
        assert_eq!(rankings[0].domain_id.as_str(), "d1");
        assert_eq!(rankings[1].domain_id.as_str(), "d5");
    }
}
