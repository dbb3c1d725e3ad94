//! Domain and sub-area health aggregation.
//!
//! Health is a pure function of skill levels, the catalog, and the
//! prerequisite structure. The calculator is generic over [`SkillLevels`] so
//! the same code scores real assessments and simulated what-if copies.

use std::collections::BTreeMap;

use skillcascade_types::assessment::SkillLevels;
use skillcascade_types::catalog::{DomainId, MAX_TIER, MIN_TIER, SubArea};
use skillcascade_types::config::HealthConfig;
use skillcascade_types::health::{
    DomainHealth, HealthState, ReadinessStatus, SkillPrerequisiteReadiness, SubAreaHealth,
    TierCount,
};

use crate::catalog::{Catalog, SkillRecord};
use crate::graph::DependencyGraph;

/// Raw aggregate over a set of skills, before state classification.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Aggregate {
    avg: f64,
    assessed: usize,
    total: usize,
}

impl Aggregate {
    fn over<'a, L, I>(skills: I, levels: &L) -> Self
    where
        L: SkillLevels + ?Sized,
        I: IntoIterator<Item = &'a SkillRecord>,
    {
        let mut sum = 0.0;
        let mut assessed = 0;
        let mut total = 0;
        for skill in skills {
            total += 1;
            if let Some(level) = levels.level(&skill.id) {
                sum += level;
                assessed += 1;
            }
        }
        let avg = if assessed == 0 { 0.0 } else { sum / assessed as f64 };
        Self { avg, assessed, total }
    }

    fn health_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.assessed as f64 / self.total as f64
        }
    }

    fn into_health(self, state: HealthState) -> DomainHealth {
        DomainHealth {
            avg: self.avg,
            assessed: self.assessed,
            total: self.total,
            health_pct: self.health_pct(),
            state,
        }
    }
}

/// Classify a readiness value against the threshold and close margin.
pub fn readiness(value: f64, config: &HealthConfig) -> ReadinessStatus {
    if value >= config.readiness_threshold {
        ReadinessStatus::Met
    } else if value >= config.readiness_threshold - config.close_margin {
        ReadinessStatus::Close
    } else {
        ReadinessStatus::Unmet
    }
}

/// Derive a state from an aggregate and the averages of its prerequisites.
///
/// `gated` is false for independent domains and for domains with no
/// `requires` prerequisites; those are never locked or blocked.
fn classify(aggregate: &Aggregate, gated: bool, prerequisite_avgs: &[f64], config: &HealthConfig) -> HealthState {
    let prerequisites_ready = prerequisite_avgs
        .iter()
        .all(|avg| *avg >= config.readiness_threshold);

    if aggregate.assessed == 0 {
        return match (gated, prerequisites_ready) {
            (false, _) => HealthState::NeedsWork,
            (true, true) => HealthState::Blocked,
            (true, false) => HealthState::Locked,
        };
    }
    if gated && !prerequisites_ready {
        return HealthState::Blocked;
    }
    if aggregate.avg >= config.mastered_min {
        HealthState::Mastered
    } else if aggregate.avg >= config.developing_min {
        HealthState::Developing
    } else {
        HealthState::NeedsWork
    }
}

/// Raw averages for every domain, used for prerequisite gating.
fn domain_aggregates<L: SkillLevels + ?Sized>(catalog: &Catalog, levels: &L) -> BTreeMap<DomainId, Aggregate> {
    catalog
        .domains()
        .iter()
        .map(|d| (d.id.clone(), Aggregate::over(catalog.domain_skills(&d.id), levels)))
        .collect()
}

fn prerequisite_avgs(graph: &DependencyGraph, aggregates: &BTreeMap<DomainId, Aggregate>, id: &DomainId) -> Vec<f64> {
    graph
        .prerequisites(id)
        .iter()
        .map(|p| aggregates.get(p).map(|a| a.avg).unwrap_or(0.0))
        .collect()
}

/// Compute health for every domain in the catalog.
///
/// Skills present in `levels` but unknown to the catalog are ignored.
pub fn compute_domain_health<L: SkillLevels + ?Sized>(
    catalog: &Catalog,
    graph: &DependencyGraph,
    config: &HealthConfig,
    levels: &L,
) -> BTreeMap<DomainId, DomainHealth> {
    let aggregates = domain_aggregates(catalog, levels);

    catalog
        .domains()
        .iter()
        .map(|domain| {
            let aggregate = aggregates[&domain.id];
            let prereqs = prerequisite_avgs(graph, &aggregates, &domain.id);
            let gated = !domain.independent && !prereqs.is_empty();
            let state = classify(&aggregate, gated, &prereqs, config);
            (domain.id.clone(), aggregate.into_health(state))
        })
        .collect()
}

/// Compute health for each sub-area of one domain.
///
/// Returns an empty list for an unknown domain. Sub-areas inherit the parent
/// domain's prerequisite gating. With `include_prerequisites`, each entry
/// also reports readiness of gating skills from other domains.
pub fn sub_area_health<L: SkillLevels + ?Sized>(
    catalog: &Catalog,
    graph: &DependencyGraph,
    config: &HealthConfig,
    levels: &L,
    domain_id: &DomainId,
    include_prerequisites: bool,
) -> Vec<SubAreaHealth> {
    let Some(domain) = catalog.domain(domain_id) else {
        tracing::debug!(domain = %domain_id, "sub-area health requested for unknown domain");
        return Vec::new();
    };

    let aggregates = domain_aggregates(catalog, levels);
    let prereqs = prerequisite_avgs(graph, &aggregates, domain_id);
    let gated = !domain.independent && !prereqs.is_empty();

    domain
        .sub_areas
        .iter()
        .map(|sub_area| {
            let records: Vec<&SkillRecord> = sub_area
                .skills()
                .filter_map(|s| catalog.skill(&s.id))
                .collect();
            let aggregate = Aggregate::over(records.iter().copied(), levels);
            let state = classify(&aggregate, gated, &prereqs, config);

            SubAreaHealth {
                sub_area_id: sub_area.id.clone(),
                name: sub_area.name.clone(),
                health: aggregate.into_health(state),
                tiers: tier_breakdown(&records, levels, config),
                prerequisites: include_prerequisites
                    .then(|| gating_readiness(catalog, config, levels, domain_id, sub_area)),
            }
        })
        .collect()
}

fn tier_breakdown<L: SkillLevels + ?Sized>(records: &[&SkillRecord], levels: &L, config: &HealthConfig) -> Vec<TierCount> {
    let met_level = f64::from(config.met_level);
    (MIN_TIER..=MAX_TIER)
        .map(|tier| {
            let in_tier = records.iter().filter(|r| r.tier == tier);
            let (met, total) = in_tier.fold((0, 0), |(met, total), r| {
                let is_met = levels.level(&r.id).is_some_and(|l| l >= met_level);
                (met + usize::from(is_met), total + 1)
            });
            TierCount { tier, met, total }
        })
        .collect()
}

fn gating_readiness<L: SkillLevels + ?Sized>(
    catalog: &Catalog,
    config: &HealthConfig,
    levels: &L,
    domain_id: &DomainId,
    sub_area: &SubArea,
) -> Vec<SkillPrerequisiteReadiness> {
    let mut out = Vec::new();
    for skill in sub_area.skills() {
        for prerequisite in &skill.prerequisites {
            let Some(record) = catalog.skill(prerequisite) else {
                continue;
            };
            if &record.domain_id == domain_id {
                continue;
            }
            let current_level = levels.level(prerequisite);
            out.push(SkillPrerequisiteReadiness {
                skill_id: skill.id.clone(),
                prerequisite_id: prerequisite.clone(),
                prerequisite_domain: record.domain_id.clone(),
                current_level,
                status: current_level
                    .map(|l| readiness(l, config))
                    .unwrap_or(ReadinessStatus::Unmet),
            });
        }
    }
    out
}
