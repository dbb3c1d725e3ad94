//! Prerequisite chains, path readiness and skill-level bottlenecks.

use std::collections::{BTreeMap, HashMap};

use skillcascade_types::assessment::Assessment;
use skillcascade_types::catalog::DomainId;
use skillcascade_types::config::{BottleneckConfig, BottleneckScope, HealthConfig};
use skillcascade_types::health::DomainHealth;
use skillcascade_types::insight::{PathStep, SkillBottleneck};

use crate::catalog::{Catalog, SkillRecord};
use crate::graph::DependencyGraph;
use crate::health::readiness;

/// Ordered chain of `requires` ancestors ending with `domain`.
///
/// Ancestors appear in topological order, so the first element never has a
/// prerequisite of its own. Returns an empty chain for an unknown domain.
pub fn find_prerequisite_chain(graph: &DependencyGraph, domain: &DomainId) -> Vec<DomainId> {
    if !graph.contains(domain) {
        return Vec::new();
    }
    let ancestors = graph.requires_ancestors(domain);
    graph
        .topological_order()
        .iter()
        .filter(|id| ancestors.contains(*id) || *id == domain)
        .cloned()
        .collect()
}

/// Annotate each step of a chain with its health and readiness.
///
/// The terminal step is the goal, not a gate, and carries no status.
pub fn compute_path_readiness(
    chain: &[DomainId],
    health: &BTreeMap<DomainId, DomainHealth>,
    config: &HealthConfig,
) -> Vec<PathStep> {
    let last = chain.len().saturating_sub(1);
    chain
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let (avg, assessed) = health.get(id).map(|h| (h.avg, h.assessed)).unwrap_or((0.0, 0));
            PathStep {
                domain_id: id.clone(),
                avg,
                assessed,
                status: (i < last).then(|| readiness(avg, config)),
            }
        })
        .collect()
}

/// Container key a skill's tier ordering applies within.
fn scope_key<'a>(skill: &'a SkillRecord, scope: BottleneckScope) -> (&'a DomainId, &'a str, &'a str) {
    match scope {
        BottleneckScope::SkillGroup => (&skill.domain_id, &skill.sub_area_id, &skill.skill_group_id),
        BottleneckScope::SubArea => (&skill.domain_id, &skill.sub_area_id, ""),
    }
}

/// Rank not-yet-acquired skills by how many higher-tier skills they gate.
///
/// A skill gates every skill of strictly higher tier in the same container.
/// The container is the skill group by default, since tiers order skills
/// within a group; `BottleneckScope::SubArea` widens it to the whole
/// sub-area. Unassessed skills count as level 0.
///
/// Only skills below `config.acquired_level` that gate at least one skill
/// are candidates. A top-tier skill blocks nothing and is never reported, so
/// the result may be shorter than `limit` even when more skills are weak.
pub fn find_skill_bottlenecks(
    catalog: &Catalog,
    config: &BottleneckConfig,
    assessment: &Assessment,
    limit: usize,
) -> Vec<SkillBottleneck> {
    let mut tiers: HashMap<(&DomainId, &str, &str), Vec<u8>> = HashMap::new();
    for skill in catalog.skills() {
        tiers.entry(scope_key(skill, config.scope)).or_default().push(skill.tier);
    }

    let mut bottlenecks: Vec<SkillBottleneck> = catalog
        .skills()
        .iter()
        .filter_map(|skill| {
            let current_level = assessment.get(&skill.id);
            if current_level.unwrap_or(0) >= config.acquired_level {
                return None;
            }
            let blocked_count = tiers
                .get(&scope_key(skill, config.scope))
                .map(|t| t.iter().filter(|&&tier| tier > skill.tier).count())
                .unwrap_or(0);
            (blocked_count > 0).then(|| SkillBottleneck {
                skill_id: skill.id.clone(),
                name: skill.name.clone(),
                domain_id: skill.domain_id.clone(),
                sub_area_id: skill.sub_area_id.clone(),
                skill_group_id: skill.skill_group_id.clone(),
                tier: skill.tier,
                current_level,
                blocked_count,
            })
        })
        .collect();

    bottlenecks.sort_by(|a, b| {
        b.blocked_count
            .cmp(&a.blocked_count)
            .then_with(|| a.current_level.unwrap_or(0).cmp(&b.current_level.unwrap_or(0)))
            .then_with(|| a.tier.cmp(&b.tier))
            .then_with(|| a.skill_id.cmp(&b.skill_id))
    });
    bottlenecks.truncate(limit);
    bottlenecks
}
