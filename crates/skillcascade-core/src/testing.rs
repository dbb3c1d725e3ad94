//! Shared test fixtures.

use std::collections::BTreeMap;

use skillcascade_types::assessment::Assessment;
use skillcascade_types::catalog::{
    DependencyEdge, Domain, DomainId, FrameworkCatalog, Skill, SkillGroup, SkillId, SubArea,
};
use skillcascade_types::config::EngineConfig;

use crate::catalog::Catalog;
use crate::engine::CascadeEngine;
use crate::graph::DependencyGraph;

/// A domain with one sub-area (`<id>.a`) and one skill group (`<id>.a.g`).
pub fn domain(id: &str, tier_position: u8, independent: bool, skills: &[(&str, u8)]) -> Domain {
    Domain {
        id: DomainId::from(id),
        name: format!("Domain {id}"),
        tier_position,
        independent,
        sub_areas: vec![SubArea {
            id: format!("{id}.a"),
            name: format!("{id} area"),
            skill_groups: vec![SkillGroup {
                id: format!("{id}.a.g"),
                name: format!("{id} group"),
                skills: skills
                    .iter()
                    .map(|(skill_id, tier)| Skill {
                        id: SkillId::from(*skill_id),
                        name: format!("Skill {skill_id}"),
                        tier: *tier,
                        prerequisites: vec![],
                    })
                    .collect(),
            }],
        }],
    }
}

/// Nine domains `d1`..`d9`, three skills each (`dN.s1`..`dN.s3`, tiers 1-3).
/// `d8` and `d9` are independent. Tier positions follow `(n + 1) / 2`.
pub fn nine_domain_catalog(edges: Vec<DependencyEdge>) -> FrameworkCatalog {
    let domains = (1..=9u8)
        .map(|n| {
            let id = format!("d{n}");
            let s1 = format!("{id}.s1");
            let s2 = format!("{id}.s2");
            let s3 = format!("{id}.s3");
            domain(
                &id,
                n.div_ceil(2),
                n >= 8,
                &[(s1.as_str(), 1), (s2.as_str(), 2), (s3.as_str(), 3)],
            )
        })
        .collect();
    FrameworkCatalog { domains, edges }
}

/// Build a validated catalog and graph from edges over the nine-domain layout.
pub fn nine_domain_graph(edges: Vec<DependencyEdge>) -> (Catalog, DependencyGraph) {
    let catalog = Catalog::new(nine_domain_catalog(edges)).unwrap();
    let graph = DependencyGraph::build(&catalog).unwrap();
    (catalog, graph)
}

/// Engine over the nine-domain layout with default configuration.
pub fn nine_domain_engine(edges: Vec<DependencyEdge>) -> CascadeEngine {
    CascadeEngine::new(nine_domain_catalog(edges), EngineConfig::default()).unwrap()
}

/// Rate every skill of a nine-domain fixture domain with the same value.
pub fn rate_domain(assessment: &mut Assessment, domain: &str, rating: u8) {
    for i in 1..=3 {
        assessment.rate(format!("{domain}.s{i}").as_str(), rating).unwrap();
    }
}

/// Rate the three skills of a fixture domain individually.
pub fn rate_skills(assessment: &mut Assessment, domain: &str, ratings: [u8; 3]) {
    for (i, rating) in ratings.into_iter().enumerate() {
        assessment
            .rate(format!("{domain}.s{}", i + 1).as_str(), rating)
            .unwrap();
    }
}

pub fn overrides(entries: &[(&str, f64)]) -> BTreeMap<DomainId, f64> {
    entries
        .iter()
        .map(|(id, target)| (DomainId::from(*id), *target))
        .collect()
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
