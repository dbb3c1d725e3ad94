//! Validated framework catalog.
//!
//! `Catalog::new` checks every static invariant of the catalog once, at load
//! time, so that per-call computation never has to handle malformed
//! structure: every domain has at least one skill, ids are unique, tiers are
//! in range, and every edge and prerequisite points at something that exists.
//! Acyclicity of `requires` edges is checked by the dependency graph builder.

use std::collections::{HashMap, HashSet};

use skillcascade_types::catalog::{
    DependencyEdge, Domain, DomainId, EdgeKind, FrameworkCatalog, MAX_TIER, MIN_TIER, SkillId,
};
use skillcascade_types::error::CatalogError;

/// A skill together with its position in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillRecord {
    pub id: SkillId,
    pub name: String,
    pub domain_id: DomainId,
    pub sub_area_id: String,
    pub skill_group_id: String,
    pub tier: u8,
    pub prerequisites: Vec<SkillId>,
}

/// Immutable, validated view of a [`FrameworkCatalog`].
#[derive(Debug, Clone)]
pub struct Catalog {
    domains: Vec<Domain>,
    edges: Vec<DependencyEdge>,
    domain_index: HashMap<DomainId, usize>,
    skills: Vec<SkillRecord>,
    skill_index: HashMap<SkillId, usize>,
    skill_counts: HashMap<DomainId, usize>,
}

impl Catalog {
    /// Validate and index a catalog.
    pub fn new(source: FrameworkCatalog) -> Result<Self, CatalogError> {
        let FrameworkCatalog { domains, edges } = source;

        if domains.is_empty() {
            return Err(CatalogError::NoDomains);
        }

        let mut domain_index = HashMap::new();
        let mut skills = Vec::new();
        let mut skill_index = HashMap::new();
        let mut skill_counts = HashMap::new();

        for (i, domain) in domains.iter().enumerate() {
            if domain_index.insert(domain.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateDomain(domain.id.to_string()));
            }

            let mut count = 0;
            for sub_area in &domain.sub_areas {
                for group in &sub_area.skill_groups {
                    for skill in &group.skills {
                        if !(MIN_TIER..=MAX_TIER).contains(&skill.tier) {
                            return Err(CatalogError::InvalidTier {
                                skill: skill.id.to_string(),
                                tier: skill.tier,
                            });
                        }
                        if skill_index.insert(skill.id.clone(), skills.len()).is_some() {
                            return Err(CatalogError::DuplicateSkill(skill.id.to_string()));
                        }
                        skills.push(SkillRecord {
                            id: skill.id.clone(),
                            name: skill.name.clone(),
                            domain_id: domain.id.clone(),
                            sub_area_id: sub_area.id.clone(),
                            skill_group_id: group.id.clone(),
                            tier: skill.tier,
                            prerequisites: skill.prerequisites.clone(),
                        });
                        count += 1;
                    }
                }
            }

            if count == 0 {
                return Err(CatalogError::EmptyDomain(domain.id.to_string()));
            }
            skill_counts.insert(domain.id.clone(), count);
        }

        for record in &skills {
            if let Some(missing) = record
                .prerequisites
                .iter()
                .find(|p| !skill_index.contains_key(*p))
            {
                return Err(CatalogError::UnknownPrerequisite {
                    skill: record.id.to_string(),
                    prerequisite: missing.to_string(),
                });
            }
        }

        let independent: HashSet<&DomainId> = domains
            .iter()
            .filter(|d| d.independent)
            .map(|d| &d.id)
            .collect();

        for edge in &edges {
            for endpoint in [&edge.from, &edge.to] {
                if !domain_index.contains_key(endpoint) {
                    return Err(CatalogError::UnknownEdgeDomain {
                        from: edge.from.to_string(),
                        to: edge.to.to_string(),
                        missing: endpoint.to_string(),
                    });
                }
            }
            if edge.from == edge.to {
                return Err(CatalogError::SelfEdge(edge.from.to_string()));
            }
            if edge.kind == EdgeKind::Requires && independent.contains(&edge.to) {
                return Err(CatalogError::IndependentHasPrerequisite(edge.to.to_string()));
            }
        }

        Ok(Self {
            domains,
            edges,
            domain_index,
            skills,
            skill_index,
            skill_counts,
        })
    }

    /// Domains in catalog order.
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn domain(&self, id: &DomainId) -> Option<&Domain> {
        self.domain_index.get(id).map(|&i| &self.domains[i])
    }

    pub fn contains_domain(&self, id: &DomainId) -> bool {
        self.domain_index.contains_key(id)
    }

    /// Dependency edges in catalog order.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// All skills in catalog order.
    pub fn skills(&self) -> &[SkillRecord] {
        &self.skills
    }

    pub fn skill(&self, id: &SkillId) -> Option<&SkillRecord> {
        self.skill_index.get(id).map(|&i| &self.skills[i])
    }

    /// Number of skills in a domain, 0 for an unknown domain.
    pub fn skill_count(&self, id: &DomainId) -> usize {
        self.skill_counts.get(id).copied().unwrap_or(0)
    }

    /// Skills belonging to one domain, in catalog order.
    pub fn domain_skills<'a>(&'a self, id: &'a DomainId) -> impl Iterator<Item = &'a SkillRecord> {
        self.skills.iter().filter(move |s| &s.domain_id == id)
    }

    /// Layout row of a domain, `u8::MAX` for an unknown domain.
    pub fn tier_position(&self, id: &DomainId) -> u8 {
        self.domain(id).map(|d| d.tier_position).unwrap_or(u8::MAX)
    }
}
