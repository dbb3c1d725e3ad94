//! Framework catalog types.
//!
//! The catalog is the static hierarchy Domain -> SubArea -> SkillGroup -> Skill
//! plus the list of directed dependency edges between domains. It is supplied
//! by an external content source and validated once by `skillcascade-core`.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a top-level domain (`d1`..`d9` in the standard framework).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainId(pub String);

impl DomainId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DomainId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl FromStr for DomainId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("domain id must not be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Identifier of an individual skill, the unit of assessment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

/// Lowest skill tier (most concrete).
pub const MIN_TIER: u8 = 1;

/// Highest skill tier (most abstract).
pub const MAX_TIER: u8 = 5;

/// A single assessable skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    /// Developmental depth within the skill group, 1 (concrete) to 5 (abstract).
    pub tier: u8,
    /// Skills in other domains that gate this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<SkillId>,
}

/// An ordered group of skills sharing one tier progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub id: String,
    pub name: String,
    pub skills: Vec<Skill>,
}

/// An ordered container of skill groups inside a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubArea {
    pub id: String,
    pub name: String,
    pub skill_groups: Vec<SkillGroup>,
}

impl SubArea {
    /// Iterate every skill in the sub-area in catalog order.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skill_groups.iter().flat_map(|g| g.skills.iter())
    }
}

/// A top-level developmental domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
    /// Layout row; lower values are more foundational.
    pub tier_position: u8,
    /// Independent domains carry no inbound prerequisite requirement.
    #[serde(default)]
    pub independent: bool,
    pub sub_areas: Vec<SubArea>,
}

impl Domain {
    /// Iterate every skill in the domain in catalog order.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.sub_areas.iter().flat_map(|sa| sa.skills())
    }

    /// Number of skills defined for this domain.
    pub fn skill_count(&self) -> usize {
        self.skills().count()
    }
}

// ---------------------------------------------------------------------------
// Dependency edges
// ---------------------------------------------------------------------------

/// Kind of influence one domain has on another.
///
/// - `Requires`: strong, gating, must form an acyclic subgraph.
/// - `Supports`: weaker, non-gating influence overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Requires,
    Supports,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Requires => write!(f, "requires"),
            EdgeKind::Supports => write!(f, "supports"),
        }
    }
}

impl FromStr for EdgeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "requires" => Ok(EdgeKind::Requires),
            "supports" => Ok(EdgeKind::Supports),
            other => Err(format!("invalid edge kind: '{other}'")),
        }
    }
}

/// Directed edge between two domains. `from` is the upstream domain whose
/// mastery feeds `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: DomainId,
    pub to: DomainId,
    pub kind: EdgeKind,
}

impl DependencyEdge {
    pub fn requires(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: DomainId(from.into()),
            to: DomainId(to.into()),
            kind: EdgeKind::Requires,
        }
    }

    pub fn supports(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: DomainId(from.into()),
            to: DomainId(to.into()),
            kind: EdgeKind::Supports,
        }
    }
}

/// The full framework catalog as supplied by the content source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameworkCatalog {
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
}
