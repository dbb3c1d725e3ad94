//! Ranking, risk, prerequisite-path and skill-bottleneck result types.

use serde::{Deserialize, Serialize};

use std::collections::BTreeSet;
use std::fmt;

use crate::catalog::{DomainId, SkillId};
use crate::health::ReadinessStatus;

/// Leverage of intervening in one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRanking {
    pub domain_id: DomainId,
    pub leverage_score: f64,
    pub downstream_domains: usize,
    pub downstream_skills: usize,
}

/// Category of structural risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskKind {
    /// A dependent domain outscores a domain it requires.
    Inversion,
    /// A domain average dropped relative to a baseline snapshot.
    Regression,
    /// A weak domain gating a large share of downstream skills.
    Bottleneck,
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskKind::Inversion => write!(f, "inversion"),
            RiskKind::Regression => write!(f, "regression"),
            RiskKind::Bottleneck => write!(f, "bottleneck"),
        }
    }
}

/// A detected structural risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub kind: RiskKind,
    /// Always strictly positive; higher is worse.
    pub severity: f64,
    pub affected_domains: BTreeSet<DomainId>,
    /// Most actionable intervention target.
    pub action_domain_id: DomainId,
    pub description: String,
}

/// One step of a prerequisite chain with its readiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub domain_id: DomainId,
    pub avg: f64,
    pub assessed: usize,
    /// `None` for the terminal (target) step.
    pub status: Option<ReadinessStatus>,
}

/// A skill that gates many higher-tier skills but is not yet acquired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBottleneck {
    pub skill_id: SkillId,
    pub name: String,
    pub domain_id: DomainId,
    pub sub_area_id: String,
    pub skill_group_id: String,
    pub tier: u8,
    /// `None` when not assessed.
    pub current_level: Option<u8>,
    pub blocked_count: usize,
}
