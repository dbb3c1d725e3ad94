//! Derived health types.
//!
//! Everything here is recomputed on every call from an assessment and the
//! catalog; none of it is persisted.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::catalog::{DomainId, SkillId};

/// Mastery state of a domain or sub-area, ordered from least to most ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthState {
    /// No data, and at least one prerequisite is not ready.
    Locked,
    /// Prerequisites not ready, or ready but this area has no data yet.
    Blocked,
    NeedsWork,
    Developing,
    Mastered,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthState::Locked => write!(f, "locked"),
            HealthState::Blocked => write!(f, "blocked"),
            HealthState::NeedsWork => write!(f, "needs-work"),
            HealthState::Developing => write!(f, "developing"),
            HealthState::Mastered => write!(f, "mastered"),
        }
    }
}

impl FromStr for HealthState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "locked" => Ok(HealthState::Locked),
            "blocked" => Ok(HealthState::Blocked),
            "needs-work" | "needs_work" => Ok(HealthState::NeedsWork),
            "developing" => Ok(HealthState::Developing),
            "mastered" => Ok(HealthState::Mastered),
            other => Err(format!("invalid health state: '{other}'")),
        }
    }
}

/// Aggregated health of a domain (or of a sub-area, see [`SubAreaHealth`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainHealth {
    /// Mean of assessed skill levels, 0 when nothing is assessed.
    pub avg: f64,
    pub assessed: usize,
    pub total: usize,
    /// `assessed / total` in `[0, 1]`.
    pub health_pct: f64,
    pub state: HealthState,
}

impl DomainHealth {
    pub fn is_assessed(&self) -> bool {
        self.assessed > 0
    }
}

/// Readiness of a prerequisite relative to the readiness threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessStatus {
    Unmet,
    Close,
    Met,
}

impl fmt::Display for ReadinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessStatus::Unmet => write!(f, "unmet"),
            ReadinessStatus::Close => write!(f, "close"),
            ReadinessStatus::Met => write!(f, "met"),
        }
    }
}

/// Met/total counts for one skill tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCount {
    pub tier: u8,
    pub met: usize,
    pub total: usize,
}

/// Readiness of one cross-domain gating skill feeding a sub-area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillPrerequisiteReadiness {
    /// Skill inside the sub-area that is gated.
    pub skill_id: SkillId,
    /// Gating skill in another domain.
    pub prerequisite_id: SkillId,
    pub prerequisite_domain: DomainId,
    /// `None` when the gating skill is not assessed.
    pub current_level: Option<f64>,
    pub status: ReadinessStatus,
}

/// Health of a single sub-area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAreaHealth {
    pub sub_area_id: String,
    pub name: String,
    pub health: DomainHealth,
    /// One entry per tier 1-5, in tier order.
    pub tiers: Vec<TierCount>,
    /// Present only when prerequisite readiness was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<SkillPrerequisiteReadiness>>,
}
