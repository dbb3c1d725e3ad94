//! Engine configuration types.
//!
//! `EngineConfig` holds every tunable threshold and weight used by the
//! cascade engine. Loaded from `config.toml`; every field has a default so an
//! empty file (or no file) yields the standard behavior.

use serde::{Deserialize, Serialize};

use crate::assessment::SnapshotId;
use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cascade: CascadeConfig,
    #[serde(default)]
    pub leverage: LeverageConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub bottleneck: BottleneckConfig,
}

impl EngineConfig {
    /// Reject values that would break the engine's ordering guarantees.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let h = &self.health;
        for (field, value) in [
            ("health.readiness_threshold", h.readiness_threshold),
            ("health.close_margin", h.close_margin),
            ("health.developing_min", h.developing_min),
            ("health.mastered_min", h.mastered_min),
            ("health.weak_edge_below", h.weak_edge_below),
            ("risk.regression_threshold", self.risk.regression_threshold),
        ] {
            if !(0.0..=3.0).contains(&value) {
                return Err(ConfigError::OutOfRatingRange { field, value });
            }
        }
        if h.developing_min > h.mastered_min {
            return Err(ConfigError::InvertedBoundaries {
                developing: h.developing_min,
                mastered: h.mastered_min,
            });
        }

        let c = &self.cascade;
        for (field, value) in [
            ("cascade.requires_weight", c.requires_weight),
            ("cascade.supports_weight", c.supports_weight),
            ("cascade.hop_decay", c.hop_decay),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::OutOfUnitRange { field, value });
            }
        }
        if c.requires_weight <= c.supports_weight {
            return Err(ConfigError::WeightOrdering {
                requires: c.requires_weight,
                supports: c.supports_weight,
            });
        }
        if !(self.leverage.skill_weight >= 0.0 && self.leverage.skill_weight <= 1.0) {
            return Err(ConfigError::OutOfUnitRange {
                field: "leverage.skill_weight",
                value: self.leverage.skill_weight,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Thresholds for health state classification and readiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Prerequisite average at or above which a dependent domain is unblocked.
    #[serde(default = "default_readiness_threshold")]
    pub readiness_threshold: f64,

    /// Distance below the readiness threshold still reported as "close".
    #[serde(default = "default_close_margin")]
    pub close_margin: f64,

    /// Lowest average classified as developing.
    #[serde(default = "default_developing_min")]
    pub developing_min: f64,

    /// Lowest average classified as mastered.
    #[serde(default = "default_mastered_min")]
    pub mastered_min: f64,

    /// Source average below which an edge is drawn as weak.
    #[serde(default = "default_weak_edge_below")]
    pub weak_edge_below: f64,

    /// Rating at which a skill counts as met in tier breakdowns.
    #[serde(default = "default_met_level")]
    pub met_level: u8,
}

fn default_readiness_threshold() -> f64 {
    1.5
}

fn default_close_margin() -> f64 {
    0.5
}

fn default_developing_min() -> f64 {
    1.5
}

fn default_mastered_min() -> f64 {
    2.5
}

fn default_weak_edge_below() -> f64 {
    2.0
}

fn default_met_level() -> u8 {
    2
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            readiness_threshold: default_readiness_threshold(),
            close_margin: default_close_margin(),
            developing_min: default_developing_min(),
            mastered_min: default_mastered_min(),
            weak_edge_below: default_weak_edge_below(),
            met_level: default_met_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

/// Propagation weights. Path strength is the product of edge weights along
/// the path, multiplied by `hop_decay` for every hop after the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfig {
    #[serde(default = "default_requires_weight")]
    pub requires_weight: f64,

    #[serde(default = "default_supports_weight")]
    pub supports_weight: f64,

    #[serde(default = "default_hop_decay")]
    pub hop_decay: f64,
}

fn default_requires_weight() -> f64 {
    0.6
}

fn default_supports_weight() -> f64 {
    0.25
}

fn default_hop_decay() -> f64 {
    0.7
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            requires_weight: default_requires_weight(),
            supports_weight: default_supports_weight(),
            hop_decay: default_hop_decay(),
        }
    }
}

// ---------------------------------------------------------------------------
// Leverage
// ---------------------------------------------------------------------------

/// Leverage score weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageConfig {
    /// Contribution of each downstream skill relative to a downstream domain.
    #[serde(default = "default_skill_weight")]
    pub skill_weight: f64,
}

fn default_skill_weight() -> f64 {
    0.1
}

impl Default for LeverageConfig {
    fn default() -> Self {
        Self {
            skill_weight: default_skill_weight(),
        }
    }
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

/// Which snapshot regression detection compares against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegressionBaseline {
    #[default]
    Earliest,
    Latest,
    Snapshot(SnapshotId),
}

/// Risk detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Minimum average drop reported as a regression.
    #[serde(default = "default_regression_threshold")]
    pub regression_threshold: f64,

    #[serde(default)]
    pub regression_baseline: RegressionBaseline,

    /// Maximum number of bottleneck risks reported.
    #[serde(default = "default_bottleneck_limit")]
    pub bottleneck_limit: usize,
}

fn default_regression_threshold() -> f64 {
    0.3
}

fn default_bottleneck_limit() -> usize {
    3
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            regression_threshold: default_regression_threshold(),
            regression_baseline: RegressionBaseline::default(),
            bottleneck_limit: default_bottleneck_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Skill bottlenecks
// ---------------------------------------------------------------------------

/// Container within which a lower-tier skill gates higher-tier skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckScope {
    #[default]
    SkillGroup,
    SubArea,
}

/// Skill bottleneck finder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckConfig {
    #[serde(default)]
    pub scope: BottleneckScope,

    /// Skills rated below this level are candidates.
    #[serde(default = "default_acquired_level")]
    pub acquired_level: u8,
}

fn default_acquired_level() -> u8 {
    2
}

impl Default for BottleneckConfig {
    fn default() -> Self {
        Self {
            scope: BottleneckScope::default(),
            acquired_level: default_acquired_level(),
        }
    }
}
