//! Assessment and snapshot types.
//!
//! An `Assessment` maps skill ids to integer ratings 0-3; an absent key means
//! the skill was not assessed. `Snapshot`s are immutable historical copies.
//! `SimulatedAssessment` is the fractional copy produced by what-if
//! simulation, never written back to the caller's data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::catalog::SkillId;
use crate::error::AssessmentError;

/// Highest rating a skill can receive.
pub const MAX_RATING: u8 = 3;

/// Read access to per-skill levels, shared by real and simulated assessments.
pub trait SkillLevels {
    /// Level of `skill` in `[0, 3]`, or `None` when not assessed.
    fn level(&self, skill: &SkillId) -> Option<f64>;
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Current ratings for one individual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<SkillId, u8>", into = "BTreeMap<SkillId, u8>")]
pub struct Assessment {
    ratings: BTreeMap<SkillId, u8>,
}

impl Assessment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rating, replacing any previous one.
    pub fn rate(&mut self, skill: impl Into<SkillId>, rating: u8) -> Result<(), AssessmentError> {
        let skill = skill.into();
        if rating > MAX_RATING {
            return Err(AssessmentError::RatingOutOfRange { skill: skill.0, rating });
        }
        self.ratings.insert(skill, rating);
        Ok(())
    }

    /// Builder-style variant of [`Assessment::rate`].
    pub fn with(mut self, skill: impl Into<SkillId>, rating: u8) -> Result<Self, AssessmentError> {
        self.rate(skill, rating)?;
        Ok(self)
    }

    pub fn get(&self, skill: &SkillId) -> Option<u8> {
        self.ratings.get(skill).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Ratings in ascending skill-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&SkillId, u8)> {
        self.ratings.iter().map(|(k, v)| (k, *v))
    }
}

impl SkillLevels for Assessment {
    fn level(&self, skill: &SkillId) -> Option<f64> {
        self.get(skill).map(f64::from)
    }
}

impl TryFrom<BTreeMap<SkillId, u8>> for Assessment {
    type Error = AssessmentError;

    fn try_from(ratings: BTreeMap<SkillId, u8>) -> Result<Self, Self::Error> {
        if let Some((skill, rating)) = ratings.iter().find(|(_, r)| **r > MAX_RATING) {
            return Err(AssessmentError::RatingOutOfRange {
                skill: skill.0.clone(),
                rating: *rating,
            });
        }
        Ok(Self { ratings })
    }
}

impl From<Assessment> for BTreeMap<SkillId, u8> {
    fn from(assessment: Assessment) -> Self {
        assessment.ratings
    }
}

// ---------------------------------------------------------------------------
// Simulated assessment
// ---------------------------------------------------------------------------

/// Fractional skill levels produced by cascade simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulatedAssessment {
    levels: BTreeMap<SkillId, f64>,
}

impl SimulatedAssessment {
    /// Lift integer ratings into a simulated copy without changing any value.
    pub fn from_assessment(assessment: &Assessment) -> Self {
        Self {
            levels: assessment
                .iter()
                .map(|(k, v)| (k.clone(), f64::from(v)))
                .collect(),
        }
    }

    /// Set a level, clamped to `[0, 3]`.
    pub fn set(&mut self, skill: SkillId, level: f64) {
        self.levels
            .insert(skill, level.clamp(0.0, f64::from(MAX_RATING)));
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillId, f64)> {
        self.levels.iter().map(|(k, v)| (k, *v))
    }
}

impl SkillLevels for SimulatedAssessment {
    fn level(&self, skill: &SkillId) -> Option<f64> {
        self.levels.get(skill).copied()
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Unique identifier for a snapshot, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SnapshotId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Immutable historical record of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub timestamp: DateTime<Utc>,
    pub label: String,
    pub assessment: Assessment,
}

impl Snapshot {
    pub fn new(label: impl Into<String>, timestamp: DateTime<Utc>, assessment: Assessment) -> Self {
        Self {
            id: SnapshotId::new(),
            timestamp,
            label: label.into(),
            assessment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rejects_out_of_range() {
        let mut a = Assessment::new();
        let err = a.rate("s1", 4).unwrap_err();
        assert_eq!(err.to_string(), "rating 4 for skill 's1' is outside 0-3");
        assert!(a.is_empty());
    }

    #[test]
    fn test_deserialize_validates_ratings() {
        let ok: Assessment = serde_json::from_str(r#"{"s1": 3, "s2": 0}"#).unwrap();
        assert_eq!(ok.get(&SkillId::from("s1")), Some(3));
        assert_eq!(ok.len(), 2);

        let bad = serde_json::from_str::<Assessment>(r#"{"s1": 7}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_simulated_copy_preserves_levels() {
        let a = Assessment::new().with("s1", 1).unwrap().with("s2", 3).unwrap();
        let sim = SimulatedAssessment::from_assessment(&a);
        assert_eq!(sim.level(&SkillId::from("s1")), Some(1.0));
        assert_eq!(sim.level(&SkillId::from("s2")), Some(3.0));
        assert_eq!(sim.level(&SkillId::from("s3")), None);
    }

    #[test]
    fn test_simulated_set_clamps() {
        let mut sim = SimulatedAssessment::default();
        sim.set(SkillId::from("s1"), 4.2);
        sim.set(SkillId::from("s2"), -1.0);
        assert_eq!(sim.level(&SkillId::from("s1")), Some(3.0));
        assert_eq!(sim.level(&SkillId::from("s2")), Some(0.0));
    }
}
