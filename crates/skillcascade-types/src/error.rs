use thiserror::Error;

/// Static configuration errors in the framework catalog.
///
/// These are raised once when the catalog and dependency graph are built,
/// never during per-call computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog defines no domains")]
    NoDomains,

    #[error("domain '{0}' is defined more than once")]
    DuplicateDomain(String),

    #[error("domain '{0}' has no skills")]
    EmptyDomain(String),

    #[error("skill '{0}' is defined more than once")]
    DuplicateSkill(String),

    #[error("skill '{skill}' has tier {tier}, expected 1-5")]
    InvalidTier { skill: String, tier: u8 },

    #[error("skill '{skill}' lists unknown prerequisite '{prerequisite}'")]
    UnknownPrerequisite { skill: String, prerequisite: String },

    #[error("edge {from} -> {to} references unknown domain '{missing}'")]
    UnknownEdgeDomain {
        from: String,
        to: String,
        missing: String,
    },

    #[error("domain '{0}' has an edge to itself")]
    SelfEdge(String),

    #[error("independent domain '{0}' cannot be the target of a requires edge")]
    IndependentHasPrerequisite(String),

    #[error("cycle detected in requires edges involving domain '{0}'")]
    CycleDetected(String),
}

/// Errors raised while building an assessment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("rating {rating} for skill '{skill}' is outside 0-3")]
    RatingOutOfRange { skill: String, rating: u8 },
}

/// Invalid engine configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be within 0-3, got {value}")]
    OutOfRatingRange { field: &'static str, value: f64 },

    #[error("{field} must be within 0-1, got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("developing boundary {developing} must not exceed mastered boundary {mastered}")]
    InvertedBoundaries { developing: f64, mastered: f64 },

    #[error("requires weight {requires} must exceed supports weight {supports}")]
    WeightOrdering { requires: f64, supports: f64 },
}

/// Failure to construct a cascade engine.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
