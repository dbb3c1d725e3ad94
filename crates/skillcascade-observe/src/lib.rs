//! Observability setup for SkillCascade binaries.

pub mod tracing_setup;
