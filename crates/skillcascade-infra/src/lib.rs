//! Infrastructure layer for SkillCascade.
//!
//! Reads catalogs, assessments, snapshot histories and engine configuration
//! from disk, and provides the SHA-256 implementation of the `ContentHasher`
//! trait defined in `skillcascade-core`.

pub mod config;
pub mod hash;
pub mod loader;
