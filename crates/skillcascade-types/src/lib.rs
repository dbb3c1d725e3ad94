//! Shared domain types for SkillCascade.
//!
//! This crate contains the data model used across the workspace: the
//! framework catalog, assessments and snapshots, derived health and insight
//! types, engine configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod assessment;
pub mod cascade;
pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod health;
pub mod insight;
