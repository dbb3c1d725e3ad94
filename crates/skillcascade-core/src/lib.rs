//! Cascade dependency engine for SkillCascade.
//!
//! This crate turns a framework catalog and per-skill ratings into domain
//! health, a prerequisite graph, what-if cascade projections, leverage
//! rankings, structural risks and prerequisite chains. It depends only on
//! `skillcascade-types` and performs no I/O; file loading and hashing
//! adapters live in `skillcascade-infra`.

pub mod cache;
pub mod cascade;
pub mod catalog;
pub mod engine;
pub mod graph;
pub mod hash;
pub mod health;
pub mod leverage;
pub mod prereq;
pub mod risk;

pub use engine::CascadeEngine;

#[cfg(test)]
mod testing;
