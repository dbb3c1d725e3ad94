//! Application state shared by every command.
//!
//! Loads the catalog, assessment, snapshot history and config named on the
//! command line, and builds the engine once.

use std::path::Path;

use anyhow::{Context, Result};

use skillcascade_core::CascadeEngine;
use skillcascade_core::cache::HealthCache;
use skillcascade_infra::config::load_engine_config;
use skillcascade_infra::hash::Sha256ContentHasher;
use skillcascade_infra::loader::{load_assessment, load_catalog, load_snapshots};
use skillcascade_types::assessment::{Assessment, Snapshot};

use crate::cli::Cli;

pub struct AppState {
    pub engine: CascadeEngine,
    pub assessment: Assessment,
    pub snapshots: Vec<Snapshot>,
    pub cache: HealthCache<Sha256ContentHasher>,
}

impl AppState {
    /// Load every input named by the CLI flags and build the engine.
    ///
    /// The catalog is required. A missing assessment means nothing is rated
    /// yet; a missing history means no regression baseline.
    pub fn init(cli: &Cli) -> Result<Self> {
        let catalog_path = cli
            .catalog
            .as_deref()
            .context("no catalog given (use --catalog or SKC_CATALOG)")?;

        let config = load_engine_config(cli.config.as_deref()).context("failed to load engine config")?;
        let catalog = load_catalog(catalog_path)?;
        let engine = CascadeEngine::new(catalog, config)
            .with_context(|| format!("failed to build engine from {}", catalog_path.display()))?;

        let assessment = match cli.assessment.as_deref() {
            Some(path) => load_assessment(path)?,
            None => Assessment::new(),
        };
        let snapshots = match cli.snapshots.as_deref() {
            Some(path) => load_snapshots(path)?,
            None => Vec::new(),
        };

        warn_unknown_skills(&engine, &assessment, cli.assessment.as_deref());

        Ok(Self {
            engine,
            assessment,
            snapshots,
            cache: HealthCache::new(Sha256ContentHasher::new()),
        })
    }
}

/// Ratings for skills the catalog does not define are ignored by the engine.
fn warn_unknown_skills(engine: &CascadeEngine, assessment: &Assessment, path: Option<&Path>) {
    let unknown = assessment
        .iter()
        .filter(|(skill, _)| engine.catalog().skill(skill).is_none())
        .count();
    if unknown > 0 {
        tracing::warn!(
            unknown,
            path = %path.map(|p| p.display().to_string()).unwrap_or_default(),
            "assessment rates skills missing from the catalog"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "domains": [
            { "id": "d1", "name": "Base", "tier_position": 1, "sub_areas": [
                { "id": "d1.a", "name": "A", "skill_groups": [
                    { "id": "d1.a.g", "name": "G", "skills": [
                        { "id": "d1.s1", "name": "One", "tier": 1 },
                        { "id": "d1.s2", "name": "Two", "tier": 2 }
                    ] }
                ] }
            ] },
            { "id": "d2", "name": "Next", "tier_position": 2, "sub_areas": [
                { "id": "d2.a", "name": "A", "skill_groups": [
                    { "id": "d2.a.g", "name": "G", "skills": [
                        { "id": "d2.s1", "name": "One", "tier": 1 }
                    ] }
                ] }
            ] }
        ],
        "edges": [{ "from": "d1", "to": "d2", "kind": "requires" }]
    }"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["skc"];
        argv.extend_from_slice(args);
        argv.push("health");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_init_loads_all_inputs() {
        let dir = TempDir::new().unwrap();
        let catalog = write(&dir, "catalog.json", CATALOG);
        let assessment = write(&dir, "assessment.json", r#"{ "d1.s1": 3, "d1.s2": 3, "x.s9": 1 }"#);
        let snapshots = write(&dir, "snapshots.json", "[]");
        let config = write(&dir, "config.toml", "[risk]\nbottleneck_limit = 1\n");

        let state = AppState::init(&cli(&[
            "--catalog",
            &catalog,
            "--assessment",
            &assessment,
            "--snapshots",
            &snapshots,
            "--config",
            &config,
        ]))
        .unwrap();

        assert_eq!(state.engine.catalog().domains().len(), 2);
        assert_eq!(state.assessment.len(), 3);
        assert!(state.snapshots.is_empty());
        assert_eq!(state.engine.config().risk.bottleneck_limit, 1);
        assert!(state.cache.is_empty());
    }

    #[test]
    fn test_init_requires_catalog() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "config.toml", "");
        let Err(err) = AppState::init(&cli(&["--config", &config])) else {
            panic!("expected missing catalog error");
        };
        assert!(err.to_string().contains("no catalog given"));
    }

    #[test]
    fn test_init_reports_invalid_catalog() {
        let dir = TempDir::new().unwrap();
        let catalog = write(&dir, "catalog.json", r#"{ "domains": [] }"#);
        let config = write(&dir, "config.toml", "");
        let Err(err) = AppState::init(&cli(&["--catalog", &catalog, "--config", &config])) else {
            panic!("expected invalid catalog error");
        };
        assert!(format!("{err:#}").contains("catalog defines no domains"));
    }
}
