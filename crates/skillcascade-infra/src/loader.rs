//! Catalog, assessment and snapshot file loaders.
//!
//! Catalogs may be JSON or TOML, chosen by file extension. Assessments and
//! snapshot histories are JSON. Loaders only deserialize; structural
//! validation of catalogs happens when the engine is built.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use skillcascade_types::assessment::{Assessment, Snapshot};
use skillcascade_types::catalog::FrameworkCatalog;
use skillcascade_types::error::ConfigError;

/// Errors raised while reading input files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported file format for {} (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid configuration in {}: {source}", path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// Supported serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

pub(crate) fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_toml<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, LoadError> {
    toml::from_str(content).map_err(|source| LoadError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a framework catalog from a `.json` or `.toml` file.
pub fn load_catalog(path: &Path) -> Result<FrameworkCatalog, LoadError> {
    let format = Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let content = read(path)?;
    let catalog: FrameworkCatalog = match format {
        Format::Json => parse_json(path, &content)?,
        Format::Toml => parse_toml(path, &content)?,
    };
    tracing::debug!(
        path = %path.display(),
        domains = catalog.domains.len(),
        edges = catalog.edges.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Load an assessment: a JSON object mapping skill ids to ratings 0-3.
pub fn load_assessment(path: &Path) -> Result<Assessment, LoadError> {
    let content = read(path)?;
    let assessment: Assessment = parse_json(path, &content)?;
    tracing::debug!(path = %path.display(), ratings = assessment.len(), "loaded assessment");
    Ok(assessment)
}

/// Load a snapshot history from a JSON array, oldest first.
pub fn load_snapshots(path: &Path) -> Result<Vec<Snapshot>, LoadError> {
    let content = read(path)?;
    let mut snapshots: Vec<Snapshot> = parse_json(path, &content)?;
    snapshots.sort_by_key(|s| s.timestamp);
    tracing::debug!(path = %path.display(), count = snapshots.len(), "loaded snapshots");
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use skillcascade_types::catalog::{DomainId, EdgeKind, SkillId};
    use tempfile::TempDir;

    const CATALOG_JSON: &str = r#"{
        "domains": [
            {
                "id": "d1",
                "name": "Foundations",
                "tier_position": 1,
                "sub_areas": [
                    {
                        "id": "d1.core",
                        "name": "Core",
                        "skill_groups": [
                            {
                                "id": "d1.core.basic",
                                "name": "Basic",
                                "skills": [{ "id": "d1.s1", "name": "First", "tier": 1 }]
                            }
                        ]
                    }
                ]
            }
        ],
        "edges": [{ "from": "d1", "to": "d2", "kind": "requires" }]
    }"#;

    const CATALOG_TOML: &str = r#"
[[domains]]
id = "d1"
name = "Foundations"
tier_position = 1
independent = true

[[domains.sub_areas]]
id = "d1.core"
name = "Core"

[[domains.sub_areas.skill_groups]]
id = "d1.core.basic"
name = "Basic"

[[domains.sub_areas.skill_groups.skills]]
id = "d1.s1"
name = "First"
tier = 1
prerequisites = ["d0.s9"]
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_catalog_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "catalog.json", CATALOG_JSON);
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.domains.len(), 1);
        assert_eq!(catalog.domains[0].id, DomainId::from("d1"));
        assert!(!catalog.domains[0].independent);
        assert_eq!(catalog.edges[0].kind, EdgeKind::Requires);
    }

    #[test]
    fn test_load_catalog_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "catalog.TOML", CATALOG_TOML);
        let catalog = load_catalog(&path).unwrap();
        assert!(catalog.domains[0].independent);
        assert!(catalog.edges.is_empty());
        let skill = &catalog.domains[0].sub_areas[0].skill_groups[0].skills[0];
        assert_eq!(skill.prerequisites, vec![SkillId::from("d0.s9")]);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "catalog.yaml", "domains: []");
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_assessment(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_load_assessment_rejects_out_of_range() {
        let dir = TempDir::new().unwrap();
        let ok = write(&dir, "ok.json", r#"{ "d1.s1": 2, "d1.s2": 0 }"#);
        let assessment = load_assessment(&ok).unwrap();
        assert_eq!(assessment.get(&SkillId::from("d1.s1")), Some(2));

        let bad = write(&dir, "bad.json", r#"{ "d1.s1": 4 }"#);
        assert!(matches!(load_assessment(&bad), Err(LoadError::Json { .. })));
    }

    #[test]
    fn test_load_snapshots_sorted_oldest_first() {
        let dir = TempDir::new().unwrap();
        let now = Utc::now();
        let history = vec![
            Snapshot::new("recent", now - Duration::days(1), Assessment::new()),
            Snapshot::new("intake", now - Duration::days(90), Assessment::new()),
        ];
        let path = write(&dir, "snapshots.json", &serde_json::to_string(&history).unwrap());
        let loaded = load_snapshots(&path).unwrap();
        let labels: Vec<&str> = loaded.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["intake", "recent"]);
    }

    #[test]
    fn test_demo_data_builds_an_engine() {
        use skillcascade_core::CascadeEngine;
        use skillcascade_types::config::EngineConfig;

        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let catalog = load_catalog(&demos.join("catalog.json")).unwrap();
        let assessment = load_assessment(&demos.join("assessment.json")).unwrap();
        let snapshots = load_snapshots(&demos.join("snapshots.json")).unwrap();

        let engine = CascadeEngine::new(catalog, EngineConfig::default()).unwrap();
        assert_eq!(engine.catalog().domains().len(), 9);
        assert_eq!(snapshots.len(), 2);
        assert!(snapshots[0].timestamp < snapshots[1].timestamp);

        let risks = engine.detect_cascade_risks(&assessment, &snapshots);
        assert!(risks.iter().all(|r| r.severity > 0.0));
    }
}
