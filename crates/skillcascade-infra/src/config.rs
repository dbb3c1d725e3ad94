//! Engine configuration loader.
//!
//! Reads `config.toml` from an explicit path or from the SkillCascade config
//! directory (`<config dir>/skillcascade/` by default) and deserializes it
//! into [`EngineConfig`]. Every field is optional; omitted fields keep their
//! defaults. Loaded values are validated before they are returned.

use std::path::{Path, PathBuf};

use skillcascade_types::config::EngineConfig;

use crate::loader::{LoadError, parse_toml, read};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "SKILLCASCADE_CONFIG_DIR";

/// Resolve the config directory from environment or platform defaults.
///
/// Priority:
/// 1. `SKILLCASCADE_CONFIG_DIR` environment variable
/// 2. Platform config directory (e.g. `~/.config/skillcascade` on Linux)
/// 3. `.skillcascade` in the current directory
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("skillcascade");
    }
    PathBuf::from(".skillcascade")
}

/// Default location of the engine config file.
pub fn default_config_path() -> PathBuf {
    resolve_config_dir().join("config.toml")
}

/// Load and validate engine configuration.
///
/// - With an explicit `path`, the file must exist and parse.
/// - Without one, the default location is tried; a missing file yields
///   [`EngineConfig::default()`].
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig, LoadError> {
    match path {
        Some(path) => parse_config_file(path),
        None => {
            let path = default_config_path();
            if !path.exists() {
                tracing::debug!("No config.toml found at {}, using defaults", path.display());
                return Ok(EngineConfig::default());
            }
            parse_config_file(&path)
        }
    }
}

fn parse_config_file(path: &Path) -> Result<EngineConfig, LoadError> {
    let content = read(path)?;
    let config: EngineConfig = parse_toml(path, &content)?;
    config.validate().map_err(|source| LoadError::InvalidConfig {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded engine config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillcascade_types::config::{BottleneckScope, RegressionBaseline};
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[cascade]
hop_decay = 0.5

[risk]
regression_baseline = "latest"

[bottleneck]
scope = "sub_area"
"#,
        )
        .unwrap();

        let config = load_engine_config(Some(&path)).unwrap();
        assert_eq!(config.cascade.hop_decay, 0.5);
        assert_eq!(config.cascade.requires_weight, 0.6);
        assert_eq!(config.risk.regression_baseline, RegressionBaseline::Latest);
        assert_eq!(config.bottleneck.scope, BottleneckScope::SubArea);
        assert_eq!(config.health.readiness_threshold, 1.5);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_engine_config(Some(&tmp.path().join("nope.toml")));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "this is not { valid toml !!!").unwrap();
        assert!(matches!(load_engine_config(Some(&path)), Err(LoadError::Toml { .. })));
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[health]\nreadiness_threshold = 4.0\n").unwrap();
        let err = load_engine_config(Some(&path)).unwrap_err();
        assert!(matches!(err, LoadError::InvalidConfig { .. }));
        assert!(err.to_string().contains("readiness_threshold"));
    }
}
