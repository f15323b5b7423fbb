// Configuration loading and validation (analysis.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use nobscan_core::settings::{ImpactSettings, ScoringSettings};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "analysis.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataPaths,
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub impact: ImpactSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Directory searched recursively for match JSON documents.
    pub matches_dir: String,
    /// OpenDota `heroes.json`.
    pub heroes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Per-player CSV; not written when absent.
    #[serde(default)]
    pub players_csv: Option<String>,
    #[serde(default)]
    pub sweep_csv: Option<String>,
    #[serde(default)]
    pub print_matches: bool,
    #[serde(default)]
    pub print_references: bool,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/analysis.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Copy `defaults/analysis.toml` to `config/analysis.toml` when no config
/// exists yet. Returns the written path, or `None` when a config was already
/// in place. An existing config is never touched.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!(
            "{} is missing and {} cannot be read: {e}",
            target.display(),
            source.display()
        ),
    })?;

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::write(&target, text).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;

    info!("Copied default config to {}", target.display());
    Ok(Some(target))
}

/// Load config relative to the current working directory, copying defaults
/// on first run.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let scoring = &config.scoring;

    let w = scoring.assist_weight;
    if !w.is_finite() || w < 0.0 {
        return Err(invalid(
            "scoring.assist_weight",
            format!("must be a finite number >= 0, got {w}"),
        ));
    }

    let limit = scoring.nob_limit;
    if !limit.is_finite() || limit <= 0.0 {
        return Err(invalid(
            "scoring.nob_limit",
            format!("must be a finite number > 0, got {limit}"),
        ));
    }

    if scoring.min_sample == 0 {
        return Err(invalid("scoring.min_sample", "must be > 0"));
    }

    if !scoring.sources.any_enabled() {
        return Err(invalid(
            "scoring.sources",
            "at least one evidence source must be enabled",
        ));
    }

    if config.impact.min_teams == 0 {
        return Err(invalid("impact.min_teams", "must be > 0"));
    }

    if config.impact.decimals > 6 {
        return Err(invalid(
            "impact.decimals",
            format!("must be at most 6, got {}", config.impact.decimals),
        ));
    }

    for (field, value) in [
        ("data.matches_dir", &config.data.matches_dir),
        ("data.heroes", &config.data.heroes),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(field, "must not be empty"));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nobscan_core::settings::SamplePolicy;
    use std::fs;

    /// The nobscan-app crate root, whether tests run from the crate or the
    /// workspace root.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/nobscan-app/defaults").exists() {
            cwd.join("crates/nobscan-app")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    /// Default config text with one `key = value` line replaced.
    fn defaults_with(key: &str, value: &str) -> String {
        let text = fs::read_to_string(project_root().join("defaults").join(CONFIG_FILE)).unwrap();
        let prefix = format!("{key} =");
        let replaced: Vec<String> = text
            .lines()
            .map(|line| {
                if line.trim_start().starts_with(&prefix) {
                    format!("{key} = {value}")
                } else {
                    line.to_string()
                }
            })
            .collect();
        assert_ne!(replaced.join("\n"), text.trim_end(), "key {key} not found");
        replaced.join("\n")
    }

    fn expect_validation_error(name: &str, text: &str, expected_field: &str) {
        let tmp = scratch_dir(name);
        fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected_field),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let tmp = scratch_dir("nobscan_config_defaults");
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("config").join(CONFIG_FILE),
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load valid config");
        assert_eq!(config.data.matches_dir, "matches");
        assert_eq!(config.data.heroes, "heroes.json");
        assert!((config.scoring.assist_weight - 0.1).abs() < f64::EPSILON);
        assert!((config.scoring.nob_limit - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.scoring.min_sample, 10);
        assert_eq!(config.scoring.sample_policy, SamplePolicy::Warn);
        assert!(config.scoring.sources.role);
        assert!(config.scoring.sources.whole_match);
        assert_eq!(config.impact.min_teams, 10);
        assert_eq!(config.impact.decimals, 1);
        assert_eq!(config.output.players_csv, None);
        assert!(!config.output.print_matches);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_copies_once() {
        let tmp = std::env::temp_dir().join("nobscan_config_copy");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();
        fs::write(tmp.join("defaults/notes.txt"), "unrelated").unwrap();

        let target = tmp.join("config").join(CONFIG_FILE);
        assert_eq!(ensure_config_file(&tmp).unwrap(), Some(target.clone()));
        assert!(load_config_from(&tmp).is_ok());
        assert!(!tmp.join("config/notes.txt").exists());

        // A user edit survives the second call.
        fs::write(&target, "edited").unwrap();
        assert_eq!(ensure_config_file(&tmp).unwrap(), None);
        assert_eq!(fs::read_to_string(&target).unwrap(), "edited");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn existing_config_needs_no_defaults() {
        let tmp = scratch_dir("nobscan_config_no_defaults");
        fs::write(tmp.join("config").join(CONFIG_FILE), "kept").unwrap();
        assert_eq!(ensure_config_file(&tmp).unwrap(), None);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_defaults_and_config_is_an_error() {
        let tmp = std::env::temp_dir().join("nobscan_config_empty");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_file(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
        assert!(!tmp.join("config").exists());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = scratch_dir("nobscan_config_missing");
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::FileNotFound { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let tmp = scratch_dir("nobscan_config_malformed");
        fs::write(tmp.join("config").join(CONFIG_FILE), "[scoring\nnob_limit = ").unwrap();
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_positive_nob_limit() {
        expect_validation_error(
            "nobscan_config_nob_limit",
            &defaults_with("nob_limit", "0.0"),
            "scoring.nob_limit",
        );
        expect_validation_error(
            "nobscan_config_nob_limit_negative",
            &defaults_with("nob_limit", "-1.5"),
            "scoring.nob_limit",
        );
    }

    #[test]
    fn rejects_zero_min_sample() {
        expect_validation_error(
            "nobscan_config_min_sample",
            &defaults_with("min_sample", "0"),
            "scoring.min_sample",
        );
    }

    #[test]
    fn rejects_zero_min_teams() {
        expect_validation_error(
            "nobscan_config_min_teams",
            &defaults_with("min_teams", "0"),
            "impact.min_teams",
        );
    }

    #[test]
    fn rejects_all_sources_disabled() {
        let mut text = defaults_with("team", "false");
        for key in ["match", "hero", "role", "global"] {
            let prefix = format!("{key} =");
            text = text
                .lines()
                .map(|line| {
                    if line.trim_start().starts_with(&prefix) {
                        format!("{key} = false")
                    } else {
                        line.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
        }
        expect_validation_error("nobscan_config_sources", &text, "scoring.sources");
    }

    #[test]
    fn rejects_unknown_sample_policy() {
        let tmp = scratch_dir("nobscan_config_policy");
        fs::write(
            tmp.join("config").join(CONFIG_FILE),
            defaults_with("sample_policy", "\"sometimes\""),
        )
        .unwrap();
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
