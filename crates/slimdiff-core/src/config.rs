//! Configuration management for slimdiff
//!
//! Layers are merged with priority (later wins):
//! 1. Defaults
//! 2. Global config (`$XDG_CONFIG_HOME/slimdiff/config.toml`)
//! 3. Repo config (`.slimdiff.toml`)
//! 4. A config file named on the command line

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: &str = "1";

/// Supported configuration versions
pub const SUPPORTED_CONFIG_VERSIONS: &[&str] = &["1"];

/// File name of the per-repository config
pub const REPO_CONFIG_FILE: &str = ".slimdiff.toml";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version for tracking schema changes
    #[serde(default = "default_config_version")]
    pub version: String,

    /// Diff compaction configuration
    #[serde(default)]
    pub diff: Option<DiffConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            diff: None,
        }
    }
}

/// Overrides for diff compaction.
///
/// Every field is optional so that layers only override what they set;
/// unset fields fall back to the engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Unchanged lines kept before and after each change
    pub context_radius: Option<usize>,

    /// Hunks emitted per file before the file is truncated
    pub max_hunks_per_file: Option<usize>,

    /// Lines emitted per file (header included) before the file is truncated
    pub max_lines_per_file: Option<usize>,

    /// Longest single emitted line
    pub max_line_length: Option<usize>,

    /// Hard cap on the whole output
    pub max_total_bytes: Option<usize>,

    /// Files emitted before the rest are omitted
    pub max_files: Option<usize>,

    /// Reduce hunks without any +/- line to a short preview
    pub drop_pure_context_hunks: Option<bool>,

    /// Start from the built-in ignore globs
    pub default_ignores: Option<bool>,

    /// Extra ignore globs; concatenated across layers
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl DiffConfig {
    /// Merge another layer into this one (other takes precedence)
    pub fn merge(self, other: DiffConfig) -> Self {
        let mut ignore = self.ignore;
        ignore.extend(other.ignore);

        Self {
            context_radius: other.context_radius.or(self.context_radius),
            max_hunks_per_file: other.max_hunks_per_file.or(self.max_hunks_per_file),
            max_lines_per_file: other.max_lines_per_file.or(self.max_lines_per_file),
            max_line_length: other.max_line_length.or(self.max_line_length),
            max_total_bytes: other.max_total_bytes.or(self.max_total_bytes),
            max_files: other.max_files.or(self.max_files),
            drop_pure_context_hunks: other
                .drop_pure_context_hunks
                .or(self.drop_pure_context_hunks),
            default_ignores: other.default_ignores.or(self.default_ignores),
            ignore,
        }
    }
}

fn default_config_version() -> String {
    CURRENT_CONFIG_VERSION.to_string()
}

/// Resolve the config home directory.
/// Respects `XDG_CONFIG_HOME`, falling back to `~/.config`.
pub fn get_config_home() -> Option<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::home_dir().map(|h| h.join(".config")),
    }
}

impl Config {
    /// Check if the configuration version is supported
    pub fn is_version_supported(&self) -> bool {
        SUPPORTED_CONFIG_VERSIONS.contains(&self.version.as_str())
    }

    /// Get a warning message for unsupported versions
    pub fn version_warning(&self) -> Option<String> {
        if !self.is_version_supported() {
            Some(format!(
                "Configuration version '{}' is not supported. Supported versions: {}. Using defaults where needed.",
                self.version,
                SUPPORTED_CONFIG_VERSIONS.join(", ")
            ))
        } else {
            None
        }
    }

    /// Get the default config directory path
    pub fn get_config_dir() -> Option<PathBuf> {
        get_config_home().map(|h| h.join("slimdiff"))
    }

    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(warning) = config.version_warning() {
            tracing::warn!(path = %path.display(), "{}", warning);
        }

        if config.version.is_empty() {
            config.version = CURRENT_CONFIG_VERSION.to_string();
        }

        tracing::debug!(path = %path.display(), "loaded config layer");
        Ok(config)
    }

    /// Load configuration from the global and repo locations, then from
    /// `custom` if given. A missing global or repo file is skipped; a
    /// missing custom file is an error.
    pub fn load(custom: Option<&Path>) -> ConfigResult<Self> {
        let mut layers = Vec::new();
        if let Some(config_dir) = Self::get_config_dir() {
            layers.push(config_dir.join("config.toml"));
        }
        layers.push(PathBuf::from(REPO_CONFIG_FILE));

        Self::load_layers(&layers, custom)
    }

    /// Merge every existing file of `optional` in order, then `required`.
    pub fn load_layers(optional: &[PathBuf], required: Option<&Path>) -> ConfigResult<Self> {
        let mut config = Self::default();

        for path in optional.iter().filter(|p| p.exists()) {
            config = config.merge(Self::load_from_file(path)?);
        }

        if let Some(path) = required {
            config = config.merge(Self::load_from_file(path)?);
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(mut self, other: Config) -> Self {
        if !other.version.is_empty() {
            self.version = other.version;
        }

        self.diff = match (self.diff, other.diff) {
            (Some(base), Some(over)) => Some(base.merge(over)),
            (base, over) => over.or(base),
        };
        self
    }

    /// The merged `[diff]` section, or an empty one
    pub fn diff_or_default(&self) -> DiffConfig {
        self.diff.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1");
        assert!(config.diff.is_none());
        assert_eq!(config.diff_or_default(), DiffConfig::default());
    }

    #[test]
    fn test_config_version_validation() {
        let config = Config {
            version: "1".to_string(),
            diff: None,
        };
        assert!(config.is_version_supported());
        assert!(config.version_warning().is_none());

        let unsupported_config = Config {
            version: "999".to_string(),
            diff: None,
        };
        assert!(!unsupported_config.is_version_supported());
        assert!(unsupported_config.version_warning().is_some());
    }

    #[test]
    fn test_parse_config_with_diff_section() {
        let toml_str = r#"
version = "1"

[diff]
context_radius = 3
max_files = 10
drop_pure_context_hunks = false
ignore = ["docs/generated/**"]
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        let diff = config.diff.unwrap();
        assert_eq!(diff.context_radius, Some(3));
        assert_eq!(diff.max_files, Some(10));
        assert_eq!(diff.drop_pure_context_hunks, Some(false));
        assert_eq!(diff.max_total_bytes, None);
        assert_eq!(diff.ignore, vec!["docs/generated/**".to_string()]);
    }

    #[test]
    fn test_negative_cap_is_parse_error() {
        let file = write_config("[diff]\nmax_files = -1\n");
        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::load_from_file(Path::new("/nonexistent/slimdiff.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/slimdiff.toml"));
    }

    #[test]
    fn test_diff_config_merge_prefers_later_layer() {
        let base = DiffConfig {
            context_radius: Some(1),
            max_files: Some(5),
            ignore: vec!["a/**".to_string()],
            ..Default::default()
        };
        let over = DiffConfig {
            context_radius: Some(4),
            ignore: vec!["b/**".to_string()],
            ..Default::default()
        };

        let merged = base.merge(over);
        assert_eq!(merged.context_radius, Some(4));
        assert_eq!(merged.max_files, Some(5));
        assert_eq!(merged.ignore, vec!["a/**".to_string(), "b/**".to_string()]);
    }

    #[test]
    fn test_load_layers_skips_missing_optional_files() {
        let global = write_config("[diff]\nmax_line_length = 120\n");
        let repo = write_config("[diff]\nmax_line_length = 200\nmax_files = 3\n");
        let missing = PathBuf::from("/nonexistent/config.toml");

        let config = Config::load_layers(
            &[missing, global.path().to_path_buf(), repo.path().to_path_buf()],
            None,
        )
        .unwrap();

        let diff = config.diff.unwrap();
        assert_eq!(diff.max_line_length, Some(200));
        assert_eq!(diff.max_files, Some(3));
    }

    #[test]
    fn test_load_layers_requires_custom_file() {
        let result = Config::load_layers(&[], Some(Path::new("/nonexistent/custom.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_unsupported_version_still_loads() {
        let file = write_config("version = \"7\"\n[diff]\nmax_files = 2\n");
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.version, "7");
        assert_eq!(config.diff.unwrap().max_files, Some(2));
    }
}
