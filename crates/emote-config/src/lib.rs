//! Configuration management for the emoticon filter.
//!
//! Parses `emote.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `plugins.dir`
//! - `emoticons.mappings`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "emote.toml";

/// Default plugin directory, relative to the config file.
const DEFAULT_PLUGINS_DIR: &str = "Plugins";

/// Default mapping file, relative to the plugin directory.
const DEFAULT_MAPPINGS: &str = "EmoticonsPlugin/EmoticonsMappings.xml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the plugin directory.
    pub plugins_dir: Option<PathBuf>,
    /// Override the mapping file location (used as given, not joined to the plugin directory).
    pub mappings: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plugin directory configuration (paths are relative strings from TOML).
    plugins: PluginsConfigRaw,
    /// Emoticon filter configuration (paths are relative strings from TOML).
    emoticons: EmoticonsConfigRaw,

    /// Resolved plugin directory (set after loading).
    #[serde(skip)]
    pub plugins_dir: PathBuf,
    /// Resolved emoticon filter configuration (set after loading).
    #[serde(skip)]
    pub emoticons_resolved: EmoticonsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw plugin configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PluginsConfigRaw {
    dir: Option<String>,
}

/// Raw emoticon configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EmoticonsConfigRaw {
    mappings: Option<String>,
}

/// Resolved emoticon filter configuration with absolute paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmoticonsConfig {
    /// Location of the notation-to-image mapping file.
    pub mappings_path: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`plugins.dir`").
        field: String,
        /// Error message (e.g., "${`PLUGINS_HOME`} not set").
        message: String,
    },
}

/// Require an optional string field to be non-empty when present.
fn require_non_empty(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_some_and(str::is_empty) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `emote.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "Discovered configuration file");
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(plugins_dir) = &settings.plugins_dir {
            self.plugins_dir.clone_from(plugins_dir);
            self.emoticons_resolved.mappings_path = plugins_dir.join(self.mappings_relative());
        }
        if let Some(mappings) = &settings.mappings {
            self.emoticons_resolved.mappings_path.clone_from(mappings);
        }
    }

    fn mappings_relative(&self) -> &str {
        self.emoticons.mappings.as_deref().unwrap_or(DEFAULT_MAPPINGS)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let plugins_dir = base.join(DEFAULT_PLUGINS_DIR);
        Self {
            plugins: PluginsConfigRaw::default(),
            emoticons: EmoticonsConfigRaw::default(),
            emoticons_resolved: EmoticonsConfig {
                mappings_path: plugins_dir.join(DEFAULT_MAPPINGS),
            },
            plugins_dir,
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.validate()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate raw configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a configured path is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(self.plugins.dir.as_deref(), "plugins.dir")?;
        require_non_empty(self.emoticons.mappings.as_deref(), "emoticons.mappings")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.plugins.dir {
            self.plugins.dir = Some(expand::expand_env(dir, "plugins.dir")?);
        }
        if let Some(ref mappings) = self.emoticons.mappings {
            self.emoticons.mappings = Some(expand::expand_env(mappings, "emoticons.mappings")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    ///
    /// The mapping file is resolved against the plugin directory, so an
    /// absolute `emoticons.mappings` wins over both.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.plugins_dir = config_dir.join(self.plugins.dir.as_deref().unwrap_or(DEFAULT_PLUGINS_DIR));
        self.emoticons_resolved = EmoticonsConfig {
            mappings_path: self.plugins_dir.join(self.mappings_relative()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));
        assert_eq!(config.plugins_dir, PathBuf::from("/site/Plugins"));
        assert_eq!(
            config.emoticons_resolved.mappings_path,
            PathBuf::from("/site/Plugins/EmoticonsPlugin/EmoticonsMappings.xml")
        );
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.plugins.dir.is_none());
        assert!(config.emoticons.mappings.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[plugins]
dir = "extensions"

[emoticons]
mappings = "smileys/map.xml"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.plugins_dir, PathBuf::from("/project/extensions"));
        assert_eq!(
            config.emoticons_resolved.mappings_path,
            PathBuf::from("/project/extensions/smileys/map.xml")
        );
    }

    #[test]
    fn test_absolute_mappings_path_wins() {
        let toml = r#"
[emoticons]
mappings = "/etc/emote/map.xml"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.emoticons_resolved.mappings_path,
            PathBuf::from("/etc/emote/map.xml")
        );
    }

    #[test]
    fn test_empty_plugins_dir_rejected() {
        let toml = r#"
[plugins]
dir = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("plugins.dir"));
    }

    #[test]
    fn test_apply_cli_settings_plugins_dir() {
        let mut config = Config::default_with_base(Path::new("/site"));
        let overrides = CliSettings {
            plugins_dir: Some(PathBuf::from("/opt/plugins")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.plugins_dir, PathBuf::from("/opt/plugins"));
        assert_eq!(
            config.emoticons_resolved.mappings_path,
            PathBuf::from("/opt/plugins/EmoticonsPlugin/EmoticonsMappings.xml")
        );
    }

    #[test]
    fn test_apply_cli_settings_mappings() {
        let mut config = Config::default_with_base(Path::new("/site"));
        let overrides = CliSettings {
            plugins_dir: Some(PathBuf::from("/opt/plugins")),
            mappings: Some(PathBuf::from("custom.xml")),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.plugins_dir, PathBuf::from("/opt/plugins"));
        assert_eq!(
            config.emoticons_resolved.mappings_path,
            PathBuf::from("custom.xml")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/site"));
        let mut config = Config::default_with_base(Path::new("/site"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.plugins_dir, before.plugins_dir);
        assert_eq!(config.emoticons_resolved, before.emoticons_resolved);
    }

    #[test]
    fn test_expand_env_vars_plugins_dir() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("EMOTE_TEST_PLUGINS", "/srv/wiki/plugins");
        }

        let toml = r#"
[plugins]
dir = "${EMOTE_TEST_PLUGINS}"

[emoticons]
mappings = "${EMOTE_TEST_MAPPINGS_UNSET:-map.xml}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.plugins.dir.as_deref(), Some("/srv/wiki/plugins"));
        assert_eq!(config.emoticons.mappings.as_deref(), Some("map.xml"));

        unsafe {
            std::env::remove_var("EMOTE_TEST_PLUGINS");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("EMOTE_MISSING_VAR_CONFIG_TEST");
        }

        let toml = r#"
[emoticons]
mappings = "${EMOTE_MISSING_VAR_CONFIG_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("EMOTE_MISSING_VAR_CONFIG_TEST"));
        assert!(err.to_string().contains("emoticons.mappings"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[plugins]\ndir = \"ext\"\n").unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();

        assert_eq!(config.plugins_dir, dir.path().join("ext"));
        assert_eq!(
            config.emoticons_resolved.mappings_path,
            dir.path().join("ext").join(DEFAULT_MAPPINGS)
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load(Some(path.as_path()), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[plugins\n").unwrap();

        let err = Config::load(Some(path.as_path()), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
