//! TOML configuration
//!
//! Controller defaults can be tuned from a file at
//! `~/.config/animator/animator.toml` (XDG config dir).
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [animation]
//! default_fps = 6
//! idle_state = "resting"
//! recommended_fps = true
//!
//! [fps]
//! write = 10
//! search = 8
//!
//! [aliases]
//! busy = "write"
//! compile = "think"
//!
//! [noise.write]
//! count = 6
//! intensity = 2
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alias::DEFAULT_IDLE_STATE;
use crate::controller::DEFAULT_FPS;
use crate::overlay::NoiseConfig;

/// Environment variable for the default frame rate
pub const ENV_DEFAULT_FPS: &str = "ANIMATOR_DEFAULT_FPS";
/// Environment variable for the idle state name
pub const ENV_IDLE_STATE: &str = "ANIMATOR_IDLE_STATE";
/// Environment variable enabling the recommended per-state rates
pub const ENV_RECOMMENDED_FPS: &str = "ANIMATOR_RECOMMENDED_FPS";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[animation]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationToml {
    /// Fallback frame rate
    pub default_fps: Option<u32>,

    /// State used when a name cannot be resolved
    pub idle_state: Option<String>,

    /// Install the recommended per-state rates
    pub recommended_fps: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorToml {
    /// General animation settings
    pub animation: AnimationToml,

    /// Per-state frame rates
    pub fps: BTreeMap<String, u32>,

    /// Custom aliases, external name to state
    pub aliases: BTreeMap<String, String>,

    /// Per-state overlay settings
    pub noise: BTreeMap<String, NoiseConfig>,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved controller configuration
///
/// Use [`load_config`] to load with proper priority handling, or
/// [`AnimatorConfig::default`] for the built-in behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimatorConfig {
    /// Fallback frame rate (at least 1)
    pub default_fps: u32,

    /// Idle/fallback state name
    pub idle_state: String,

    /// Whether the recommended per-state rates are installed
    pub recommended_fps: bool,

    /// Explicit per-state rates; these win over the recommended table
    pub state_fps: BTreeMap<String, u32>,

    /// Custom aliases installed at construction
    pub aliases: BTreeMap<String, String>,

    /// Overlay settings merged over the controller's defaults
    pub noise: BTreeMap<String, NoiseConfig>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    pub(crate) source: ConfigSource,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            default_fps: DEFAULT_FPS,
            idle_state: DEFAULT_IDLE_STATE.to_string(),
            recommended_fps: false,
            state_fps: BTreeMap::new(),
            aliases: BTreeMap::new(),
            noise: BTreeMap::new(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl AnimatorConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check values that would otherwise be silently clamped
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero default rate or
    /// an empty idle state name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_fps == 0 {
            return Err(ConfigError::ValidationError(
                "default_fps must be at least 1".to_string(),
            ));
        }
        if self.idle_state.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "idle_state must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/animator/animator.toml` or
/// `~/.config/animator/animator.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("animator").join("animator.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or the
/// merged result fails validation. A missing config file is not an error.
pub fn load_config() -> Result<AnimatorConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or the merged result fails validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<AnimatorConfig, ConfigError> {
    let mut config = AnimatorConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: AnimatorToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut AnimatorConfig, toml: AnimatorToml) {
    if let Some(fps) = toml.animation.default_fps {
        config.default_fps = fps;
    }
    if let Some(idle) = toml.animation.idle_state {
        config.idle_state = idle;
    }
    if let Some(enabled) = toml.animation.recommended_fps {
        config.recommended_fps = enabled;
    }

    config.state_fps.extend(toml.fps);
    config.aliases.extend(toml.aliases);
    config.noise.extend(toml.noise);
}

/// Apply environment overrides read through `lookup`
///
/// Unparseable values are logged and skipped.
fn apply_env_config<F>(config: &mut AnimatorConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_DEFAULT_FPS) {
        match raw.trim().parse::<u32>() {
            Ok(fps) => {
                config.default_fps = fps;
                config.source = ConfigSource::Env;
            }
            Err(_) => {
                tracing::warn!(var = ENV_DEFAULT_FPS, value = %raw, "Ignoring invalid value");
            }
        }
    }
    if let Some(idle) = lookup(ENV_IDLE_STATE) {
        config.idle_state = idle;
        config.source = ConfigSource::Env;
    }
    if let Some(enabled) = lookup(ENV_RECOMMENDED_FPS) {
        config.recommended_fps = enabled != "0" && enabled.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Default frame rate override
    pub default_fps: Option<u32>,

    /// Idle state override
    pub idle_state: Option<String>,

    /// Recommended-rates toggle override
    pub recommended_fps: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set default frame rate override
    #[must_use]
    pub fn with_default_fps(mut self, fps: u32) -> Self {
        self.default_fps = Some(fps);
        self
    }

    /// Set idle state override
    #[must_use]
    pub fn with_idle_state(mut self, state: impl Into<String>) -> Self {
        self.idle_state = Some(state.into());
        self
    }

    /// Set recommended-rates override
    #[must_use]
    pub fn with_recommended_fps(mut self, enabled: bool) -> Self {
        self.recommended_fps = Some(enabled);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut AnimatorConfig) {
        if self.default_fps.is_some() || self.idle_state.is_some() || self.recommended_fps.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(fps) = self.default_fps {
            config.default_fps = fps;
        }
        if let Some(ref idle) = self.idle_state {
            config.idle_state.clone_from(idle);
        }
        if let Some(enabled) = self.recommended_fps {
            config.recommended_fps = enabled;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn fake_env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = AnimatorConfig::default();

        assert_eq!(config.default_fps, 5);
        assert_eq!(config.idle_state, "resting");
        assert!(!config.recommended_fps);
        assert!(config.state_fps.is_empty());
        assert!(config.aliases.is_empty());
        assert!(config.noise.is_empty());
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("animator"));
            assert!(p.to_string_lossy().ends_with("animator.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[animation]
default_fps = 6
idle_state = "sleep"
recommended_fps = true

[fps]
write = 10
search = 8

[aliases]
busy = "write"

[noise.write]
count = 6
intensity = 2
"#,
        );

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.default_fps, 6);
        assert_eq!(config.idle_state, "sleep");
        assert!(config.recommended_fps);
        assert_eq!(config.state_fps.get("write"), Some(&10));
        assert_eq!(config.state_fps.get("search"), Some(&8));
        assert_eq!(config.aliases.get("busy").map(String::as_str), Some("write"));
        assert_eq!(config.noise.get("write"), Some(&NoiseConfig::new(6, 2)));
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let file = write_toml("[fps]\nwrite = 12\n");
        let mut config = AnimatorConfig::default();
        let toml_config: AnimatorToml =
            toml::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        apply_toml_config(&mut config, toml_config);

        assert_eq!(config.default_fps, 5);
        assert_eq!(config.idle_state, "resting");
        assert_eq!(config.state_fps.get("write"), Some(&12));
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/path/animator.toml");
        let config = load_config_from_path(Some(path)).unwrap();
        assert!(config.config_file_path.is_none());
        assert!(
            config.source() == ConfigSource::Default || config.source() == ConfigSource::Env,
            "Expected Default or Env source, got: {:?}",
            config.source()
        );
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[animation\ndefault_fps = \"fast\"\n");
        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let file = write_toml("[fps]\nwrite = \"ten\"\n");
        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_zero_default_fps_rejected() {
        let file = write_toml("[animation]\ndefault_fps = 0\n");
        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_empty_idle_state_rejected() {
        let config = AnimatorConfig {
            idle_state: "  ".to_string(),
            ..AnimatorConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("idle_state"));
    }

    // =========================================================================
    // Priority Ordering
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let mut config = AnimatorConfig::default();
        apply_toml_config(
            &mut config,
            toml::from_str("[animation]\ndefault_fps = 3\nidle_state = \"sleep\"\n").unwrap(),
        );

        apply_env_config(
            &mut config,
            fake_env(&[(ENV_DEFAULT_FPS, "9"), (ENV_RECOMMENDED_FPS, "true")]),
        );

        assert_eq!(config.default_fps, 9);
        assert_eq!(config.idle_state, "sleep");
        assert!(config.recommended_fps);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_invalid_env_value_ignored() {
        let mut config = AnimatorConfig::default();
        apply_env_config(&mut config, fake_env(&[(ENV_DEFAULT_FPS, "lots")]));
        assert_eq!(config.default_fps, 5);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_env_false_values() {
        let mut config = AnimatorConfig {
            recommended_fps: true,
            ..AnimatorConfig::default()
        };
        apply_env_config(&mut config, fake_env(&[(ENV_RECOMMENDED_FPS, "FALSE")]));
        assert!(!config.recommended_fps);

        config.recommended_fps = true;
        apply_env_config(&mut config, fake_env(&[(ENV_RECOMMENDED_FPS, "0")]));
        assert!(!config.recommended_fps);
    }

    #[test]
    fn test_cli_overrides_everything() {
        let mut config = AnimatorConfig::default();
        apply_env_config(&mut config, fake_env(&[(ENV_DEFAULT_FPS, "9")]));

        ConfigOverrides::new()
            .with_default_fps(12)
            .with_idle_state("sleep")
            .apply(&mut config);

        assert_eq!(config.default_fps, 12);
        assert_eq!(config.idle_state, "sleep");
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = AnimatorConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }
}
