//! Configuration management for dyntag.
//!
//! Parses `dyntag.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [render]
//! subject = 42
//! context = "text"
//!
//! [cache]
//! enabled = true
//!
//! [[tags]]
//! name = "{site_name}"
//! label = "Site name"
//! group = "Site"
//! value = "${SITE_NAME:-Acme}"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `render.context`
//! - `tags[].value`

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override default subject id.
    pub subject: Option<u64>,
    /// Override default render context.
    pub context: Option<String>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override example tags flag.
    pub example_tags: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dyntag.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Render defaults.
    pub render: RenderConfig,
    /// Resolution cache configuration.
    pub cache: CacheConfig,
    /// Tags declared in the config file.
    pub tags: Vec<TagConfig>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Render defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Subject id used when none is given on the command line.
    pub subject: u64,
    /// Context used when none is given on the command line.
    pub context: String,
    /// Whether the built-in example tags are registered.
    pub example_tags: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            subject: 0,
            context: "text".to_owned(),
            example_tags: true,
        }
    }
}

/// Resolution cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether resolved tags are memoized.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// A tag declared in the config file.
///
/// `value` is a template: `{0}`, `{1}`, ... expand to the occurrence's
/// positional attributes, `{subject}` and `{context}` to the render arguments.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TagConfig {
    /// Tag name as written, e.g. `{site_name}`.
    pub name: String,
    /// Human readable label.
    #[serde(default)]
    pub label: String,
    /// Group the tag is listed under.
    #[serde(default)]
    pub group: String,
    /// Replacement template.
    #[serde(default)]
    pub value: String,
}

impl TagConfig {
    /// Tag id: the name without braces, up to the first `:`.
    #[must_use]
    pub fn id(&self) -> &str {
        let trimmed = self.name.trim_matches(|c| c == '{' || c == '}');
        trimmed.split_once(':').map_or(trimmed, |(id, _)| id)
    }
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
        /// Config field path (e.g., "`tags[0].value`").
        field: String,
        /// Error message (e.g., "${`SITE_NAME`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dyntag.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the configuration is invalid.
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
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(subject) = settings.subject {
            self.render.subject = subject;
        }
        if let Some(context) = &settings.context {
            self.render.context.clone_from(context);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache.enabled = cache_enabled;
        }
        if let Some(example_tags) = settings.example_tags {
            self.render.example_tags = example_tags;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::discover_config_from(&cwd)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and expansion
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render.context, "render.context")?;
        self.validate_tags()?;
        Ok(())
    }

    /// Validate declared tags.
    fn validate_tags(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for (idx, tag) in self.tags.iter().enumerate() {
            let field = format!("tags[{idx}].name");
            require_non_empty(&tag.name, &field)?;

            let id = tag.id();
            require_non_empty(id, &field)?;
            if id.contains(['{', '}']) {
                return Err(ConfigError::Validation(format!(
                    "{field} contains braces inside the tag name: {}",
                    tag.name
                )));
            }
            if tag.name.contains(':') {
                return Err(ConfigError::Validation(format!(
                    "{field} cannot declare attributes: {}",
                    tag.name
                )));
            }
            if !seen.insert(id) {
                return Err(ConfigError::Validation(format!(
                    "{field} duplicates tag id '{id}'"
                )));
            }
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.render.context = expand::expand_env(&self.render.context, "render.context")?;

        for (idx, tag) in self.tags.iter_mut().enumerate() {
            tag.value = expand::expand_env(&tag.value, &format!("tags[{idx}].value"))?;
        }

        Ok(())
    }
}
