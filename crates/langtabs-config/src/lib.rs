//! Configuration management for langtabs.
//!
//! Parses `langtabs.toml` configuration files with serde and provides
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
//! - `site.source_dir`
//! - `site.output_dir`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override rendered site directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override recognized languages.
    pub languages: Option<Vec<String>>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "langtabs.toml";

/// Languages grouped when nothing else is configured.
pub const DEFAULT_LANGUAGES: [&str; 3] = ["Hjson", "JSON", "TOML"];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Tab grouping configuration.
    pub tabs: TabsConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Directory holding the rendered HTML pages.
    pub source_dir: PathBuf,
    /// Where to write processed pages. `None` rewrites pages in place.
    pub output_dir: Option<PathBuf>,
    /// Glob patterns selecting pages, relative to `source_dir`.
    pub include: Vec<String>,
    /// Glob patterns excluding pages, relative to `source_dir`.
    pub exclude: Vec<String>,
}

impl SiteConfig {
    /// Compile the include/exclude patterns into a page filter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an invalid pattern.
    pub fn page_filter(&self) -> Result<PageFilter, ConfigError> {
        Ok(PageFilter {
            include: compile_patterns(&self.include, "site.include")?,
            exclude: compile_patterns(&self.exclude, "site.exclude")?,
        })
    }
}

/// Compiled page selection patterns.
#[derive(Debug, Clone)]
pub struct PageFilter {
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
}

impl PageFilter {
    /// Whether a `/`-separated path relative to the site directory is a page
    /// to process: matched by an include pattern and by no exclude pattern.
    #[must_use]
    pub fn selects(&self, relative: &str) -> bool {
        self.include.iter().any(|p| p.matches(relative))
            && !self.exclude.iter().any(|p| p.matches(relative))
    }
}

/// Tab grouping configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Recognized languages, in tagging priority order.
    pub languages: Vec<String>,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|&l| l.to_owned()).collect(),
        }
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
        /// Config field path (e.g., "`site.source_dir`").
        field: String,
        /// Error message (e.g., "${`SITE_DIR`} not set").
        message: String,
    },
}

fn compile_patterns(patterns: &[String], field: &str) -> Result<Vec<glob::Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|e| {
                ConfigError::Validation(format!("{field}: invalid pattern {p:?}: {e}"))
            })
        })
        .collect()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `langtabs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        if config.tabs.languages.is_empty() {
            warn!("no languages configured, pages will be left unchanged");
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.site_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir = Some(output_dir.clone());
        }
        if let Some(languages) = &settings.languages {
            self.tabs.languages.clone_from(languages);
        }
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
        Self {
            site: SiteConfigRaw::default(),
            tabs: TabsConfig::default(),
            site_resolved: SiteConfig {
                source_dir: base.join("site"),
                output_dir: None,
                include: default_include(),
                exclude: Vec::new(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_tabs()?;
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        if self.site_resolved.include.is_empty() {
            return Err(ConfigError::Validation(
                "site.include cannot be empty".to_owned(),
            ));
        }
        self.site_resolved.page_filter()?;
        Ok(())
    }

    /// Validate tabs configuration.
    fn validate_tabs(&self) -> Result<(), ConfigError> {
        if self.tabs.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "tabs.languages entries cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.site.source_dir {
            self.site.source_dir = Some(expand::expand_env(dir, "site.source_dir")?);
        }
        if let Some(ref dir) = self.site.output_dir {
            self.site.output_dir = Some(expand::expand_env(dir, "site.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.site_resolved = SiteConfig {
            source_dir: config_dir.join(self.site.source_dir.as_deref().unwrap_or("site")),
            output_dir: self.site.output_dir.as_deref().map(|d| config_dir.join(d)),
            include: self.site.include.clone().unwrap_or_else(default_include),
            exclude: self.site.exclude.clone().unwrap_or_default(),
        };
    }
}

fn default_include() -> Vec<String> {
    vec!["**/*.html".to_owned()]
}
