//! Configuration loading
//!
//! Settings are layered with the precedence CLI > environment > file >
//! defaults. The file is TOML with a single `[mstyle]` table:
//!
//! ```toml
//! [mstyle]
//! log_level = "info"
//! log_format = "json"
//! separator = "_"
//! allowed_suffixes = ["jpg", "png", "webp"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{MediaStyleError, MediaStyleResult};
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};
use crate::utils::name::DEFAULT_SEPARATOR;

pub const DEFAULT_CONFIG_FILE: &str = "mstyle.toml";

pub const ENV_CONFIG: &str = "MSTYLE_CONFIG";
pub const ENV_LOG_LEVEL: &str = "MSTYLE_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "MSTYLE_LOG_FORMAT";
pub const ENV_SEPARATOR: &str = "MSTYLE_SEPARATOR";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mstyle: FileSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSection {
    log_level: Option<LogLevel>,
    log_format: Option<LogFormat>,
    separator: Option<String>,
    allowed_suffixes: Option<Vec<String>>,
}

/// Values given on the command line; `None` defers to the lower layers
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
    pub separator: Option<String>,
}

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    /// Joins a file key and a style name
    pub separator: String,
    /// Suffixes recognised when splitting style names; `None` accepts any
    pub allowed_suffixes: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            allowed_suffixes: None,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with the `[mstyle]` table of `content`
    pub fn from_toml_str(content: &str) -> MediaStyleResult<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::default();
        config.apply_file(file.mstyle);
        config.validate()?;
        Ok(config)
    }

    /// Load from the process environment and the configuration file
    pub fn load(overrides: &ConfigOverrides) -> MediaStyleResult<Self> {
        Self::load_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Load with `env` standing in for the process environment
    pub fn load_with_env<F>(overrides: &ConfigOverrides, env: F) -> MediaStyleResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = Self::resolve_path(overrides, &env)? {
            debug!(path = %path.display(), "loading configuration file");
            let content = fs::read_to_string(&path)?;
            let file: ConfigFile = toml::from_str(&content)?;
            config.apply_file(file.mstyle);
        }

        if let Some(level) = env(ENV_LOG_LEVEL) {
            config.logging.level = level.parse()?;
        }
        if let Some(format) = env(ENV_LOG_FORMAT) {
            config.logging.format = format.parse()?;
        }
        if let Some(separator) = env(ENV_SEPARATOR) {
            config.separator = separator;
        }

        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            config.logging.format = format;
        }
        if let Some(separator) = &overrides.separator {
            config.separator = separator.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Explicit paths must exist; the default file is optional
    fn resolve_path<F>(overrides: &ConfigOverrides, env: &F) -> MediaStyleResult<Option<PathBuf>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = overrides
            .config_path
            .clone()
            .or_else(|| env(ENV_CONFIG).map(PathBuf::from));

        match explicit {
            Some(path) if path.is_file() => Ok(Some(path)),
            Some(path) => Err(MediaStyleError::Config {
                message: format!("configuration file not found: {}", path.display()),
            }),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                Ok(default.is_file().then(|| default.to_path_buf()))
            }
        }
    }

    fn apply_file(&mut self, section: FileSection) {
        if let Some(level) = section.log_level {
            self.logging.level = level;
        }
        if let Some(format) = section.log_format {
            self.logging.format = format;
        }
        if let Some(separator) = section.separator {
            self.separator = separator;
        }
        if section.allowed_suffixes.is_some() {
            self.allowed_suffixes = section.allowed_suffixes;
        }
    }

    fn validate(&self) -> MediaStyleResult<()> {
        if self.separator.is_empty() {
            return Err(MediaStyleError::Config {
                message: "separator must not be empty".to_string(),
            });
        }
        if let Some(suffixes) = &self.allowed_suffixes {
            if let Some(bad) = suffixes.iter().find(|s| s.is_empty() || s.contains('.')) {
                return Err(MediaStyleError::Config {
                    message: format!("invalid allowed suffix '{}'", bad),
                });
            }
        }
        Ok(())
    }
}
