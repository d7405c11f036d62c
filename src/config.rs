//! Settings for the iniq command
//!
//! Reads the optional `iniq.toml` settings file.
//!
//! ## Environment Variables
//!
//! The following environment variables override settings file values:
//!
//! - `INIQ_LOG` - Log level or filter directive
//! - `INIQ_FORMAT` - Output format (`text` or `json`)
//! - `INIQ_MAX_TEXT_LEN` - Longest text evaluation may produce, in bytes
//!
//! These can be set in a `.env` file next to the settings file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use iniq_core::executor::{EvalLimits, DEFAULT_MAX_TEXT_LEN};
use serde::{Deserialize, Serialize};

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "iniq.toml";

/// Environment variable names
pub const ENV_LOG: &str = "INIQ_LOG";
pub const ENV_FORMAT: &str = "INIQ_FORMAT";
pub const ENV_MAX_TEXT_LEN: &str = "INIQ_MAX_TEXT_LEN";

/// How results are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per query
    #[default]
    Text,
    /// A single JSON array
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Main settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
    /// Evaluation limits
    #[serde(default)]
    pub limits: LimitSettings,
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Evaluation limits section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
}

fn default_max_text_len() -> usize {
    DEFAULT_MAX_TEXT_LEN
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_text_len: default_max_text_len(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            format: OutputFormat::default(),
            limits: LimitSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// A `.env` file in the same directory is loaded first. A missing
    /// settings file means defaults; environment overrides apply either way.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let env_path = dir.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }

        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("invalid settings file {}: {}", path.display(), e))?
        } else {
            Self::default()
        };

        settings.apply_env_overrides()?;
        Ok(settings)
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides to the settings
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable lookup. Empty values are ignored;
    /// values that do not parse are errors.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(level) = var(ENV_LOG) {
            self.log_level = level;
        }

        if let Some(format) = var(ENV_FORMAT) {
            self.format = format
                .parse()
                .map_err(|e| anyhow::anyhow!("{}: {}", ENV_FORMAT, e))?;
        }

        if let Some(len) = var(ENV_MAX_TEXT_LEN) {
            self.limits.max_text_len = len.trim().parse::<usize>().map_err(|e| {
                anyhow::anyhow!("{}: invalid length '{}': {}", ENV_MAX_TEXT_LEN, len, e)
            })?;
        }

        Ok(())
    }

    /// Evaluation limits for the query engine
    pub fn eval_limits(&self) -> EvalLimits {
        EvalLimits {
            max_text_len: self.limits.max_text_len,
        }
    }

    /// Log filter after applying `verbose` (`-v` count).
    ///
    /// Each `-v` raises the level one step from `info`; the configured
    /// level is kept when it is already more verbose. Filter directives other
    /// than a bare level are replaced once `-v` is given.
    pub fn log_filter(&self, verbose: u8) -> String {
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

        if verbose == 0 {
            return self.log_level.clone();
        }

        let requested = (1 + verbose as usize).min(LEVELS.len() - 1);
        let configured = LEVELS
            .iter()
            .position(|l| l.eq_ignore_ascii_case(self.log_level.trim()));

        match configured {
            Some(idx) if idx > requested => LEVELS[idx].to_string(),
            _ => LEVELS[requested].to_string(),
        }
    }
}
