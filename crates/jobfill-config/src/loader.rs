//! Reading `jobfill.toml` with `${VAR}` substitution.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        Self::load_str(&fs::read_to_string(path)?)
    }

    /// Parse TOML text after substituting `${VAR}` references.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(&Self::expand_env_vars(content)?)?)
    }

    /// Load the file if present, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Config::default())
            }
            other => other,
        }
    }

    /// Replace every `${VAR}` with its value; an unset variable is an error.
    pub(crate) fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let pattern = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        let mut expanded = String::with_capacity(content.len());
        let mut tail = 0;
        for reference in pattern.captures_iter(content) {
            let (Some(whole), Some(name)) = (reference.get(0), reference.get(1)) else {
                continue;
            };
            let value = std::env::var(name.as_str())
                .map_err(|_| ConfigError::EnvVarNotSet(name.as_str().to_string()))?;
            expanded.push_str(&content[tail..whole.start()]);
            expanded.push_str(&value);
            tail = whole.end();
        }
        expanded.push_str(&content[tail..]);
        Ok(expanded)
    }

    /// Expand shell-style paths (e.g., `~/.jobfill`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).into_owned()
    }

    /// Expand a configured path in place of a `PathBuf`.
    pub fn expand_pathbuf(path: &Path) -> PathBuf {
        PathBuf::from(Self::expand_path(&path.to_string_lossy()))
    }

    /// `~/.jobfill`, the home of logs, outcomes and the default config.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_default().join(".jobfill")
    }
}
