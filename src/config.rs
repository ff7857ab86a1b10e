//! Environment-driven configuration.
//!
//! | variable                  | default  |
//! |---------------------------|----------|
//! | `DATA_DIR`                | `./data` |
//! | `MEMORY_SHORT_TERM_LIMIT` | `50`     |
//!
//! A `.env` file in the working directory is loaded by the binary before
//! these are read.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::memory::store::DEFAULT_SHORT_TERM_LIMIT;
use crate::task::store::{MEMORY_DIR, TASKS_FILE};

const DATA_DIR_VAR: &str = "DATA_DIR";
const SHORT_TERM_LIMIT_VAR: &str = "MEMORY_SHORT_TERM_LIMIT";
const DEFAULT_DATA_DIR: &str = "data";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute data root.
    pub data_dir: PathBuf,
    /// Short-term memory window.
    pub short_term_limit: usize,
}

impl Config {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or the working directory
    /// is needed but unavailable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::from_lookup(|name| env::var(name).ok(), &cwd)
    }

    /// Builds a config from an arbitrary variable lookup, resolving relative
    /// paths against `cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error if `MEMORY_SHORT_TERM_LIMIT` is not a positive integer.
    pub fn from_lookup<F>(lookup: F, cwd: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let short_term_limit = match lookup(SHORT_TERM_LIMIT_VAR) {
            Some(raw) => parse_limit(&raw)?,
            None => DEFAULT_SHORT_TERM_LIMIT,
        };
        Ok(Self {
            data_dir: cwd.join(data_dir),
            short_term_limit,
        })
    }

    /// Replaces the data root; relative paths resolve against `cwd`.
    #[must_use]
    pub fn with_data_dir(mut self, dir: &Path, cwd: &Path) -> Self {
        self.data_dir = cwd.join(dir);
        self
    }

    /// `<data_dir>/tasks.json`.
    #[must_use]
    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    /// `<data_dir>/memory`.
    #[must_use]
    pub fn memory_dir(&self) -> PathBuf {
        self.data_dir.join(MEMORY_DIR)
    }
}

fn parse_limit(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        name: SHORT_TERM_LIMIT_VAR,
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(invalid("must be at least 1")),
        Ok(limit) => Ok(limit),
        Err(err) => Err(invalid(&err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned(), Path::new("/work"))
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/work/data"));
        assert_eq!(cfg.short_term_limit, 50);
        assert_eq!(cfg.tasks_file(), PathBuf::from("/work/data/tasks.json"));
        assert_eq!(cfg.memory_dir(), PathBuf::from("/work/data/memory"));
    }

    #[test]
    fn relative_and_absolute_data_dirs() {
        let relative = config(&[("DATA_DIR", "state")]).unwrap();
        assert_eq!(relative.data_dir, PathBuf::from("/work/state"));
        let absolute = config(&[("DATA_DIR", "/srv/tm")]).unwrap();
        assert_eq!(absolute.data_dir, PathBuf::from("/srv/tm"));
    }

    #[test]
    fn short_term_limit_must_be_positive() {
        let padded = config(&[("MEMORY_SHORT_TERM_LIMIT", " 12 ")]).unwrap();
        assert_eq!(padded.short_term_limit, 12);

        let err = config(&[("MEMORY_SHORT_TERM_LIMIT", "0")]).unwrap_err();
        assert!(err.to_string().contains("MEMORY_SHORT_TERM_LIMIT"));
        assert!(config(&[("MEMORY_SHORT_TERM_LIMIT", "lots")]).is_err());
    }

    #[test]
    fn cli_override_replaces_data_dir() {
        let cfg = config(&[("DATA_DIR", "state")])
            .unwrap()
            .with_data_dir(Path::new("other"), Path::new("/work"));
        assert_eq!(cfg.data_dir, PathBuf::from("/work/other"));
    }
}
