use std::collections::HashMap;
use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".language-memo";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "language_pairs.db";
/// Log file written next to the database.
const LOG_FILE_NAME: &str = "language-memo.log";
/// Environment variable that overrides the database location.
pub const DB_PATH_ENV: &str = "LANGUAGE_MEMO_DB";

/// Resolved file locations for a run of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHomeDirectory,
    #[error("{0} is set but empty")]
    EmptyOverride(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let db_path = match env_map.get(DB_PATH_ENV) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::EmptyOverride(DB_PATH_ENV))
            }
            Some(raw) => PathBuf::from(raw.trim()),
            None => default_db_path()?,
        };

        let log_path = db_path
            .parent()
            .map(|dir| dir.join(LOG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME));

        Ok(Self { db_path, log_path })
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_places_log_next_to_database() {
        let mut env = HashMap::new();
        env.insert(DB_PATH_ENV.to_string(), "/tmp/memo/pairs.db".to_string());

        let config = Config::from_env_map(env).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/memo/pairs.db"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/memo/language-memo.log"));
    }

    #[test]
    fn empty_override_is_rejected() {
        let mut env = HashMap::new();
        env.insert(DB_PATH_ENV.to_string(), "  ".to_string());

        assert!(matches!(
            Config::from_env_map(env),
            Err(ConfigError::EmptyOverride(DB_PATH_ENV))
        ));
    }

    #[test]
    fn default_lives_under_home_directory() {
        // Skipped on hosts without a resolvable home directory.
        let Some(base_dirs) = BaseDirs::new() else {
            return;
        };
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(
            config.db_path,
            base_dirs
                .home_dir()
                .join(".language-memo")
                .join("language_pairs.db")
        );
    }
}
