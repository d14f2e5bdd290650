//! Runtime settings. Values come from environment variables (optionally seeded
//! from a `.env` file) and fall back to a data directory under the user's home.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".personal-library";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library.sqlite";
const LOG_FILE_NAME: &str = "personal-library.log";
const DEFAULT_LOG_LEVEL: &str = "info";

pub const DATABASE_PATH_VAR: &str = "LIBRARY_DATABASE_PATH";
pub const EXPORT_DIR_VAR: &str = "LIBRARY_EXPORT_DIR";
pub const LOG_LEVEL_VAR: &str = "LIBRARY_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_path: PathBuf,
    /// Directory that receives `books.json` on export.
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    /// `EnvFilter` directive, e.g. `info` or `personal_library=debug`.
    pub log_level: String,
}

impl Settings {
    /// Load `.env` if present, then resolve every setting from the process
    /// environment.
    pub fn load() -> Result<Self> {
        // A missing `.env` is the normal case.
        let _ = dotenvy::dotenv();

        let data_dir = default_data_dir()?;
        Ok(Self::resolve(data_dir, |key| env::var(key).ok()))
    }

    /// Build settings from an arbitrary variable lookup. Blank values count as
    /// unset.
    pub fn resolve<F>(data_dir: PathBuf, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            database_path: var(DATABASE_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(DB_FILE_NAME)),
            export_dir: var(EXPORT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.clone()),
            log_file: data_dir.join(LOG_FILE_NAME),
            log_level: var(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Resolve the absolute path to the application data directory inside the
/// user's home.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_live_in_data_dir() {
        let data_dir = PathBuf::from("/home/reader/.personal-library");
        let settings = Settings::resolve(data_dir.clone(), lookup(&[]));
        assert_eq!(settings.database_path, data_dir.join("library.sqlite"));
        assert_eq!(settings.export_dir, data_dir);
        assert_eq!(settings.log_file, data_dir.join("personal-library.log"));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::resolve(
            PathBuf::from("/data"),
            lookup(&[
                (DATABASE_PATH_VAR, "/srv/books.db"),
                (EXPORT_DIR_VAR, "/tmp/exports"),
                (LOG_LEVEL_VAR, "personal_library=debug"),
            ]),
        );
        assert_eq!(settings.database_path, PathBuf::from("/srv/books.db"));
        assert_eq!(settings.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(settings.log_level, "personal_library=debug");
    }

    #[test]
    fn blank_values_are_ignored() {
        let settings = Settings::resolve(
            PathBuf::from("/data"),
            lookup(&[(DATABASE_PATH_VAR, "  "), (LOG_LEVEL_VAR, "")]),
        );
        assert_eq!(settings.database_path, PathBuf::from("/data/library.sqlite"));
        assert_eq!(settings.log_level, "info");
    }
}
