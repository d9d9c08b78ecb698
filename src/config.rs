// src/config.rs

use crate::error::{MlogError, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable overriding the store location.
pub const DB_ENV_VAR: &str = "MLOG_DB";
/// Store file name under the home directory.
pub const DEFAULT_DB_FILE: &str = ".mlog-db";
/// Editor used when neither `EDITOR` nor `VISUAL` is set.
pub const DEFAULT_EDITOR: &str = "vi";

/// Settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub editor: String,
}

impl Config {
    /// Resolves the settings from the command line value and the environment.
    pub fn resolve(db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path.or_else(|| env::var_os(DB_ENV_VAR).map(PathBuf::from)) {
            Some(path) => path,
            None => default_db_path()?,
        };
        Ok(Config {
            db_path,
            editor: resolve_editor(env::var("EDITOR").ok(), env::var("VISUAL").ok()),
        })
    }
}

/// `~/.mlog-db`.
pub fn default_db_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        MlogError::Validation(format!(
            "Home directory not found; pass --db-path or set {}",
            DB_ENV_VAR
        ))
    })?;
    Ok(home_dir.join(DEFAULT_DB_FILE))
}

/// `EDITOR` wins over `VISUAL`; blank values count as unset.
pub fn resolve_editor(editor: Option<String>, visual: Option<String>) -> String {
    [editor, visual]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}
