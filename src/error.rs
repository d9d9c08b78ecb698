// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MlogError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Log ID {0} not found")]
    NotFound(i64),

    #[error("Editor '{program}' failed: {reason}. Set the EDITOR or VISUAL environment variable to a working editor")]
    Editor { program: String, reason: String },

    #[error("Storage integrity violated: {0}")]
    Integrity(String),

    #[error("Database Error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl MlogError {
    /// Process exit status for this error, one per error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            MlogError::Validation(_) => 65,
            MlogError::TagNotFound(_) => 66,
            MlogError::NotFound(_) => 68,
            MlogError::Editor { .. } => 69,
            MlogError::Integrity(_) => 70,
            MlogError::Io(_) => 71,
            MlogError::Storage(_) => 74,
        }
    }

    pub(crate) fn editor(program: &str, reason: impl Into<String>) -> Self {
        MlogError::Editor {
            program: program.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MlogError>;
