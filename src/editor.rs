// src/editor.rs

//! Round-trips text through an external editor program.

use crate::error::{MlogError, Result};
use log::{debug, warn};
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Anything that can turn seed text into edited text.
pub trait TextEditor {
    fn edit(&self, seed: &str) -> Result<String>;
}

/// Runs `<program> [args..] <temp-file>` and reads the file back afterwards.
///
/// The temp file is removed when the call returns, whether or not the
/// editor succeeded.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>) -> Self {
        ExternalEditor {
            command: command.into(),
        }
    }

    /// Splits the command into program and arguments. A command naming an
    /// existing file is taken whole, so paths with spaces keep working.
    fn parse_command(&self) -> (String, Vec<String>) {
        let trimmed = self.command.trim();
        if !trimmed.is_empty() && Path::new(trimmed).is_file() {
            return (trimmed.to_string(), Vec::new());
        }
        let mut parts = self.command.split_whitespace().map(str::to_string);
        match parts.next() {
            Some(program) => (program, parts.collect()),
            None => (crate::config::DEFAULT_EDITOR.to_string(), Vec::new()),
        }
    }
}

impl TextEditor for ExternalEditor {
    fn edit(&self, seed: &str) -> Result<String> {
        let (program, args) = self.parse_command();

        let mut temp_file = tempfile::Builder::new()
            .prefix("mlog-")
            .suffix(".txt")
            .tempfile()?;
        temp_file.write_all(seed.as_bytes())?;
        temp_file.flush()?;

        debug!("event=editor_launch module=editor status=start program={}", program);
        let status = Command::new(&program)
            .args(&args)
            .arg(temp_file.path())
            .status()
            .map_err(|e| {
                warn!("event=editor_launch module=editor status=error program={}", program);
                if e.kind() == std::io::ErrorKind::NotFound {
                    MlogError::editor(&program, "program not found")
                } else {
                    MlogError::editor(&program, e.to_string())
                }
            })?;

        if !status.success() {
            warn!(
                "event=editor_exit module=editor status=error program={} code={:?}",
                program,
                status.code()
            );
            return Err(MlogError::editor(
                &program,
                format!("exited with {}", status),
            ));
        }

        // Read by path: some editors replace the file instead of writing in place.
        let buf = std::fs::read_to_string(temp_file.path())?;
        debug!("event=editor_exit module=editor status=ok program={}", program);
        Ok(buf)
    }
}
