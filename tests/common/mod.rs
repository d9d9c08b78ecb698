#![allow(dead_code)]

use assert_cmd::Command;
use mlog::{Result, TextEditor};
use std::path::Path;

/// `mlog` binary with a clean environment pointed at `db_path`.
#[allow(deprecated)]
pub fn mlog_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mlog").unwrap();
    cmd.env_remove("MLOG_DB");
    cmd.env_remove("EDITOR");
    cmd.env_remove("VISUAL");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--db-path").arg(db_path);
    cmd
}

/// Editor stand-in that records the seed and returns fixed text.
pub struct FakeEditor {
    pub output: String,
    pub seen: std::cell::RefCell<Option<String>>,
}

impl FakeEditor {
    pub fn returning(output: &str) -> Self {
        FakeEditor {
            output: output.to_string(),
            seen: std::cell::RefCell::new(None),
        }
    }
}

impl TextEditor for FakeEditor {
    fn edit(&self, seed: &str) -> Result<String> {
        *self.seen.borrow_mut() = Some(seed.to_string());
        Ok(self.output.clone())
    }
}

/// Writes an executable shell script that acts as an editor.
#[cfg(unix)]
pub fn editor_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}
