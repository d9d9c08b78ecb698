// src/logging.rs

//! Logger bootstrap for the command line tool.
//!
//! Records go to stderr so they never mix with command output. `RUST_LOG`
//! takes precedence over the level chosen here.

use flexi_logger::{Logger, LoggerHandle};
use log::debug;

/// Level used when neither `--verbose` nor `--log-level` is given.
pub const DEFAULT_LEVEL: &str = "warn";

/// Starts the logger at `level`. Keep the returned handle alive until exit.
pub fn init_logging(level: &str) -> Result<LoggerHandle, String> {
    let level = normalize_level(level)?;
    let handle = Logger::try_with_env_or_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;
    debug!(
        "event=app_start module=logging status=ok version={}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

/// Normalizes a level name to what `log` understands.
pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}
