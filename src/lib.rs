//! mlog - a personal journal kept in a local SQLite file.
//!
//! Logs are free-text entries with a date and any number of tags. The
//! library owns storage, tag registration, filtering and the editor round
//! trip; the `mlog` binary is a thin command line layer on top.

pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod journal;
pub mod logging;
pub mod models;
pub mod query;
pub mod tags;

pub use db::Session;
pub use editor::{ExternalEditor, TextEditor};
pub use error::{MlogError, Result};
pub use models::{Log, LogId, NewLog, NewTag, Tag, TagCount, TagId};
pub use query::{parse_timestamp, LogFilter};
pub use tags::Resolve;
