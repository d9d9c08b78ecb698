// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "mlog - a personal journal for the command line",
    long_about = "mlog keeps free-text journal entries with optional tags in a single local database file. Entries can be listed and filtered by tags, date range and keyword, edited in your editor, or deleted."
)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "DATABASE_PATH", help = "Database file to use instead of ~/.mlog-db (or $MLOG_DB)")]
    pub db_path: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log diagnostics to stderr")]
    pub verbose: bool,

    #[arg(long, global = true, value_name = "LEVEL", help = "Diagnostic level: trace, debug, info, warn, error or off")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lists log entries. This is the default command.
    #[command(visible_aliases = ["l", "ls", "ll"])]
    List {
        #[arg(short, long, value_name = "AFTER_DATE", help = "Only logs at or after this (ISO) date")]
        after: Option<String>,

        #[arg(short, long, value_name = "BEFORE_DATE", help = "Only logs at or before this (ISO) date")]
        before: Option<String>,

        #[arg(short, long, num_args = 1.., value_delimiter = ',', help = "Only logs carrying every one of these tags")]
        tags: Vec<String>,

        #[arg(short, long, help = "Only logs whose message contains this keyword (case-insensitive)")]
        search: Option<String>,
    },

    /// Creates a new log entry.
    /// The message is taken from the arguments, from --input-file, or from the editor.
    #[command(visible_alias = "a")]
    Add {
        /// Message text.
        message: Vec<String>,

        #[arg(short, long, value_name = "INPUT_FILE", help = "File whose contents are logged ('-' reads stdin)")]
        input_file: Option<PathBuf>,

        #[arg(short, long, num_args = 1.., value_delimiter = ',', help = "Tags for the new log")]
        tags: Vec<String>,

        #[arg(long, help = "Date of the entry (ISO format); defaults to now")]
        date: Option<String>,
    },

    /// Edits an existing log entry in the editor ($EDITOR, then $VISUAL).
    #[command(visible_alias = "e")]
    Edit {
        #[arg(help = "The numeric ID of the log entry to edit")]
        id: i64,

        #[arg(short, long, num_args = 1.., value_delimiter = ',', help = "Replace the tags of the entry with these")]
        tags: Option<Vec<String>>,
    },

    /// Deletes one or more log entries.
    #[command(visible_aliases = ["del", "d"], verbatim_doc_comment)]
    Delete {
        /// A list of log IDs to delete.
        /// Can be a single ID, comma-separated IDs, or a range.
        /// Examples:
        ///   mlog del 5          (deletes log #5)
        ///   mlog del 3,5,8      (deletes logs #3, #5, #8)
        ///   mlog del 7-9        (deletes logs #7, #8, #9)
        ///   mlog del 3,7-9,12   (deletes logs #3, #7, #8, #9, #12)
        #[arg(value_name = "ID_LIST")]
        ids: String,

        #[arg(short, long, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Lists every tag with the number of logs carrying it.
    #[command(visible_aliases = ["lt", "list-tags"])]
    Tags,
}
