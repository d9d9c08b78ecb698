// src/commands.rs

use crate::cli::Commands;
use mlog::config::Config;
use mlog::error::{MlogError, Result};
use mlog::journal;
use mlog::{parse_timestamp, ExternalEditor, Log, LogFilter, LogId, Session, TextEditor};
use std::collections::BTreeSet;
use std::io::{self, Read, Write};
use std::path::Path;

/// Runs one command inside `session`. The caller commits or rolls back.
pub fn dispatch(session: &Session, config: &Config, command: Option<Commands>) -> Result<()> {
    let editor = ExternalEditor::new(config.editor.clone());
    match command.unwrap_or(Commands::List {
        after: None,
        before: None,
        tags: Vec::new(),
        search: None,
    }) {
        Commands::List {
            after,
            before,
            tags,
            search,
        } => handle_list(session, after, before, tags, search),
        Commands::Add {
            message,
            input_file,
            tags,
            date,
        } => handle_add(session, &editor, message, input_file.as_deref(), tags, date),
        Commands::Edit { id, tags } => handle_edit(session, &editor, id, tags),
        Commands::Delete { ids, yes } => handle_delete(session, &ids, yes),
        Commands::Tags => handle_tags(session),
    }
}

/// 处理 'list' 命令
fn handle_list(
    session: &Session,
    after: Option<String>,
    before: Option<String>,
    tags: Vec<String>,
    search: Option<String>,
) -> Result<()> {
    let mut filter = LogFilter::new().with_tags(tags);
    if let Some(a) = after {
        filter = filter.after(parse_timestamp(&a)?);
    }
    if let Some(b) = before {
        filter = filter.before(parse_timestamp(&b)?);
    }
    if let Some(keyword) = search {
        filter = filter.with_keyword(keyword);
    }

    let logs = journal::list_logs(session, &filter)?;
    if logs.is_empty() {
        println!("No logs found.");
        return Ok(());
    }
    for log in &logs {
        print_log(log);
    }
    Ok(())
}

fn print_log(log: &Log) {
    let formatted_time = log.date.format("%Y-%m-%d %H:%M:%S");
    println!("> {:>6} :: [{}] {}", log.id, formatted_time, "─".repeat(40));
    println!("{}", log.message);
    println!("<{}>", log.tag_names().join(", "));
    println!();
}

/// 处理 'add' 命令
fn handle_add(
    session: &Session,
    editor: &dyn TextEditor,
    message: Vec<String>,
    input_file: Option<&Path>,
    tags: Vec<String>,
    date: Option<String>,
) -> Result<()> {
    let date = date.as_deref().map(parse_timestamp).transpose()?;

    let content = if !message.is_empty() {
        message.join(" ")
    } else if let Some(path) = input_file {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(path)?
        }
    } else {
        editor.edit("")?
    };

    let log = journal::append_log_at(session, &content, tags.as_slice(), date)?;
    println!("✓ Log #{} recorded.", log.id);
    Ok(())
}

/// 处理 'edit' 命令
fn handle_edit(
    session: &Session,
    editor: &dyn TextEditor,
    id: LogId,
    tags: Option<Vec<String>>,
) -> Result<()> {
    let log = journal::edit_log(session, id, tags.as_deref(), editor)?;
    println!("✓ Log #{} updated.", log.id);
    Ok(())
}

/// Largest number of IDs one `a-b` range may expand to.
const MAX_RANGE_LEN: LogId = 10_000;

/// 解析ID范围字符串 (例如 "1,3,5-7")
fn parse_id_range(s: &str) -> Result<Vec<LogId>> {
    let mut ids = BTreeSet::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.contains('-') {
            let mut range_parts = part.splitn(2, '-');
            let start_str = range_parts.next().unwrap_or("").trim();
            let end_str = range_parts.next().unwrap_or("").trim();

            if start_str.is_empty() || end_str.is_empty() {
                return Err(MlogError::Validation(format!("Invalid range: {}", part)));
            }
            let start: LogId = parse_id(start_str)?;
            let end: LogId = parse_id(end_str)?;

            if start > end {
                return Err(MlogError::Validation(format!(
                    "Start of range {} cannot be greater than end {}",
                    start, end
                )));
            }
            if end.saturating_sub(start) >= MAX_RANGE_LEN {
                return Err(MlogError::Validation(format!(
                    "Range {} covers more than {} IDs",
                    part, MAX_RANGE_LEN
                )));
            }
            ids.extend(start..=end);
        } else if !part.is_empty() {
            ids.insert(parse_id(part)?);
        }
    }
    Ok(ids.into_iter().collect())
}

fn parse_id(s: &str) -> Result<LogId> {
    s.parse()
        .map_err(|_| MlogError::Validation(format!("Invalid ID: {}", s)))
}

/// 处理 'delete' 命令
fn handle_delete(session: &Session, ids_str: &str, yes: bool) -> Result<()> {
    let ids = parse_id_range(ids_str)?;
    if ids.is_empty() {
        return Err(MlogError::Validation(
            "No valid log IDs to delete.".to_string(),
        ));
    }

    // Look every target up first so a bad ID deletes nothing.
    for &id in &ids {
        journal::get_log(session, id)?;
    }

    if !yes {
        print!("You are about to permanently delete log IDs {:?}. Confirm? (y/N): ", ids);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    for &id in &ids {
        journal::delete_log(session, id)?;
    }
    println!("✓ Successfully deleted {} log(s).", ids.len());
    Ok(())
}

/// 处理 'tags' 命令
fn handle_tags(session: &Session) -> Result<()> {
    for entry in journal::list_tags(session)? {
        println!("{:>6}: {}", entry.count, entry.tag.name);
    }
    Ok(())
}
