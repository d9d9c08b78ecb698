// src/journal.rs

//! Journal operations exposed to the command line layer.
//!
//! Every function works inside the caller's `Session`; nothing here commits.
//! The caller commits on success and rolls back on error.

use crate::db::{self, Session};
use crate::editor::TextEditor;
use crate::error::{MlogError, Result};
use crate::models::{self, Log, LogId, NewLog, NewTag, TagCount};
use crate::query::{self, LogFilter};
use crate::tags::{self, Resolve};
use chrono::{DateTime, Utc};
use log::info;

/// Records a new log dated now. Missing tags are created.
pub fn append_log<S: AsRef<str>>(session: &Session, message: &str, tag_names: &[S]) -> Result<Log> {
    append_log_at(session, message, tag_names, None)
}

/// Records a new log with an explicit date (`None` means now).
pub fn append_log_at<S: AsRef<str>>(
    session: &Session,
    message: &str,
    tag_names: &[S],
    date: Option<DateTime<Utc>>,
) -> Result<Log> {
    let conn = session.conn();
    let message = non_empty_message(message)?;
    if let Some(date) = &date {
        models::check_date(date)?;
    }

    let mut new_log = NewLog::new(message, date);
    for tag in tags::resolve_all(conn, tag_names, Resolve::Create)? {
        new_log.add_tag(tag);
    }

    let id = db::insert_log(conn, &new_log)?;
    info!(
        "event=log_append module=journal status=ok log_id={} tags={}",
        id,
        new_log.tags().len()
    );
    get_log(session, id)
}

pub fn get_log(session: &Session, id: LogId) -> Result<Log> {
    db::get_log(session.conn(), id)?.ok_or(MlogError::NotFound(id))
}

pub fn list_logs(session: &Session, filter: &LogFilter) -> Result<Vec<Log>> {
    query::list_logs(session, filter)
}

pub fn list_tags(session: &Session) -> Result<Vec<TagCount>> {
    query::list_tags(session)
}

/// Removes a log and its tag associations. The tags themselves stay.
pub fn delete_log(session: &Session, id: LogId) -> Result<()> {
    if db::delete_log(session.conn(), id)? == 0 {
        return Err(MlogError::NotFound(id));
    }
    info!("event=log_delete module=journal status=ok log_id={}", id);
    Ok(())
}

/// Edits a log's message through `editor` and optionally replaces its tags.
///
/// With `new_tag_names` set, the old tag set is discarded entirely; with
/// `None` the tags are left untouched.
pub fn edit_log<S: AsRef<str>>(
    session: &Session,
    id: LogId,
    new_tag_names: Option<&[S]>,
    editor: &dyn TextEditor,
) -> Result<Log> {
    let conn = session.conn();
    let mut log = get_log(session, id)?;
    if let Some(names) = new_tag_names {
        for name in names {
            NewTag::new(name.as_ref())?;
        }
    }

    let edited = editor.edit(&log.message)?;
    log.message = non_empty_message(&edited)?.to_string();

    db::atomically(conn, "edit_log", || {
        db::update_log_message(conn, id, &log.message)?;
        if let Some(names) = new_tag_names {
            log.set_tags(tags::resolve_all(conn, names, Resolve::Create)?);
            db::replace_log_tags(conn, id, log.tags())?;
        }
        Ok(())
    })?;

    info!(
        "event=log_edit module=journal status=ok log_id={} retagged={}",
        id,
        new_tag_names.is_some()
    );
    get_log(session, id)
}

fn non_empty_message(message: &str) -> Result<&str> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(MlogError::Validation(
            "Log message cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_TAGS: &[&str] = &[];

    struct Replace(&'static str);

    impl TextEditor for Replace {
        fn edit(&self, _seed: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_append_trims_message() {
        let session = Session::open_in_memory().unwrap();
        let log = append_log(&session, "  hello \n", NO_TAGS).unwrap();
        assert_eq!(log.message, "hello");
    }

    #[test]
    fn test_append_rejects_empty_message() {
        let session = Session::open_in_memory().unwrap();
        assert!(matches!(
            append_log(&session, " \n\t", &["work"]),
            Err(MlogError::Validation(_))
        ));
        assert!(list_tags(&session).unwrap().is_empty());
    }

    #[test]
    fn test_edit_rejects_empty_result_and_keeps_message() {
        let session = Session::open_in_memory().unwrap();
        let log = append_log(&session, "original", NO_TAGS).unwrap();
        let err = edit_log(&session, log.id, None::<&[&str]>, &Replace("   ")).unwrap_err();
        assert!(matches!(err, MlogError::Validation(_)));
        assert_eq!(get_log(&session, log.id).unwrap().message, "original");
    }

    #[test]
    fn test_edit_with_bad_tag_name_skips_editor() {
        struct Unreachable;
        impl TextEditor for Unreachable {
            fn edit(&self, _seed: &str) -> Result<String> {
                panic!("editor must not run");
            }
        }

        let session = Session::open_in_memory().unwrap();
        let log = append_log(&session, "original", &["work"]).unwrap();
        let err = edit_log(&session, log.id, Some(&["ok", " "][..]), &Unreachable).unwrap_err();
        assert!(matches!(err, MlogError::Validation(_)));
        assert_eq!(get_log(&session, log.id).unwrap().tag_names(), vec!["work"]);
    }

    #[test]
    fn test_append_rejects_dates_outside_four_digit_years() {
        use chrono::TimeZone;

        let session = Session::open_in_memory().unwrap();
        for year in [10000, -1] {
            let date = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
            let err = append_log_at(&session, "far", &["era"], Some(date)).unwrap_err();
            assert!(matches!(err, MlogError::Validation(_)));
        }
        assert!(list_logs(&session, &LogFilter::new()).unwrap().is_empty());
        assert!(list_tags(&session).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let session = Session::open_in_memory().unwrap();
        assert!(matches!(delete_log(&session, 42), Err(MlogError::NotFound(42))));
    }
}
