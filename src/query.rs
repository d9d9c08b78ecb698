// src/query.rs

use crate::db::{self, Session};
use crate::error::{MlogError, Result};
use crate::models::{self, Log, TagCount};
use crate::tags::{self, Resolve};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;

/// Criteria for `list_logs`. Every criterion left unset matches all logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// A log must carry every one of these tags.
    pub tags: Vec<String>,
    /// Case-insensitive substring of the message.
    pub keyword: Option<String>,
    /// Inclusive upper bound on the log date.
    pub before: Option<DateTime<Utc>>,
    /// Inclusive lower bound on the log date.
    pub after: Option<DateTime<Utc>>,
}

impl LogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn before(mut self, date: DateTime<Utc>) -> Self {
        self.before = Some(date);
        self
    }

    pub fn after(mut self, date: DateTime<Utc>) -> Self {
        self.after = Some(date);
        self
    }

    fn matches_keyword(&self, message: &str) -> bool {
        match self.keyword.as_deref() {
            Some(keyword) if !keyword.is_empty() => message
                .to_lowercase()
                .contains(&keyword.to_lowercase()),
            _ => true,
        }
    }
}

/// Lists the logs matching `filter` in id order.
///
/// Unknown tag names fail the whole call with `TagNotFound`; they are never
/// created here.
pub fn list_logs(session: &Session, filter: &LogFilter) -> Result<Vec<Log>> {
    let conn = session.conn();
    for bound in [&filter.before, &filter.after].into_iter().flatten() {
        models::check_date(bound)?;
    }
    let tags = tags::resolve_all(conn, filter.tags.as_slice(), Resolve::LookupOnly)?;

    let mut query = String::from("SELECT id, date, message FROM logs WHERE 1 = 1 ");
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if !tags.is_empty() {
        let placeholders = vec!["?"; tags.len()].join(",");
        query.push_str(&format!(
            "AND id IN (SELECT log_id FROM log_tags WHERE tag_id IN ({}) \
             GROUP BY log_id HAVING COUNT(DISTINCT tag_id) = ?) ",
            placeholders
        ));
        for tag in &tags {
            params.push(Box::new(tag.id));
        }
        params.push(Box::new(tags.len() as i64));
    }

    if let Some(before) = &filter.before {
        query.push_str("AND date <= ? ");
        params.push(Box::new(db::format_timestamp(before)));
    }

    if let Some(after) = &filter.after {
        query.push_str("AND date >= ? ");
        params.push(Box::new(db::format_timestamp(after)));
    }

    query.push_str("ORDER BY id ASC");

    let mut stmt = conn.prepare(&query)?;
    let rows = stmt
        .query_map(
            rusqlite::params_from_iter(params.iter().map(|b| b.as_ref())),
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Tags are only loaded for rows that pass the keyword check.
    let mut logs = Vec::with_capacity(rows.len());
    for (id, date, message) in rows {
        if filter.matches_keyword(&message) {
            logs.push(db::build_log(conn, id, &date, message)?);
        }
    }

    debug!(
        "event=logs_list module=query status=ok tags={} results={}",
        tags.len(),
        logs.len()
    );
    Ok(logs)
}

/// Every tag with the number of logs carrying it.
pub fn list_tags(session: &Session) -> Result<Vec<TagCount>> {
    db::tag_counts(session.conn())
}

/// Parses a user supplied date or timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS` and
/// `YYYY-MM-DD`, optionally wrapped in brackets. Values without an offset are
/// read as UTC; a bare date means midnight.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let s = input.trim().trim_start_matches('[').trim_end_matches(']').trim();

    let parsed = DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .map(|naive| naive.and_utc())
        });
    if let Some(dt) = parsed {
        models::check_date(&dt)?;
        return Ok(dt);
    }

    Err(MlogError::Validation(format!(
        "Invalid date '{}'. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
        input
    )))
}
