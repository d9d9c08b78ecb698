// src/tags.rs

//! Get-or-create access to tags by their unique name.

use crate::db;
use crate::error::{MlogError, Result};
use crate::models::{NewTag, Tag};
use log::debug;
use rusqlite::Connection;

/// How `resolve_all` treats a name with no stored tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolve {
    /// Create the missing tag (adding and editing logs).
    Create,
    /// Fail with `TagNotFound` (filtering).
    LookupOnly,
}

/// Finds the tag with exactly this name.
pub fn lookup(conn: &Connection, name: &str) -> Result<Option<Tag>> {
    let new_tag = NewTag::new(name)?;
    let mut found = db::find_tags_by_name(conn, new_tag.name())?;
    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        n => Err(MlogError::Integrity(format!(
            "{} tags share the name '{}'",
            n,
            new_tag.name()
        ))),
    }
}

/// Returns the tag called `name`, persisting it first when it does not exist.
pub fn get_or_create(conn: &Connection, name: &str) -> Result<Tag> {
    if let Some(tag) = lookup(conn, name)? {
        return Ok(tag);
    }
    let new_tag = NewTag::new(name)?;
    let tag = db::insert_tag(conn, new_tag.name())?;
    debug!("event=tag_create module=tags status=ok tag_id={}", tag.id);
    Ok(tag)
}

/// Resolves every name. Repeated names yield one tag; input order is kept.
pub fn resolve_all<S: AsRef<str>>(conn: &Connection, names: &[S], mode: Resolve) -> Result<Vec<Tag>> {
    let mut tags: Vec<Tag> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        let tag = match mode {
            Resolve::Create => get_or_create(conn, name)?,
            Resolve::LookupOnly => {
                lookup(conn, name)?.ok_or_else(|| MlogError::TagNotFound(name.trim().to_string()))?
            }
        };
        if !tags.iter().any(|t| t.id == tag.id) {
            tags.push(tag);
        }
    }
    Ok(tags)
}
