// src/models.rs

use crate::error::{MlogError, Result};
use chrono::{DateTime, Datelike, Utc};

pub type LogId = i64;
pub type TagId = i64;

/// A stored tag. Names are globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// A validated tag name that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    name: String,
}

impl NewTag {
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MlogError::Validation(
                "Tag name cannot be empty".to_string(),
            ));
        }
        Ok(NewTag {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Years a date may fall in. Stored dates are fixed-width text, so the year
/// must have exactly four digits.
pub const DATE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Rejects dates that cannot be stored or compared as text.
pub fn check_date(date: &DateTime<Utc>) -> Result<()> {
    if !DATE_YEARS.contains(&date.year()) {
        return Err(MlogError::Validation(format!(
            "Date {} is out of range; years must be between {} and {}",
            date,
            DATE_YEARS.start(),
            DATE_YEARS.end()
        )));
    }
    Ok(())
}

/// A journal entry that is about to be inserted.
#[derive(Debug, Clone)]
pub struct NewLog {
    pub date: DateTime<Utc>,
    pub message: String,
    tags: Vec<Tag>,
}

impl NewLog {
    /// `date` falls back to the current time.
    pub fn new(message: &str, date: Option<DateTime<Utc>>) -> Self {
        NewLog {
            date: date.unwrap_or_else(Utc::now),
            message: message.to_string(),
            tags: Vec::new(),
        }
    }

    /// Returns `false` when the tag was already attached.
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        add_unique(&mut self.tags, tag)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

/// A stored journal entry together with its tags.
///
/// The tag list is a snapshot read from the association table; it holds no
/// link back to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub id: LogId,
    pub date: DateTime<Utc>,
    pub message: String,
    tags: Vec<Tag>,
}

impl Log {
    pub(crate) fn from_parts(id: LogId, date: DateTime<Utc>, message: String, tags: Vec<Tag>) -> Self {
        let mut log = Log {
            id,
            date,
            message,
            tags: Vec::new(),
        };
        log.set_tags(tags);
        log
    }

    pub fn add_tag(&mut self, tag: Tag) -> bool {
        add_unique(&mut self.tags, tag)
    }

    /// Replaces the whole tag set. Duplicates are dropped.
    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        self.tags.clear();
        for tag in tags {
            add_unique(&mut self.tags, tag);
        }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }
}

/// A tag with the number of logs that carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: Tag,
    pub count: usize,
}

fn add_unique(tags: &mut Vec<Tag>, tag: Tag) -> bool {
    if tags.iter().any(|t| t.id == tag.id) {
        return false;
    }
    tags.push(tag);
    true
}
