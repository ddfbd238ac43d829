//! Branch payload: the attributes carried by one node of the outline.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority level of a branch, always within `[0, 6]`.
///
/// Constructed via [`Priority::new`], which clamps out-of-range input
/// instead of rejecting it. Wire decoding is strict: a value above 6
/// fails deserialization rather than being silently corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 6;

    /// Clamp `level` into `[0, 6]`.
    pub fn new(level: i64) -> Self {
        Self(level.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(0)
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(format!("priority {} exceeds maximum {}", value, Self::MAX));
        }
        Ok(Self(value))
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attributes of one branch in the outline.
///
/// `description` holds raw text; indentation is applied by the renderer.
/// `date` is a free-form string, no calendar validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub title: String,
    pub description: String,
    pub tags: BTreeSet<String>,
    pub date: String,
    pub priority: Priority,
}

impl Branch {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            tags: BTreeSet::new(),
            date: String::new(),
            priority,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Idempotent: adding an existing tag is a no-op.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    /// No-op when the tag is absent.
    pub fn unset_tag(&mut self, tag: &str) {
        self.tags.remove(tag);
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    /// Clamps to `[0, 6]`.
    pub fn set_priority(&mut self, level: i64) {
        self.priority = Priority::new(level);
    }
}
