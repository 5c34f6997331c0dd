#![forbid(unsafe_code)]

//! Revision records.
//!
//! A [`Revision`] is one historical version of a record, linked to its
//! predecessor through an optional parent id. Records arrive from an
//! external history loader as camelCase JSON; the layout engine consumes
//! them read-only.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One historical version of a record.
///
/// # Ordering precondition
///
/// `time` is compared as a plain string. Callers must supply canonical,
/// zero-padded ISO-8601 timestamps; non-canonical values will silently
/// misorder rows. The engine does not parse or repair timestamps.
///
/// # Example
///
/// ```
/// use revlane_core::Revision;
///
/// let rev = Revision::new("r2", "2024-01-02T09:30:00Z")
///     .with_parent("r1")
///     .with_author("mika");
///
/// assert_eq!(rev.parent_id.as_deref(), Some("r1"));
/// assert_eq!(rev.resolved_id(0), "r2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Revision {
    /// Identity, if the source record carried one.
    ///
    /// Records without an id are still laid out; the engine substitutes a
    /// positional placeholder via [`resolved_id`](Self::resolved_id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Predecessor id, or `None` for a history root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Lexically-orderable timestamp (see the ordering precondition above).
    pub time: String,
    /// Display metadata, opaque to the layout engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Display metadata, opaque to the layout engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Revision {
    /// Create a revision with an id and timestamp.
    #[must_use]
    pub fn new(id: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            time: time.into(),
            ..Self::default()
        }
    }

    /// Create a revision without an identity (placeholder assigned at layout).
    #[must_use]
    pub fn unidentified(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            ..Self::default()
        }
    }

    /// Set the predecessor id.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the display status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the display author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Resolve this revision's identity.
    ///
    /// Returns the record's own id when present, otherwise a positional
    /// placeholder derived from `index` (the record's position in the
    /// window). The placeholder is a pure function of the index, so
    /// repeated calls over the same window resolve identically; it is
    /// unique within one call as long as real ids do not use the `#`
    /// prefix.
    #[must_use]
    pub fn resolved_id(&self, index: usize) -> Cow<'_, str> {
        match &self.id {
            Some(id) => Cow::Borrowed(id.as_str()),
            None => Cow::Owned(format!("#{index}")),
        }
    }
}
