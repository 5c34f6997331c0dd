#![forbid(unsafe_code)]

//! Render direction for row ordering.

use serde::{Deserialize, Serialize};

/// Direction in which rows are ordered by timestamp.
///
/// Wire values are `"asc"` and `"desc"`, matching the history loader's
/// query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest revision first (row 0 is the furthest ancestor).
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Newest revision first (row 0 is the latest revision).
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// Wire label for display and query strings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
