//! Error types for cluster search.

use thiserror::Error;

/// Errors that can occur before or during a cluster search.
///
/// Everything here is detected up front: once validation passes, the search
/// itself is pure arithmetic and cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Distance threshold is zero, negative, NaN or infinite.
    #[error("invalid threshold: expected a finite positive distance in meters, got {0}")]
    InvalidThreshold(f64),

    /// A point carries a missing or unusable coordinate.
    #[error("malformed point #{index} in category '{category}': {reason}")]
    MalformedPoint {
        /// Category the point was listed under.
        category: String,
        /// Position of the point within its category.
        index: usize,
        /// What is wrong with the coordinate.
        reason: String,
    },

    /// The same category name appears twice.
    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),

    /// A catalog document could not be parsed.
    #[error("catalog parse error: {0}")]
    Catalog(String),
}

impl SearchError {
    /// Create a MalformedPoint error.
    pub fn malformed_point(
        category: impl Into<String>,
        index: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedPoint {
            category: category.into(),
            index,
            reason: reason.into(),
        }
    }

    /// Create a DuplicateCategory error.
    pub fn duplicate_category(category: impl Into<String>) -> Self {
        Self::DuplicateCategory(category.into())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Catalog(err.to_string())
    }
}
