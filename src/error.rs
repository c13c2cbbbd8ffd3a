//! Error type shared by the report pipeline.

use thiserror::Error;

#[cfg(feature = "bookmarks")]
use crate::bookmarks::BookmarkError;

/// Errors surfaced while loading inputs or rendering a report.
///
/// Layout itself cannot fail; everything here comes from the drawing library,
/// the filesystem, or malformed JSON handed in by a collaborator.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no analysis available for property '{property_id}'")]
    MissingAnalysis { property_id: String },

    #[cfg(feature = "bookmarks")]
    #[error("failed to embed section bookmarks: {0}")]
    Bookmark(#[from] BookmarkError),
}

impl ReportError {
    pub(crate) fn pdf(err: impl std::fmt::Display) -> Self {
        Self::Pdf(err.to_string())
    }
}
