use thiserror::Error;

use crate::PageId;

/// Errors raised while decoding an index feed or assembling an [`Index`](crate::Index).
///
/// Query-time code never produces these; a loaded index is always searchable.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bucket key {0:?} must be exactly one character")]
    InvalidBucketKey(String),

    #[error("bucket {0:?} appears more than once after lowercasing")]
    DuplicateBucket(char),

    #[error("bucket {bucket:?}: posting {entry:?} has no '=' separator")]
    MissingSeparator { bucket: char, entry: String },

    #[error("bucket {bucket:?}: occurrence {entry:?} has unknown field tag")]
    UnknownFieldKind { bucket: char, entry: String },

    #[error("bucket {bucket:?}: occurrence {entry:?} has a non-numeric page id")]
    InvalidPageId { bucket: char, entry: String },

    #[error("occurrence references page {page_id} but the index has {pages} pages")]
    PageOutOfRange { page_id: PageId, pages: usize },

    #[error("page at position {position} carries id {id}")]
    MisnumberedPage { position: usize, id: PageId },
}
