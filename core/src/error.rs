use crate::DocId;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    /// A persisted artifact required to serve queries does not exist.
    #[error("missing index artifact: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// `meta.json` was written by a build with a different artifact layout.
    #[error("incompatible index artifacts: format version {found}, expected {expected}")]
    IncompatibleArtifact { found: u32, expected: u32 },

    /// Documents must reach the index builder in strictly ascending id order.
    #[error("document {doc_id} added after document {previous}; ids must be strictly ascending")]
    UnsortedDocument { doc_id: DocId, previous: DocId },

    /// Refinement field name outside the fixed field set.
    #[error("unknown refinement field: {0}")]
    UnknownField(String),

    /// Refinement input not of the form `field:value`.
    #[error("malformed refinement criterion: {0:?}")]
    MalformedCriterion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
