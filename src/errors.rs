//! Failure taxonomy of the object store, the index and the commit builder
//!
//! Every variant is a local data-integrity or precondition failure. None of them
//! is transient, so they are surfaced to the caller unchanged. Operations return
//! `anyhow::Result` and raise these values inside the `anyhow::Error`, which lets
//! callers recover the kind with `downcast_ref::<CoreError>()`.

use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("no object or reference matches {0}")]
    NotFound(String),

    #[error("short object ID {prefix} is ambiguous ({} candidates)", candidates.len())]
    AmbiguousReference {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    #[error("object {oid} is corrupt: {reason}")]
    CorruptObject { oid: String, reason: String },

    #[error("reference {name} is corrupt: {reason}")]
    CorruptRef { name: String, reason: String },

    #[error("invalid object ID {0}")]
    InvalidObjectId(String),

    #[error("index checksum does not match value stored on disk")]
    InvalidChecksum,

    #[error("invalid index signature {0:?}")]
    InvalidSignature(Vec<u8>),

    #[error("unsupported index version {0}")]
    UnsupportedVersion(u32),

    #[error("index declares {declared} entries but contains {parsed}")]
    TruncatedIndex { declared: u32, parsed: u32 },

    #[error("path is too long to be staged ({0} bytes)")]
    PathTooLong(usize),

    #[error("nested path {0} cannot be written to a flat tree")]
    NestedPathUnsupported(String),

    #[error("author identity unknown: pass an author or set GIT_AUTHOR_NAME and GIT_AUTHOR_EMAIL")]
    MissingAuthorIdentity,
}

/// Extract the taxonomy kind from an `anyhow::Error`, if it carries one.
pub fn kind_of(error: &anyhow::Error) -> Option<&CoreError> {
    error.downcast_ref::<CoreError>()
}
