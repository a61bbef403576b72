//! Object types and operations
//!
//! All content is stored as objects identified by SHA-1 hashes:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Flat directory listing (modes, names, and object IDs)
//! - **Commit**: Snapshot with metadata (author, message, parent commit, tree)
//!
//! Every object is hashed and stored in the framed form `<type> <size>\0<content>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in binary format
pub const OBJECT_ID_RAW_LENGTH: usize = 20;

/// Shortest prefix accepted when looking an object up
pub const MIN_PREFIX_LENGTH: usize = 2;
