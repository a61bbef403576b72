//! Data structures and codecs
//!
//! - `index`: Index file entries, header and checksum
//! - `objects`: Object types (blob, tree, commit) and object IDs
//! - `status`: Result of comparing the working directory with the index

pub mod index;
pub mod objects;
pub mod status;
