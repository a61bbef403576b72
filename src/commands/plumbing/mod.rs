//! Plumbing commands (low-level operations)
//!
//! Plumbing commands provide direct access to the object database and the
//! index. They're primarily used for scripting and as building blocks for
//! porcelain commands.
//!
//! ## Commands
//!
//! - `hash-object`: Compute a blob ID and optionally store the blob
//! - `cat-file`: Print an object's content or kind
//! - `write-tree`: Store the index as a tree object
//! - `ls-files`: List the index entries

pub mod cat_file;
pub mod hash_object;
pub mod ls_files;
pub mod write_tree;
