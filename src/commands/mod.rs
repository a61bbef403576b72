//! Command implementations
//!
//! Commands are organized into two categories following Git's architecture:
//!
//! - `plumbing`: Low-level commands for direct object and index access
//!   (hash-object, cat-file, write-tree, ls-files)
//! - `porcelain`: User-facing commands for version control workflows
//!   (init, add, status, commit)
//!
//! Plumbing commands provide building blocks, while porcelain commands compose
//! them into higher-level operations.

pub mod plumbing;
pub mod porcelain;

#[cfg(test)]
pub(crate) mod fixtures;
