//! Core repository components
//!
//! This module contains the on-disk owners of a repository:
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area file (load, save, add)
//! - `refs`: HEAD and the branch it points to
//! - `repository`: The repository root tying the other areas together
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
