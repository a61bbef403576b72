//! A minimal, git-compatible version control core
//!
//! - `areas`: On-disk owners (object database, index, refs, workspace)
//! - `artifacts`: Object, index and status data types with their codecs
//! - `commands`: Plumbing and porcelain operations on a `Repository`
//! - `errors`: Failure taxonomy carried inside `anyhow::Error`

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
