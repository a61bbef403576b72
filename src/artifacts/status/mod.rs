//! Working tree status
//!
//! The comparison of the working directory against the index, consumed by
//! `status` presentation.

pub mod workspace_changes;
