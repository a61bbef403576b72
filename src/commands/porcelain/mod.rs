//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `status`: Compare the working directory with the index
//! - `commit`: Create a new commit

pub mod add;
pub mod commit;
pub mod init;
pub mod status;
