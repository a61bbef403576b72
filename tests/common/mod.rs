#![allow(dead_code)]

pub mod command;
pub mod file;

/// Blob ID of `hello`
pub const HELLO_BLOB_ID: &str = "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0";

/// Flat tree holding `a.txt` with the content `hello`
pub const HELLO_TREE_ID: &str = "65829399355e5929e44741d637d52c614ac21bc3";
