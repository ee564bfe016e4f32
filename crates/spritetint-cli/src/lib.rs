//! spritetint CLI library.
//!
//! Option merging and the command implementations behind the `spritetint`
//! binary.

pub mod commands;
pub mod config;
