//! pvfx library
//!
//! Command definitions and helpers behind the `pvfx` binary.

pub mod cli;
pub mod commands;
pub mod scene;
pub mod utils;
