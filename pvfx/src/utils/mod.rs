//! Shared utilities for the pvfx CLI

pub mod format;
pub mod parse;
pub mod progress;
pub mod table;

pub use format::*;
pub use parse::*;
pub use progress::*;
pub use table::*;
