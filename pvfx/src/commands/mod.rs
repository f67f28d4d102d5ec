//! Command implementations for each effect

pub mod smoke;
