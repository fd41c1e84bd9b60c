//! Command implementations for the autosig CLI

pub mod generate;
pub mod validate;
pub mod version;
