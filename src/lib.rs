//! # autosig
//!
//! Generates a System Implementation Guide: a plain-text report built by
//! walking a declarative outline of sections and filling each one with static
//! text, local or remote command output, or files from a collector capture.
//!
//! ## Quick Start
//!
//! ```bash
//! # Live system, abort on the first failing command
//! autosig -c autosig.conf
//!
//! # From a collector capture, keep going past failures
//! autosig -c autosig.conf -C /var/tmp/collector -i
//! ```

pub mod acquire;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod exec;
pub mod host;
pub mod outline;
pub mod report;
pub mod walker;

pub use cli::{Cli, Output};
pub use config::{ReportContext, Settings};
pub use error::ReportError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
