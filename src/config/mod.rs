//! Run settings for autosig
//!
//! Settings control where the report goes and how sections are acquired.
//! They are layered with figment (see [`Settings::load`]) and then frozen into
//! a [`ReportContext`] that the walker reads for the rest of the run.

use crate::acquire::CommandTemplates;
use crate::error::ReportError;
use crate::outline::AcquisitionMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod core;
pub mod smart_load;


/// Complete run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub report: ReportSettings,
    pub execution: ExecutionSettings,
    pub commands: CommandSettings,
    pub cluster: ClusterSettings,
}

/// Report file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Directory the report is written to
    pub output_dir: PathBuf,

    /// File name prefix, followed by the host name(s)
    pub prefix: String,

    /// Mirror every write to stdout
    pub mirror_stdout: bool,

    /// Render a numbered contents list after the preamble
    #[serde(default)]
    pub contents: bool,

    /// Close the report with a plain list of failures that were ignored
    #[serde(default)]
    pub list_failures: bool,
}

/// Acquisition behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSettings {
    /// Default command timeout in seconds, 0 for none
    pub timeout: u64,

    /// Log acquisition failures and continue
    pub ignore_errors: bool,

    /// Read collector files from this directory instead of running commands
    #[serde(default)]
    pub collector: Option<PathBuf>,
}

/// External command templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSettings {
    pub management: String,
    pub remote: String,
    pub reader: String,
    pub hostname: String,
}

/// Cluster partner lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSettings {
    pub detect: bool,
    pub rsfcli: String,
}

/// Values taken from command-line flags. Unset fields leave lower layers alone.
#[derive(Debug, Default, Serialize)]
pub struct SettingsOverrides {
    pub report: ReportOverrides,
    pub execution: ExecutionOverrides,
}

#[derive(Debug, Default, Serialize)]
pub struct ReportOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_stdout: Option<bool>,
}

#[derive(Debug, Default, Serialize)]
pub struct ExecutionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_errors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collector: Option<PathBuf>,
}

/// Immutable run-mode state shared by the walker and host discovery
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub mode: AcquisitionMode,
    pub ignore_errors: bool,
    pub timeout: Option<Duration>,
    pub templates: CommandTemplates,
}

impl ReportContext {
    /// Freeze settings into a context, checking the collector directory exists
    pub fn from_settings(settings: &Settings) -> Result<Self, ReportError> {
        let mode = match &settings.execution.collector {
            Some(root) => {
                if !root.is_dir() {
                    return Err(ReportError::Environment(format!(
                        "no collector directory '{}'",
                        root.display()
                    )));
                }
                AcquisitionMode::Collector(root.clone())
            }
            None => AcquisitionMode::Live,
        };

        Ok(Self {
            mode,
            ignore_errors: settings.execution.ignore_errors,
            timeout: (settings.execution.timeout > 0)
                .then(|| Duration::from_secs(settings.execution.timeout)),
            templates: CommandTemplates {
                management: settings.commands.management.clone(),
                remote: settings.commands.remote.clone(),
                reader: settings.commands.reader.clone(),
            },
        })
    }

    pub fn collector_root(&self) -> Option<&std::path::Path> {
        match &self.mode {
            AcquisitionMode::Collector(root) => Some(root),
            AcquisitionMode::Live => None,
        }
    }
}
