//! Report outline
//!
//! The outline is a tree of [`Section`]s read once from the configuration file,
//! checked against the schema in full, and never modified afterwards.

use crate::acquire::Acquisition;
use crate::config::smart_load::Format;
use crate::error::ReportError;
use std::path::Path;
use std::time::Duration;

mod schema;

pub use schema::{REQUIRED_KEYS, VALID_KEYS, parse_outline};

/// Location of a section's collector file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CollectorPath {
    /// No `collector` key
    #[default]
    Unset,
    /// `"collector": null`, the section intentionally has no collector body
    Suppressed,
    Path(String),
}

/// One node of the report outline
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    pub title: String,
    pub enabled: bool,
    pub paragraph: Option<String>,
    pub cmd: Option<String>,
    pub nmc: Option<String>,
    pub collector: CollectorPath,
    /// Remote host for `cmd` and `nmc`
    pub host: Option<String>,
    /// Overrides the run's default command timeout
    pub timeout: Option<Duration>,
    pub sections: Vec<Section>,
}

/// Where section bodies come from for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// Run `cmd` and `nmc` against the live system
    Live,
    /// Read `collector` files below this directory
    Collector(std::path::PathBuf),
}

impl Section {
    /// Acquisitions for this section in rendering order.
    ///
    /// Literal text always comes first, then either the collector file or the
    /// live commands depending on `mode`.
    pub fn acquisitions(&self, mode: &AcquisitionMode) -> Vec<Acquisition> {
        let mut acquisitions = Vec::new();

        if let Some(text) = &self.paragraph {
            acquisitions.push(Acquisition::Literal(text.clone()));
        }

        match mode {
            AcquisitionMode::Collector(root) => {
                if let CollectorPath::Path(path) = &self.collector {
                    acquisitions.push(Acquisition::CollectorRead {
                        root: root.clone(),
                        path: path.clone(),
                    });
                }
            }
            AcquisitionMode::Live => {
                if let Some(command) = &self.cmd {
                    acquisitions.push(match &self.host {
                        Some(host) => Acquisition::RemoteExec {
                            host: host.clone(),
                            command: command.clone(),
                        },
                        None => Acquisition::LocalExec(command.clone()),
                    });
                }
                if let Some(command) = &self.nmc {
                    acquisitions.push(match &self.host {
                        Some(host) => Acquisition::RemoteManagementExec {
                            host: host.clone(),
                            command: command.clone(),
                        },
                        None => Acquisition::ManagementExec(command.clone()),
                    });
                }
            }
        }

        acquisitions
    }

    /// Number of sections that will be rendered: enabled nodes whose
    /// ancestors are all enabled.
    pub fn rendered_count(&self) -> usize {
        if !self.enabled {
            return 0;
        }
        1 + self.sections.iter().map(Section::rendered_count).sum::<usize>()
    }

    /// Total number of nodes, disabled ones included
    pub fn node_count(&self) -> usize {
        1 + self.sections.iter().map(Section::node_count).sum::<usize>()
    }

    /// Titles of the rendered direct children
    pub fn enabled_children(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter(|section| section.enabled)
            .map(|section| section.title.as_str())
    }
}

/// Read, parse and validate an outline file
pub fn load(path: &Path) -> Result<Section, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        ReportError::Config(format!("cannot open the config file {}: {err}", path.display()))
    })?;

    let format = Format::detect(path, &content);
    tracing::debug!("Parsing outline {} as {:?}", path.display(), format);

    let value = format.parse(&content).map_err(|err| {
        ReportError::Config(format!("cannot parse the config file {}: {err}", path.display()))
    })?;

    Ok(parse_outline(&value)?)
}
