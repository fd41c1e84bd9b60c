//! Report generation
//!
//! Ties the pieces together for one run: outline, settings, host discovery,
//! document, walker. All configuration and environment checks happen before
//! the report file is created.

use crate::config::{ReportContext, Settings};
use crate::document::Document;
use crate::error::ReportError;
use crate::host;
use crate::outline::{self, AcquisitionMode, Section};
use crate::walker::{AcquisitionFailure, WalkSummary, Walker};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Label above the closing list of ignored failures
pub const FAILURES_LABEL: &str = "Acquisition errors";

/// Where the report went and what the walk did
#[derive(Debug)]
pub struct ReportOutcome {
    pub path: PathBuf,
    pub summary: WalkSummary,
}

/// Generate the report described by `outline_path`
pub async fn generate(settings: &Settings, outline_path: &Path) -> Result<ReportOutcome, ReportError> {
    let outline = outline::load(outline_path)?;
    let context = ReportContext::from_settings(settings)?;

    let hostname = host::hostname(&context, &settings.commands.hostname).await?;
    let partner = match context.mode {
        AcquisitionMode::Live if settings.cluster.detect => {
            host::cluster_partner(&settings.cluster, &hostname).await?
        }
        _ => None,
    };

    std::fs::create_dir_all(&settings.report.output_dir)?;
    let path = settings
        .report
        .output_dir
        .join(host::report_file_name(&settings.report.prefix, &hostname, partner.as_deref()));

    let mut document = Document::create(&path, settings.report.mirror_stdout)?;
    tracing::info!("Writing output to {}", path.display());

    let preamble = Preamble {
        hostname: &hostname,
        partner: partner.as_deref(),
        mode: &context.mode,
        contents: settings.report.contents.then_some(&outline),
    };
    preamble.write(&mut document)?;

    let summary = Walker::new(&context, &mut document).walk(&outline).await?;
    if !summary.failures.is_empty() {
        tracing::warn!("{} acquisition(s) failed and were skipped", summary.failures.len());
        if settings.report.list_failures {
            write_failures(&mut document, &summary.failures)?;
        }
    }
    document.finish()?;

    tracing::info!("Complete!");
    Ok(ReportOutcome { path, summary })
}

/// Lines written before the outline
pub struct Preamble<'a> {
    pub hostname: &'a str,
    pub partner: Option<&'a str>,
    pub mode: &'a AcquisitionMode,
    /// Outline whose top-level sections are listed as contents
    pub contents: Option<&'a Section>,
}

impl Preamble<'_> {
    pub fn write<W: Write>(&self, document: &mut Document<W>) -> std::io::Result<()> {
        document.string(&format!("Version {}", crate::VERSION))?;

        let source = match self.mode {
            AcquisitionMode::Live => "live system".to_string(),
            AcquisitionMode::Collector(root) => format!("collector {}", root.display()),
        };
        document.key_values(&[
            ("Host", self.hostname),
            ("Partner", self.partner.unwrap_or("none")),
            ("Source", source.as_str()),
        ])?;

        if let Some(outline) = self.contents.filter(|outline| outline.enabled) {
            let titles: Vec<&str> = outline.enabled_children().collect();
            if !titles.is_empty() {
                document.string("Contents")?;
                document.numbered_list(&titles)?;
            }
        }
        Ok(())
    }
}

/// Closing list of every failure that was ignored, labelled but not headed
/// so it is not mistaken for an outline section
pub fn write_failures<W: Write>(document: &mut Document<W>, failures: &[AcquisitionFailure]) -> std::io::Result<()> {
    document.string(FAILURES_LABEL)?;
    let items: Vec<String> = failures.iter().map(ToString::to_string).collect();
    document.bulleted_list(&items)
}
