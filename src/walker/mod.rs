//! Outline walker
//!
//! Visits the validated outline depth-first in configuration order and renders
//! each enabled section into the document. A disabled section hides its whole
//! subtree, even children that are enabled themselves.

use crate::acquire::Acquisition;
use crate::config::ReportContext;
use crate::document::Document;
use crate::error::ReportError;
use crate::exec;
use crate::outline::{AcquisitionMode, CollectorPath, Section};
use std::io::Write;

/// An acquisition that failed while errors were being ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionFailure {
    pub section: String,
    pub target: String,
    pub reason: String,
}

impl std::fmt::Display for AcquisitionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.section, self.target, self.reason)
    }
}

/// What a completed walk rendered
#[derive(Debug, Default)]
pub struct WalkSummary {
    pub sections_rendered: usize,
    pub failures: Vec<AcquisitionFailure>,
}

pub struct Walker<'a, W: Write> {
    context: &'a ReportContext,
    document: &'a mut Document<W>,
    summary: WalkSummary,
}

impl<'a, W: Write> Walker<'a, W> {
    pub fn new(context: &'a ReportContext, document: &'a mut Document<W>) -> Self {
        Self {
            context,
            document,
            summary: WalkSummary::default(),
        }
    }

    /// Render the outline, treating `root` as the single top-level section
    pub async fn walk(mut self, root: &Section) -> Result<WalkSummary, ReportError> {
        for section in std::slice::from_ref(root) {
            self.visit(section, 0).await?;
        }
        Ok(self.summary)
    }

    async fn visit(&mut self, section: &Section, level: usize) -> Result<(), ReportError> {
        if !section.enabled {
            tracing::debug!("Skipping disabled section \"{}\"", section.title);
            return Ok(());
        }

        tracing::info!("Section \"{}\"", section.title);
        self.document.heading(level, &section.title)?;
        self.summary.sections_rendered += 1;

        if let AcquisitionMode::Collector(_) = self.context.mode {
            if section.collector == CollectorPath::Unset {
                tracing::warn!(
                    "Collector generation specified but section \"{}\" has no collector subsection",
                    section.title
                );
            }
        }

        for acquisition in section.acquisitions(&self.context.mode) {
            self.acquire(section, &acquisition).await?;
        }

        for child in &section.sections {
            Box::pin(self.visit(child, level + 1)).await?;
        }
        Ok(())
    }

    async fn acquire(&mut self, section: &Section, acquisition: &Acquisition) -> Result<(), ReportError> {
        let templates = &self.context.templates;

        let (Some(command_line), Some(header)) =
            (acquisition.command_line(templates), acquisition.header(templates))
        else {
            if let Acquisition::Literal(text) = acquisition {
                self.document.paragraph(text)?;
            }
            return Ok(());
        };

        let timeout = section.timeout.or(self.context.timeout);
        match exec::run(&command_line, timeout).await {
            Ok(result) if result.success() => {
                self.document.string(&header)?;
                self.document.newline()?;
                if let Some(output) = &result.output {
                    self.document.paragraph(output)?;
                }
                Ok(())
            }
            Ok(result) => {
                let reason = format!("exit status {}", result.status);
                self.fail(section, acquisition, reason, result.output_or_empty())
            }
            Err(err) => self.fail(section, acquisition, err.to_string(), &err.to_string()),
        }
    }

    /// Apply the failure policy: log, then stop the run or record and continue
    fn fail(
        &mut self,
        section: &Section,
        acquisition: &Acquisition,
        reason: String,
        detail: &str,
    ) -> Result<(), ReportError> {
        let target = acquisition.target();
        tracing::error!("{} \"{}\"", acquisition.failure_label(), target);
        tracing::error!("{}", detail);

        if !self.context.ignore_errors {
            return Err(ReportError::Acquisition {
                section: section.title.clone(),
                target,
                reason,
            });
        }

        self.summary.failures.push(AcquisitionFailure {
            section: section.title.clone(),
            target,
            reason,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::CommandTemplates;
    use crate::outline::parse_outline;
    use serde_json::json;
    use std::path::PathBuf;
    use std::time::Duration;

    fn context(mode: AcquisitionMode, ignore_errors: bool) -> ReportContext {
        ReportContext {
            mode,
            ignore_errors,
            timeout: None,
            templates: CommandTemplates::default(),
        }
    }

    async fn render(
        context: &ReportContext,
        outline: serde_json::Value,
    ) -> (Result<WalkSummary, ReportError>, String) {
        let outline = parse_outline(&outline).unwrap();
        let mut document = Document::new(Vec::new());
        let result = Walker::new(context, &mut document).walk(&outline).await;
        let text = String::from_utf8(document.finish().unwrap()).unwrap();
        (result, text)
    }

    #[tokio::test]
    async fn test_report_with_one_command() {
        let (result, text) = render(
            &context(AcquisitionMode::Live, false),
            json!({"title": "Report", "enabled": true, "sections": [
                {"title": "Disk", "enabled": true, "cmd": "echo ok", "sections": []}
            ]}),
        )
        .await;

        assert_eq!(result.unwrap().sections_rendered, 2);
        assert_eq!(
            text,
            "\n======\nREPORT\n======\n\n\nDisk\n----\n\n[echo ok]\n\nok\n\n"
        );
    }

    #[tokio::test]
    async fn test_heading_only_section_has_no_body() {
        let (result, text) = render(
            &context(AcquisitionMode::Live, false),
            json!({"title": "Report", "enabled": true}),
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(text, "\n======\nREPORT\n======\n\n");
    }

    #[tokio::test]
    async fn test_disabled_section_hides_subtree() {
        let outline = json!({"title": "Report", "enabled": true, "sections": [
            {"title": "Shown", "enabled": true, "sections": [
                {"title": "Nested", "enabled": true, "paragraph": "deep"}
            ]},
            {"title": "Hidden", "enabled": false, "sections": [
                {"title": "Hidden child", "enabled": true, "cmd": "echo never"}
            ]}
        ]});
        let expected = parse_outline(&outline).unwrap().rendered_count();

        let (result, text) = render(&context(AcquisitionMode::Live, false), outline).await;

        assert_eq!(result.unwrap().sections_rendered, expected);
        assert_eq!(expected, 3);
        assert!(text.contains("\n+ Nested\n\ndeep\n\n"));
        assert!(!text.contains("Hidden"));
        assert!(!text.contains("never"));
    }

    #[tokio::test]
    async fn test_heading_rank_follows_depth() {
        let (_, text) = render(
            &context(AcquisitionMode::Live, false),
            json!({"title": "R", "enabled": true, "sections": [
                {"title": "L1", "enabled": true, "sections": [
                    {"title": "L2", "enabled": true, "sections": [
                        {"title": "L3", "enabled": true, "sections": [
                            {"title": "L4", "enabled": true}
                        ]}
                    ]}
                ]}
            ]}),
        )
        .await;

        assert!(text.contains("\nL1\n--\n"));
        assert!(text.contains("\n+ L2\n"));
        assert!(text.contains("\n-+ L3\n"));
        assert!(text.contains("\n--+ L4\n"));
    }

    #[tokio::test]
    async fn test_sections_render_in_configuration_order() {
        let (_, text) = render(
            &context(AcquisitionMode::Live, false),
            json!({"title": "R", "enabled": true, "sections": [
                {"title": "First", "enabled": true, "sections": [
                    {"title": "First child", "enabled": true}
                ]},
                {"title": "Second", "enabled": true}
            ]}),
        )
        .await;

        let first = text.find("First\n").unwrap();
        let child = text.find("First child").unwrap();
        let second = text.find("Second").unwrap();
        assert!(first < child && child < second);
    }

    #[tokio::test]
    async fn test_failure_stops_the_run() {
        let (result, text) = render(
            &context(AcquisitionMode::Live, false),
            json!({"title": "R", "enabled": true, "sections": [
                {"title": "Broken", "enabled": true, "cmd": "echo bad; exit 2"},
                {"title": "After", "enabled": true}
            ]}),
        )
        .await;

        match result.unwrap_err() {
            ReportError::Acquisition { section, target, reason } => {
                assert_eq!(section, "Broken");
                assert_eq!(target, "echo bad; exit 2");
                assert_eq!(reason, "exit status 2");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Everything up to the failing section was written
        assert!(text.contains("Broken\n------"));
        assert!(!text.contains("After"));
    }

    #[tokio::test]
    async fn test_ignored_failure_continues() {
        let (result, text) = render(
            &context(AcquisitionMode::Live, true),
            json!({"title": "R", "enabled": true, "sections": [
                {"title": "Broken", "enabled": true, "cmd": "exit 2"},
                {"title": "After", "enabled": true, "cmd": "echo fine"}
            ]}),
        )
        .await;

        let summary = result.unwrap();
        assert_eq!(summary.sections_rendered, 3);
        assert_eq!(
            summary.failures,
            vec![AcquisitionFailure {
                section: "Broken".to_string(),
                target: "exit 2".to_string(),
                reason: "exit status 2".to_string(),
            }]
        );
        assert!(!text.contains("[exit 2]"));
        assert!(text.contains("[echo fine]\n\nfine\n\n"));
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let mut context = context(AcquisitionMode::Live, false);
        context.timeout = Some(Duration::from_secs(30));

        let (result, _) = render(
            &context,
            json!({"title": "R", "enabled": true, "sections": [
                {"title": "Slow", "enabled": true, "cmd": "sleep 5", "timeout": 1}
            ]}),
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("timeout of 1s exceeded"), "{err}");
    }

    #[tokio::test]
    async fn test_collector_readback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("zfs")).unwrap();
        std::fs::write(dir.path().join("zfs/zpool-list.out"), "tank  10T\n").unwrap();
        let root = dir.path().to_path_buf();

        let (result, text) = render(
            &context(AcquisitionMode::Collector(root.clone()), false),
            json!({"title": "R", "enabled": true, "collector": null, "sections": [
                {"title": "Pools", "enabled": true, "cmd": "zpool list", "collector": "zfs/zpool-list.out"}
            ]}),
        )
        .await;

        assert!(result.is_ok());
        assert!(text.contains(&format!("[{}/zfs/zpool-list.out]\n\ntank  10T\n\n", root.display())));
        assert!(!text.contains("[zpool list]"));
    }

    #[tokio::test]
    async fn test_missing_collector_file_ignored_keeps_heading() {
        let dir = tempfile::tempdir().unwrap();

        let (result, text) = render(
            &context(AcquisitionMode::Collector(PathBuf::from(dir.path())), true),
            json!({"title": "R", "enabled": true, "collector": null, "sections": [
                {"title": "Pools", "enabled": true, "collector": "zfs/missing.out"}
            ]}),
        )
        .await;

        let summary = result.unwrap();
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(text, "\n=\nR\n=\n\n\nPools\n-----\n\n");
    }

    #[tokio::test]
    async fn test_blank_collector_location_renders_heading_only() {
        let dir = tempfile::tempdir().unwrap();

        let (result, text) = render(
            &context(AcquisitionMode::Collector(PathBuf::from(dir.path())), false),
            json!({"title": "R", "enabled": true, "collector": ""}),
        )
        .await;

        let summary = result.unwrap();
        assert!(summary.failures.is_empty());
        assert_eq!(text, "\n=\nR\n=\n\n");
    }

    #[tokio::test]
    async fn test_paragraph_before_command_output() {
        let (_, text) = render(
            &context(AcquisitionMode::Live, false),
            json!({"title": "R", "enabled": true, "paragraph": "Intro text", "cmd": "echo out"}),
        )
        .await;

        assert!(text.ends_with("Intro text\n\n[echo out]\n\nout\n\n"));
    }

    #[tokio::test]
    async fn test_silent_command_renders_header_only() {
        let (_, text) = render(
            &context(AcquisitionMode::Live, false),
            json!({"title": "R", "enabled": true, "cmd": "true"}),
        )
        .await;

        assert!(text.ends_with("[true]\n\n"));
    }

    #[tokio::test]
    async fn test_management_command_uses_template() {
        let mut context = context(AcquisitionMode::Live, false);
        context.templates.management = "echo mgmt".to_string();

        let (_, text) = render(
            &context,
            json!({"title": "R", "enabled": true, "nmc": "show appliance"}),
        )
        .await;

        assert!(text.ends_with("[echo mgmt 'show appliance']\n\nmgmt show appliance\n\n"));
    }
}
