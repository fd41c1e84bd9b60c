//! Host discovery
//!
//! Works out the names that go into the report file name: the local hostname
//! and, when the node is part of an RSF-1 cluster, its partner.

use crate::acquire::quote;
use crate::config::{ClusterSettings, ReportContext};
use crate::error::ReportError;
use crate::exec;

/// Cluster name reported by an RSF-1 install that was never configured
const UNCONFIGURED_CLUSTER: &str = "Ready_For_Cluster_Configuration";

/// Name of the system the report describes.
///
/// In collector mode this is the captured `network/nodename`, otherwise the
/// output of the configured hostname command.
pub async fn hostname(context: &ReportContext, hostname_command: &str) -> Result<String, ReportError> {
    let command_line = match context.collector_root() {
        Some(root) => format!(
            "{} {}",
            context.templates.reader,
            quote(&format!("{}/network/nodename", root.display()))
        ),
        None => hostname_command.to_string(),
    };

    let result = exec::run(&command_line, context.timeout)
        .await
        .map_err(|err| ReportError::Environment(format!("failed to get system hostname: {err}")))?;

    match result.output {
        Some(name) if result.success() => Ok(name),
        _ => Err(ReportError::Environment(format!(
            "failed to get system hostname: {}",
            result.output_or_empty()
        ))),
    }
}

/// Hostname of the cluster partner, if the RSF-1 service runs a configured cluster
pub async fn cluster_partner(cluster: &ClusterSettings, hostname: &str) -> Result<Option<String>, ReportError> {
    let rsfcli = format!("{} -i0", cluster.rsfcli);

    let running = exec::run(&format!("{rsfcli} isrunning"), None)
        .await
        .map_err(|err| ReportError::Environment(format!("unable to determine RSF service state: {err}")))?;

    if !running.success() {
        tracing::info!("RSF service is not running");
        return Ok(None);
    }
    tracing::info!("RSF service is running");

    let status = exec::run(&format!("{rsfcli} status"), None)
        .await
        .map_err(|err| ReportError::Environment(format!("unable to read RSF status: {err}")))?;
    if !status.success() {
        tracing::warn!("RSF status failed: {}", status.output_or_empty());
        return Ok(None);
    }

    let cluster_status = RsfStatus::parse(status.output_or_empty());
    if cluster_status.cluster_name.as_deref() == Some(UNCONFIGURED_CLUSTER) {
        tracing::info!("Cluster is not configured");
        return Ok(None);
    }
    tracing::info!("RSF cluster is configured");

    let partner = cluster_status.partner_of(hostname).map(str::to_string);
    if let Some(partner) = &partner {
        tracing::info!("{} is partner node", partner);
    }
    Ok(partner)
}

/// Fields of interest from `rsfcli status`
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RsfStatus {
    pub cluster_name: Option<String>,
    pub hosts: Vec<String>,
}

impl RsfStatus {
    pub fn parse(output: &str) -> Self {
        let mut status = RsfStatus::default();

        for line in output.lines() {
            if line.starts_with("Contacted") {
                if let Some(name) = line.split_whitespace().nth(4) {
                    status.cluster_name = Some(name.trim_end_matches(',').trim_matches('"').to_string());
                }
            } else if line.starts_with("Host") {
                if let Some(host) = line.split_whitespace().nth(1) {
                    status.hosts.push(host.to_string());
                }
            }
        }

        status
    }

    /// First listed host that is not `hostname`
    pub fn partner_of(&self, hostname: &str) -> Option<&str> {
        self.hosts
            .iter()
            .map(String::as_str)
            .find(|host| *host != hostname)
    }
}

/// Report file name for this host and optional partner
pub fn report_file_name(prefix: &str, hostname: &str, partner: Option<&str>) -> String {
    match partner {
        Some(partner) => format!("{prefix}-{hostname}-{partner}.txt"),
        None => format!("{prefix}-{hostname}.txt"),
    }
}
