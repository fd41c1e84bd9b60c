//! Process runner
//!
//! Every acquisition, including collector file reads, goes through [`run`]:
//! one `sh -c` process, stderr merged into stdout, optional wall-clock deadline.
//! The shell leads its own process group so a deadline takes down every
//! pipeline stage and subshell it started.

use crate::error::ExecError;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const SHELL: &str = "sh";

/// Outcome of a command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit status, `-1` when the process was terminated by a signal
    pub status: i32,

    /// Trimmed combined stdout/stderr, `None` when nothing was printed
    pub output: Option<String>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Output text for log messages
    pub fn output_or_empty(&self) -> &str {
        self.output.as_deref().unwrap_or("")
    }
}

/// Run a command line in the default shell.
///
/// When `timeout` elapses first the child is killed and [`ExecError::Timeout`]
/// is returned. A nonzero exit status is not an error here; callers decide.
pub async fn run(command_line: &str, timeout: Option<Duration>) -> Result<ExecutionResult, ExecError> {
    tracing::debug!("Executing \"{}\"", command_line);

    // Redirect the shell's own stderr first so everything it runs shares one stream
    let script = format!("exec 2>&1\n{command_line}");

    let mut command = Command::new(SHELL);
    command
        .arg("-c")
        .arg(script)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .process_group(0);

    let child = command.spawn().map_err(ExecError::Spawn)?;
    let group = child.id();

    let waiting = child.wait_with_output();
    let finished = match timeout {
        Some(limit) => match tokio::time::timeout(limit, waiting).await {
            Ok(finished) => finished,
            Err(_) => {
                kill_group(group);
                tracing::debug!("Killed \"{}\" after {:?}", command_line, limit);
                return Err(ExecError::Timeout(limit));
            }
        },
        None => waiting.await,
    };
    let output = finished.map_err(ExecError::Io)?;

    let text = String::from_utf8_lossy(&output.stdout);
    let trimmed = text.trim();

    Ok(ExecutionResult {
        status: output.status.code().unwrap_or(-1),
        output: (!trimmed.is_empty()).then(|| trimmed.to_string()),
    })
}

/// SIGKILL the process group led by the shell
fn kill_group(leader: Option<u32>) {
    // `None` means the shell was already reaped
    let Some(pid) = leader.and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    if let Err(err) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        tracing::debug!("Failed to kill process group {}: {}", pid, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_run_captures_trimmed_output() {
        let result = run("echo '  hello  '", None).await.unwrap();
        assert!(result.success());
        assert_eq!(result.output.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_run_merges_stderr_into_stdout() {
        let result = run("echo out; echo err >&2", None).await.unwrap();
        let output = result.output.unwrap();
        assert!(output.contains("out"));
        assert!(output.contains("err"));
    }

    #[tokio::test]
    async fn test_empty_output_is_none() {
        let result = run("true", None).await.unwrap();
        assert!(result.success());
        assert_eq!(result.output, None);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported_not_raised() {
        let result = run("echo broken; exit 3", None).await.unwrap();
        assert!(!result.success());
        assert_eq!(result.status, 3);
        assert_eq!(result.output_or_empty(), "broken");
    }

    #[tokio::test]
    async fn test_timeout_kills_long_running_command() {
        let started = Instant::now();
        let err = run("sleep 5", Some(Duration::from_millis(200)))
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_timeout_kills_the_whole_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let command_line = format!("(sleep 1; touch '{}') | cat", marker.display());

        let err = run(&command_line, Some(Duration::from_millis(200)))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Timeout(_)));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!marker.exists(), "subshell outlived the deadline");
    }

    #[tokio::test]
    async fn test_command_within_timeout_succeeds() {
        let result = run("echo fast", Some(Duration::from_secs(5))).await.unwrap();
        assert_eq!(result.output.as_deref(), Some("fast"));
    }
}
