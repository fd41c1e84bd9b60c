//! Acquisition strategies
//!
//! A section body comes from literal text, a local command, a management
//! shell command, either of those on a remote host, or a collector file.
//! [`Acquisition`] is the single place where those are turned into shell
//! command lines, so wrapping and quoting can be tested without running anything.

use std::path::{Path, PathBuf};

/// Command prefixes used when building command lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplates {
    /// Management shell invocation, e.g. `nmc -c`
    pub management: String,
    /// Remote login invocation, e.g. `ssh`
    pub remote: String,
    /// Collector file reader, e.g. `cat`
    pub reader: String,
}

impl Default for CommandTemplates {
    fn default() -> Self {
        Self {
            management: "nmc -c".to_string(),
            remote: "ssh".to_string(),
            reader: "cat".to_string(),
        }
    }
}

/// One way of obtaining body content for a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    Literal(String),
    LocalExec(String),
    ManagementExec(String),
    RemoteExec { host: String, command: String },
    RemoteManagementExec { host: String, command: String },
    CollectorRead { root: PathBuf, path: String },
}

impl Acquisition {
    /// Shell command line to execute, `None` for literal text
    pub fn command_line(&self, templates: &CommandTemplates) -> Option<String> {
        match self {
            Acquisition::Literal(_) => None,
            Acquisition::LocalExec(command) => Some(command.clone()),
            Acquisition::ManagementExec(command) => Some(management(templates, command)),
            Acquisition::RemoteExec { host, command } => Some(remote(templates, host, command)),
            Acquisition::RemoteManagementExec { host, command } => {
                Some(remote(templates, host, &management(templates, command)))
            }
            Acquisition::CollectorRead { root, path } => Some(format!(
                "{} {}",
                templates.reader,
                quote(&collector_location(root, path))
            )),
        }
    }

    /// Text shown in brackets above the output in the report.
    ///
    /// This is the command as it runs on the target machine, so remote
    /// commands do not show the login wrapper.
    pub fn header(&self, templates: &CommandTemplates) -> Option<String> {
        match self {
            Acquisition::Literal(_) => None,
            Acquisition::LocalExec(command) | Acquisition::RemoteExec { command, .. } => {
                Some(format!("[{command}]"))
            }
            Acquisition::ManagementExec(command)
            | Acquisition::RemoteManagementExec { command, .. } => {
                Some(format!("[{}]", management(templates, command)))
            }
            Acquisition::CollectorRead { root, path } => {
                Some(format!("[{}]", collector_location(root, path)))
            }
        }
    }

    /// Short description used in failure logs
    pub fn failure_label(&self) -> &'static str {
        match self {
            Acquisition::Literal(_) => "literal text",
            Acquisition::LocalExec(_) => "command execution failed",
            Acquisition::ManagementExec(_) => "management command execution failed",
            Acquisition::RemoteExec { .. } => "remote command execution failed",
            Acquisition::RemoteManagementExec { .. } => "remote management command execution failed",
            Acquisition::CollectorRead { .. } => "collector read failed",
        }
    }

    /// The command or file this acquisition is about, as configured
    pub fn target(&self) -> String {
        match self {
            Acquisition::Literal(text) => text.clone(),
            Acquisition::LocalExec(command) | Acquisition::ManagementExec(command) => command.clone(),
            Acquisition::RemoteExec { host, command }
            | Acquisition::RemoteManagementExec { host, command } => format!("{host}: {command}"),
            Acquisition::CollectorRead { root, path } => collector_location(root, path),
        }
    }
}

fn management(templates: &CommandTemplates, command: &str) -> String {
    format!("{} {}", templates.management, quote(command))
}

fn remote(templates: &CommandTemplates, host: &str, command: &str) -> String {
    format!("{} {} {}", templates.remote, quote(host), quote(command))
}

fn collector_location(root: &Path, path: &str) -> String {
    format!("{}/{}", root.display(), path)
}

/// Quote a word for a POSIX shell.
///
/// Words made only of characters the shell never interprets are returned as-is.
pub fn quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));

    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
