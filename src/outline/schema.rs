//! Outline schema validation
//!
//! Builds the [`Section`] tree from a parsed document. The whole tree is
//! checked, disabled branches included, so a bad outline never produces
//! partial output.

use super::{CollectorPath, Section};
use crate::error::SchemaError;
use serde_json::{Map, Value};
use std::time::Duration;

/// Keys a section may carry
pub const VALID_KEYS: &[&str] = &[
    "title",
    "enabled",
    "paragraph",
    "cmd",
    "nmc",
    "collector",
    "host",
    "timeout",
    "sections",
];

/// Keys every section must carry
pub const REQUIRED_KEYS: &[&str] = &["title", "enabled"];

/// Validate the outline root and everything below it
pub fn parse_outline(value: &Value) -> Result<Section, SchemaError> {
    parse_section(value, "root")
}

fn parse_section(value: &Value, path: &str) -> Result<Section, SchemaError> {
    let object = value.as_object().ok_or_else(|| SchemaError::NotAnObject {
        path: path.to_string(),
    })?;

    for &key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(SchemaError::MissingKey {
                path: path.to_string(),
                key,
            });
        }
    }

    if let Some(key) = object.keys().find(|key| !VALID_KEYS.contains(&key.as_str())) {
        return Err(SchemaError::InvalidKey {
            path: path.to_string(),
            key: key.clone(),
        });
    }

    let fields = Fields { object, path };

    let title = fields
        .string("title")?
        .ok_or_else(|| fields.wrong_type("title", "a string"))?;
    let enabled = match object.get("enabled") {
        Some(Value::Bool(enabled)) => *enabled,
        _ => return Err(fields.wrong_type("enabled", "true or false")),
    };

    let collector = match object.get("collector") {
        None => CollectorPath::Unset,
        // An empty location reads nothing, same as null
        Some(Value::Null) => CollectorPath::Suppressed,
        Some(Value::String(path)) if path.trim().is_empty() => CollectorPath::Suppressed,
        Some(Value::String(path)) => CollectorPath::Path(path.clone()),
        Some(_) => return Err(fields.wrong_type("collector", "a string or null")),
    };

    let timeout = match object.get("timeout") {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_u64() {
            Some(seconds) if seconds > 0 => Some(Duration::from_secs(seconds)),
            _ => return Err(fields.wrong_type("timeout", "a positive number of seconds")),
        },
    };

    let sections = match object.get("sections") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(children)) => children
            .iter()
            .enumerate()
            .map(|(index, child)| parse_section(child, &format!("{path}.sections[{index}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(fields.wrong_type("sections", "a list of sections")),
    };

    let section = Section {
        title,
        enabled,
        paragraph: fields.string("paragraph")?,
        cmd: fields.string("cmd")?,
        nmc: fields.string("nmc")?,
        collector,
        host: fields.string("host")?,
        timeout,
        sections,
    };

    if section.host.is_some() && section.cmd.is_none() && section.nmc.is_none() {
        return Err(SchemaError::OrphanHost {
            path: path.to_string(),
        });
    }

    Ok(section)
}

struct Fields<'a> {
    object: &'a Map<String, Value>,
    path: &'a str,
}

impl Fields<'_> {
    /// Optional string value, `null` counts as absent
    fn string(&self, key: &'static str) -> Result<Option<String>, SchemaError> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(_) => Err(self.wrong_type(key, "a string")),
        }
    }

    fn wrong_type(&self, key: &'static str, expected: &'static str) -> SchemaError {
        SchemaError::WrongType {
            path: self.path.to_string(),
            key,
            expected,
        }
    }
}
