use figment::providers::{Format as _, Json, Toml, Yaml};
use std::path::Path;

/// Markup formats accepted for outlines and settings files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Choose a format from the file extension, falling back to the content
    /// for unknown extensions (the default outline is `autosig.conf`).
    pub fn detect(path: &Path, content: &str) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Format::Json,
            "yaml" | "yml" => Format::Yaml,
            "toml" => Format::Toml,
            _ => detect_format_from_content(content).unwrap_or(Format::Json),
        }
    }

    /// Parse a document into a generic value tree
    pub fn parse(self, content: &str) -> Result<serde_json::Value, String> {
        match self {
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yml::from_str(content).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Settings file provider that picks the figment format from the file
pub fn auto(path: &Path) -> impl figment::Provider {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    match Format::detect(path, &content) {
        Format::Json => SmartProvider::Json(Json::file(path)),
        Format::Yaml => SmartProvider::Yaml(Yaml::file(path)),
        Format::Toml => SmartProvider::Toml(Toml::file(path)),
    }
}

/// Wrapper enum to handle different provider types
enum SmartProvider {
    Toml(figment::providers::Data<Toml>),
    Json(figment::providers::Data<Json>),
    Yaml(figment::providers::Data<Yaml>),
}

impl figment::Provider for SmartProvider {
    fn metadata(&self) -> figment::Metadata {
        match self {
            SmartProvider::Toml(p) => p.metadata(),
            SmartProvider::Json(p) => p.metadata(),
            SmartProvider::Yaml(p) => p.metadata(),
        }
    }

    fn data(&self) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        match self {
            SmartProvider::Toml(p) => p.data(),
            SmartProvider::Json(p) => p.data(),
            SmartProvider::Yaml(p) => p.data(),
        }
    }
}

/// Attempt to detect configuration format from file content
fn detect_format_from_content(content: &str) -> Option<Format> {
    let trimmed = content.trim();

    if trimmed.starts_with('{') {
        return Some(Format::Json);
    }

    // TOML table headers or `key = value` lines
    if trimmed.lines().any(|line| {
        let line = line.trim();
        (line.starts_with('[') && line.ends_with(']')) || (line.contains('=') && !line.contains(':'))
    }) {
        return Some(Format::Toml);
    }

    // YAML document separator or `key: value` lines
    if trimmed.starts_with("---") || trimmed.lines().any(|line| line.contains(':')) {
        return Some(Format::Yaml);
    }

    None
}
