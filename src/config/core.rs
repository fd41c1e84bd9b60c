use super::Settings;
use super::smart_load;
use crate::error::ReportError;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::Serialize;
use std::path::Path;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

impl Settings {
    /// Load settings with the usual priority, lowest first:
    /// embedded defaults, settings file, `AUTOSIG_` environment, CLI overrides.
    pub fn load<T: Serialize>(settings_file: Option<&Path>, cli_overrides: Option<T>) -> Result<Self, ReportError> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(path) = settings_file {
            if !path.is_file() {
                return Err(ReportError::Config(format!(
                    "cannot open the settings file {}",
                    path.display()
                )));
            }
            figment = figment.merge(smart_load::auto(path));
        }

        figment = figment.merge(Env::prefixed("AUTOSIG_").split("__"));

        if let Some(overrides) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        let settings: Settings = figment.extract()?;
        tracing::trace!("CONFIG LOAD: {:?}", settings);
        Ok(settings)
    }

    /// Defaults only, for callers that need no outside input
    pub fn defaults() -> Result<Self, ReportError> {
        Ok(Figment::new().merge(Toml::string(DEFAULT_CONFIG)).extract()?)
    }
}
