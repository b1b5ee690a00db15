use super::models::app_config::AppConfig;
use crate::error::IngestError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

impl AppConfig {
    /// Reads the TOML config at `path`. A missing file yields the built-in
    /// defaults unless `required` is set (the path was named explicitly);
    /// an unreadable or malformed file is always a configuration error.
    pub fn new(path: &Path, required: bool) -> Result<AppConfig, IngestError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents).map_err(|err| {
                IngestError::Config(format!("{}: {}", path.display(), err))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound && !required => {
                debug!("Config file {} not found, using defaults", path.display());
                Ok(AppConfig::default())
            }
            Err(err) => Err(IngestError::Config(format!(
                "cannot read {}: {}",
                path.display(),
                err
            ))),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<AppConfig, toml::de::Error> {
        toml::from_str(contents)
    }
}
