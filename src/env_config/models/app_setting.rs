use super::{app_config::AppConfig, app_env::AppEnv};
use crate::error::IngestError;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub app_config: AppConfig,
    pub app_env: AppEnv,
}

impl AppSettings {
    /// Resolves the environment first, then the TOML file it points at.
    pub fn load() -> Result<AppSettings, IngestError> {
        let app_env = AppEnv::new()?;
        // Only an explicitly named file has to exist
        let app_config = AppConfig::new(
            Path::new(&app_env.config_file()),
            app_env.config_path.is_some(),
        )?;
        Ok(AppSettings {
            app_config,
            app_env,
        })
    }
}
