use super::models::app_env::{AppEnv, Env};
use crate::error::IngestError;
use std::env;
use std::str::FromStr;

pub const DEFAULT_DB_DRIVER: &str = "postgres";
pub const DEFAULT_DB_NAME: &str = "coinsight";
pub const DEFAULT_DB_USER: &str = "coinsight";
pub const DEFAULT_DB_SERVERS: &str = "localhost,5432;127.0.0.1,5432";

/// Password variables, checked in order.
const PASSWORD_VARS: [&str; 2] = ["DB_PASSWORD", "COINSIGHT_DB_PASSWORD"];

impl AppEnv {
    pub fn new() -> Result<AppEnv, IngestError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the environment from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<AppEnv, IngestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let env = match get("ENV") {
            Some(raw) => Env::from_str(&raw).map_err(IngestError::Config)?,
            None => Env::Local,
        };

        Ok(AppEnv {
            env,
            config_path: get("CONFIG_PATH"),
            coingecko_api_key: get("COINGECKO_API_KEY"),
            db_driver: get("DB_DRIVER").unwrap_or_else(|| DEFAULT_DB_DRIVER.to_string()),
            db_name: get("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            db_user: get("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
            db_password: PASSWORD_VARS.iter().find_map(|name| get(*name)),
            db_encrypt: parse_bool(get("DB_ENCRYPT"), true),
            db_trust_cert: parse_bool(get("DB_TRUST_CERT"), true),
            db_servers: get("DB_SERVERS").unwrap_or_else(|| DEFAULT_DB_SERVERS.to_string()),
        })
    }

    /// Path of the TOML config file for this environment.
    pub fn config_file(&self) -> String {
        self.config_path
            .clone()
            .unwrap_or_else(|| format!("config/{}.toml", self.env))
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value.map(|v| v.to_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "y" | "on") => true,
        Some("0" | "false" | "no" | "n" | "off") => false,
        _ => default,
    }
}
