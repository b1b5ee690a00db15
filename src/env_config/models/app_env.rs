use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Local,
    Dev,
    Prod,
}

impl FromStr for Env {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Env::Local),
            "dev" | "development" => Ok(Env::Dev),
            "prod" | "production" => Ok(Env::Prod),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Env::Local => write!(f, "local"),
            Env::Dev => write!(f, "dev"),
            Env::Prod => write!(f, "prod"),
        }
    }
}

/// Values resolved from the process environment (and `.env`).
///
/// Connection settings live here rather than in the TOML file so that
/// credentials never have to be committed next to the config.
#[derive(Clone)]
pub struct AppEnv {
    pub env: Env,
    pub config_path: Option<String>,
    pub coingecko_api_key: Option<String>,
    pub db_driver: String,
    pub db_name: String,
    pub db_user: String,
    pub db_password: Option<String>,
    pub db_encrypt: bool,
    pub db_trust_cert: bool,
    pub db_servers: String,
}

impl AppEnv {
    pub fn is_local(&self) -> bool {
        self.env == Env::Local
    }
}

impl fmt::Debug for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppEnv")
            .field("env", &self.env)
            .field("config_path", &self.config_path)
            .field(
                "coingecko_api_key",
                &self.coingecko_api_key.as_ref().map(|_| "***"),
            )
            .field("db_driver", &self.db_driver)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "***"))
            .field("db_encrypt", &self.db_encrypt)
            .field("db_trust_cert", &self.db_trust_cert)
            .field("db_servers", &self.db_servers)
            .finish()
    }
}
