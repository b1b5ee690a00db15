use crate::db::sql::models::server_candidate::{ServerCandidate, parse_server_list};
use crate::env_config::models::app_setting::AppSettings;
use crate::error::IngestError;
use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const APPLICATION_NAME: &str = "coin-ingest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDriver {
    Postgres,
    MySql,
}

impl DbDriver {
    pub fn default_port(&self) -> u16 {
        match self {
            DbDriver::Postgres => 5432,
            DbDriver::MySql => 3306,
        }
    }

    fn scheme(&self) -> &'static str {
        match self {
            DbDriver::Postgres => "postgres",
            DbDriver::MySql => "mysql",
        }
    }
}

impl FromStr for DbDriver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DbDriver::Postgres),
            "mysql" | "mariadb" => Ok(DbDriver::MySql),
            other => Err(format!("unsupported database driver '{}'", other)),
        }
    }
}

impl fmt::Display for DbDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scheme())
    }
}

/// Driver-neutral TLS policy derived from the encrypt/trust-cert flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    Disabled,
    /// Encrypted, server certificate accepted without verification.
    Required,
    VerifyFull,
}

impl TlsMode {
    pub fn from_flags(encrypt: bool, trust_cert: bool) -> Self {
        match (encrypt, trust_cert) {
            (false, _) => TlsMode::Disabled,
            (true, true) => TlsMode::Required,
            (true, false) => TlsMode::VerifyFull,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TlsMode::Disabled => "disabled",
            TlsMode::Required => "required",
            TlsMode::VerifyFull => "verify-full",
        }
    }
}

/// Everything needed to reach the ingestion database, resolved once per run.
#[derive(Clone)]
pub struct ConnectionConfig {
    pub driver: DbDriver,
    pub database: String,
    pub user: String,
    pub password: String,
    pub tls: TlsMode,
    pub servers: Vec<ServerCandidate>,
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    /// A missing password is not rejected here; the persister checks it
    /// before its first connection attempt.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, IngestError> {
        let env = &settings.app_env;
        let driver = DbDriver::from_str(&env.db_driver).map_err(IngestError::Config)?;
        let servers = parse_server_list(&env.db_servers).map_err(IngestError::Config)?;

        Ok(Self {
            driver,
            database: env.db_name.clone(),
            user: env.db_user.clone(),
            password: env.db_password.clone().unwrap_or_default(),
            tls: TlsMode::from_flags(env.db_encrypt, env.db_trust_cert),
            servers,
            connect_timeout: Duration::from_secs(
                settings.app_config.database.connect_timeout_seconds,
            ),
        })
    }

    fn port_for(&self, server: &ServerCandidate) -> u16 {
        server.port.unwrap_or_else(|| self.driver.default_port())
    }

    pub fn pg_options(&self, server: &ServerCandidate) -> PgConnectOptions {
        let ssl_mode = match self.tls {
            TlsMode::Disabled => PgSslMode::Disable,
            TlsMode::Required => PgSslMode::Require,
            TlsMode::VerifyFull => PgSslMode::VerifyFull,
        };

        PgConnectOptions::new_without_pgpass()
            .host(&server.host)
            .port(self.port_for(server))
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(ssl_mode)
            .application_name(APPLICATION_NAME)
    }

    pub fn mysql_options(&self, server: &ServerCandidate) -> MySqlConnectOptions {
        let ssl_mode = match self.tls {
            TlsMode::Disabled => MySqlSslMode::Disabled,
            TlsMode::Required => MySqlSslMode::Required,
            TlsMode::VerifyFull => MySqlSslMode::VerifyIdentity,
        };

        MySqlConnectOptions::new()
            .host(&server.host)
            .port(self.port_for(server))
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(ssl_mode)
    }

    /// Connection target for logs, never including the password.
    pub fn describe(&self, server: &ServerCandidate) -> String {
        format!(
            "{}://{}@{}:{}/{}?tls={}",
            self.driver,
            self.user,
            server.host,
            self.port_for(server),
            self.database,
            self.tls.as_str()
        )
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("tls", &self.tls)
            .field("servers", &self.servers)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
