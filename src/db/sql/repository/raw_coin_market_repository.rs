use crate::db::sql::connection::{ConnectionConfig, DbDriver};
use crate::db::sql::models::server_candidate::ServerCandidate;
use async_trait::async_trait;
use sqlx::mysql::MySqlConnection;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Error as SqlxError};
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const INSERT_POSTGRES: &str =
    "INSERT INTO bronze.raw_coin_market (raw_json, coin_count) VALUES ($1, $2)";
const INSERT_MYSQL: &str =
    "INSERT INTO bronze.raw_coin_market (raw_json, coin_count) VALUES (?, ?)";

#[async_trait]
pub trait TraitRawCoinMarketRepository {
    /// Inserts one raw payload row on `server` and commits it.
    async fn insert_raw_payload(
        &self,
        server: &ServerCandidate,
        raw_json: &str,
        coin_count: i32,
    ) -> Result<(), SqlxError>;
}

/// Opens a fresh connection per call; nothing is pooled between candidates.
pub struct StructRawCoinMarketRepository {
    config: Arc<ConnectionConfig>,
}

impl StructRawCoinMarketRepository {
    pub fn new(config: Arc<ConnectionConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TraitRawCoinMarketRepository for StructRawCoinMarketRepository {
    async fn insert_raw_payload(
        &self,
        server: &ServerCandidate,
        raw_json: &str,
        coin_count: i32,
    ) -> Result<(), SqlxError> {
        let timeout = self.config.connect_timeout;
        debug!("Connecting to {}", self.config.describe(server));

        match self.config.driver {
            DbDriver::Postgres => {
                let options = self.config.pg_options(server);
                let mut conn =
                    connect_within(timeout, PgConnection::connect_with(&options)).await?;
                let result = insert_postgres(&mut conn, raw_json, coin_count).await;
                close_quietly(conn).await;
                result?;
            }
            DbDriver::MySql => {
                let options = self.config.mysql_options(server);
                let mut conn =
                    connect_within(timeout, MySqlConnection::connect_with(&options)).await?;
                let result = insert_mysql(&mut conn, raw_json, coin_count).await;
                close_quietly(conn).await;
                result?;
            }
        }

        info!("Inserted raw payload ({} coins) on {}", coin_count, server);
        Ok(())
    }
}

async fn connect_within<C, F>(timeout: Duration, connect: F) -> Result<C, SqlxError>
where
    F: Future<Output = Result<C, SqlxError>>,
{
    match tokio::time::timeout(timeout, connect).await {
        Ok(result) => result,
        Err(_) => Err(SqlxError::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("connection not established within {:?}", timeout),
        ))),
    }
}

// The transaction rolls back on drop if commit is never reached.
async fn insert_postgres(
    conn: &mut PgConnection,
    raw_json: &str,
    coin_count: i32,
) -> Result<(), SqlxError> {
    let mut tx = conn.begin().await?;
    sqlx::query(INSERT_POSTGRES)
        .bind(raw_json)
        .bind(coin_count)
        .execute(&mut *tx)
        .await?;
    tx.commit().await
}

async fn insert_mysql(
    conn: &mut MySqlConnection,
    raw_json: &str,
    coin_count: i32,
) -> Result<(), SqlxError> {
    let mut tx = conn.begin().await?;
    sqlx::query(INSERT_MYSQL)
        .bind(raw_json)
        .bind(coin_count)
        .execute(&mut *tx)
        .await?;
    tx.commit().await
}

async fn close_quietly<C: Connection>(conn: C) {
    if let Err(e) = conn.close().await {
        debug!("Error while closing connection: {}", e);
    }
}
