// File: src/services/ingestion/runner.rs
use crate::db::sql::connection::ConnectionConfig;
use crate::db::sql::sql_service::SqlService;
use crate::env_config::models::app_setting::AppSettings;
use crate::error::IngestError;
use crate::services::coingecko::fetcher::CoinMarketFetcher;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct IngestionReport {
    pub coin_count: usize,
    pub server: String,
    pub finished_at: DateTime<Utc>,
}

impl IngestionReport {
    pub fn status_line(&self) -> String {
        format!(
            "Ingestion successful at {}. Inserted {} coins.",
            self.finished_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            self.coin_count
        )
    }
}

pub struct IngestionRunner {
    fetcher: CoinMarketFetcher,
    sql_service: SqlService,
}

impl IngestionRunner {
    /// Resolves the connection settings and HTTP client up front so that a
    /// bad driver name or server list fails before any network traffic.
    pub fn new(settings: &AppSettings) -> Result<Self, IngestError> {
        let connection_config = Arc::new(ConnectionConfig::from_settings(settings)?);
        info!(
            "Database driver {} with {} server candidate(s)",
            connection_config.driver,
            connection_config.servers.len()
        );

        let fetcher = CoinMarketFetcher::new(
            &settings.app_config.coingecko,
            settings.app_env.coingecko_api_key.clone(),
        )?;

        Ok(Self::from_parts(fetcher, SqlService::new(connection_config)))
    }

    pub fn from_parts(fetcher: CoinMarketFetcher, sql_service: SqlService) -> Self {
        Self {
            fetcher,
            sql_service,
        }
    }

    /// One fetch, one insert. The batch is dropped when this returns.
    pub async fn run(&self) -> Result<IngestionReport, IngestError> {
        let batch = self.fetcher.fetch().await?;
        if batch.is_empty() {
            warn!("Market data endpoint returned no coins, storing an empty batch");
        }

        let raw_json = batch.to_payload().map_err(|e| {
            IngestError::Validation(format!("cannot serialize coin records: {}", e))
        })?;
        let coin_count = batch.count();

        let server = self
            .sql_service
            .persist(&raw_json, coin_count as i64)
            .await?;

        info!("Stored {} coins ({} bytes) via {}", coin_count, raw_json.len(), server);

        Ok(IngestionReport {
            coin_count,
            server: server.to_string(),
            finished_at: Utc::now(),
        })
    }
}
