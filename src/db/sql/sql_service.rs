use crate::db::sql::connection::ConnectionConfig;
use crate::db::sql::models::server_candidate::ServerCandidate;
use crate::db::sql::repository::raw_coin_market_repository::{
    StructRawCoinMarketRepository, TraitRawCoinMarketRepository,
};
use crate::error::IngestError;
use std::sync::Arc;
use tracing::{info, warn};

pub struct SqlService {
    pub config: Arc<ConnectionConfig>,

    pub repository_raw_coin_market: Arc<dyn TraitRawCoinMarketRepository + Send + Sync>,
}

impl SqlService {
    pub fn new(config: Arc<ConnectionConfig>) -> Self {
        let repository = Arc::new(StructRawCoinMarketRepository::new(config.clone()))
            as Arc<dyn TraitRawCoinMarketRepository + Send + Sync>;
        Self::with_repository(config, repository)
    }

    pub fn with_repository(
        config: Arc<ConnectionConfig>,
        repository: Arc<dyn TraitRawCoinMarketRepository + Send + Sync>,
    ) -> Self {
        Self {
            config,
            repository_raw_coin_market: repository,
        }
    }

    /// Stores one serialized batch, trying server candidates strictly in
    /// order. Returns the candidate that committed the row.
    pub async fn persist(
        &self,
        raw_json: &str,
        coin_count: i64,
    ) -> Result<ServerCandidate, IngestError> {
        let coin_count = i32::try_from(coin_count)
            .ok()
            .filter(|count| *count >= 0)
            .ok_or_else(|| {
                IngestError::Validation(format!("invalid coin count {}", coin_count))
            })?;

        if self.config.password.is_empty() {
            return Err(IngestError::Config(
                "database password is not set (DB_PASSWORD or COINSIGHT_DB_PASSWORD)"
                    .to_string(),
            ));
        }
        if self.config.servers.is_empty() {
            return Err(IngestError::Config(
                "no database servers configured (DB_SERVERS)".to_string(),
            ));
        }

        let total = self.config.servers.len();
        let mut last_error = None;

        for (index, server) in self.config.servers.iter().enumerate() {
            info!("Trying database server {}/{}: {}", index + 1, total, server);

            match self
                .repository_raw_coin_market
                .insert_raw_payload(server, raw_json, coin_count)
                .await
            {
                Ok(()) => return Ok(server.clone()),
                Err(e) => {
                    warn!("Database server {} failed: {}", server, e);
                    last_error = Some((server, e));
                }
            }
        }

        match last_error {
            Some((server, source)) => Err(IngestError::Persistence {
                server: server.to_string(),
                source,
            }),
            None => Err(IngestError::Config("no database servers configured".to_string())),
        }
    }
}
