use super::raw_coin_market_repository::TraitRawCoinMarketRepository;
use crate::db::sql::models::server_candidate::ServerCandidate;
use async_trait::async_trait;
use sqlx::Error as SqlxError;
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory stand-in that records every attempt and fails on chosen hosts.
#[derive(Default)]
pub struct FakeRawCoinMarketRepository {
    failing_hosts: HashSet<String>,
    pub attempts: Mutex<Vec<String>>,
    pub inserted: Mutex<Vec<(String, String, i32)>>,
}

impl FakeRawCoinMarketRepository {
    pub fn failing_on(hosts: &[&str]) -> Self {
        Self {
            failing_hosts: hosts.iter().map(|h| h.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn attempted_hosts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn inserted_rows(&self) -> Vec<(String, String, i32)> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TraitRawCoinMarketRepository for FakeRawCoinMarketRepository {
    async fn insert_raw_payload(
        &self,
        server: &ServerCandidate,
        raw_json: &str,
        coin_count: i32,
    ) -> Result<(), SqlxError> {
        self.attempts.lock().unwrap().push(server.host.clone());

        if self.failing_hosts.contains(&server.host) {
            return Err(SqlxError::Protocol(format!(
                "connection refused by {}",
                server.host
            )));
        }

        self.inserted.lock().unwrap().push((
            server.host.clone(),
            raw_json.to_string(),
            coin_count,
        ));
        Ok(())
    }
}
