use super::models::IngestionBatch;
use crate::env_config::models::app_config::CoinGeckoConfig;
use crate::error::IngestError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";
const USER_AGENT: &str = concat!("coin-ingest/", env!("CARGO_PKG_VERSION"));

pub struct CoinMarketFetcher {
    client: Client,
    config: CoinGeckoConfig,
    api_key: Option<String>,
}

impl CoinMarketFetcher {
    pub fn new(config: &CoinGeckoConfig, api_key: Option<String>) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.config.vs_currency.clone()),
            ("order", self.config.order.clone()),
            ("per_page", self.config.per_page.to_string()),
            ("page", self.config.page.to_string()),
            ("sparkline", self.config.sparkline.to_string()),
        ]
    }

    /// Fetches one page of market data. Any non-success status, network
    /// failure or undecodable body is a transport error; well-formed JSON
    /// that is not an array is a validation error. Nothing is retried.
    pub async fn fetch(&self) -> Result<IngestionBatch, IngestError> {
        let params = self.query_params();
        debug!("GET {} with {:?}", self.config.url, params);

        let mut request = self.client.get(&self.config.url).query(&params);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?.error_for_status()?;
        // An undecodable body is a transport failure, only the shape is validated
        let value: Value = response.json().await?;

        match value {
            Value::Array(records) => {
                info!("Fetched {} coin records", records.len());
                Ok(IngestionBatch::new(records))
            }
            other => Err(IngestError::Validation(format!(
                "Unexpected API response format: expected a list of coins, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::coingecko::test_server::{MARKETS_PATH, spawn_server, unused_url};
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn config_for(url: String, timeout_seconds: u64) -> CoinGeckoConfig {
        CoinGeckoConfig {
            url,
            timeout_seconds,
            ..CoinGeckoConfig::default()
        }
    }

    async fn fetch_from(router: Router) -> Result<IngestionBatch, IngestError> {
        let url = spawn_server(router).await;
        let fetcher = CoinMarketFetcher::new(&config_for(url, 5), None).unwrap();
        fetcher.fetch().await
    }

    #[tokio::test]
    async fn test_array_elements_are_returned_unchanged() {
        let body = json!([
            {"id": "bitcoin", "price": 50000, "nested": {"a": [1, 2]}},
            "odd-but-allowed",
            null
        ]);
        let served = body.clone();
        let router = Router::new().route(MARKETS_PATH, get(move || async move { Json(served) }));

        let batch = fetch_from(router).await.unwrap();

        assert_eq!(batch.count(), 3);
        assert_eq!(Value::Array(batch.records), body);
    }

    #[tokio::test]
    async fn test_sends_fixed_query_parameters() {
        let router = Router::new().route(
            MARKETS_PATH,
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let expected = [
                    ("vs_currency", "usd"),
                    ("order", "market_cap_desc"),
                    ("per_page", "50"),
                    ("page", "1"),
                    ("sparkline", "false"),
                ];
                let ok = expected
                    .iter()
                    .all(|(k, v)| params.get(*k).map(String::as_str) == Some(*v));
                if ok {
                    (StatusCode::OK, Json(json!([])))
                } else {
                    (StatusCode::BAD_REQUEST, Json(json!({"params": params})))
                }
            }),
        );

        let batch = fetch_from(router).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_api_key_header_when_configured() {
        let router = Router::new().route(
            MARKETS_PATH,
            get(|headers: HeaderMap| async move {
                match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
                    Some("demo-key") => (StatusCode::OK, Json(json!([{"id": "eth"}]))),
                    _ => (StatusCode::UNAUTHORIZED, Json(json!({"error": "missing key"}))),
                }
            }),
        );
        let url = spawn_server(router).await;

        let with_key =
            CoinMarketFetcher::new(&config_for(url.clone(), 5), Some("demo-key".to_string()))
                .unwrap();
        assert_eq!(with_key.fetch().await.unwrap().count(), 1);

        let without_key = CoinMarketFetcher::new(&config_for(url, 5), None).unwrap();
        assert_eq!(without_key.fetch().await.unwrap_err().kind(), "transport");
    }

    #[tokio::test]
    async fn test_non_array_shapes_are_validation_errors() {
        for body in [json!({"coins": []}), json!("bitcoin"), json!(42), Value::Null] {
            let served = body.clone();
            let router =
                Router::new().route(MARKETS_PATH, get(move || async move { Json(served) }));

            let err = fetch_from(router).await.unwrap_err();
            assert_eq!(err.kind(), "validation", "body {} must be rejected", body);
            assert!(err.to_string().contains("expected a list of coins"));
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_transport_error() {
        let router = Router::new().route(MARKETS_PATH, get(|| async { "<html>rate limited</html>" }));

        let err = fetch_from(router).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert!(err.status_line().starts_with("API request failed:"));
        match err {
            IngestError::Transport(e) => assert!(e.is_decode()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_statuses_are_transport_errors() {
        for status in [
            StatusCode::NOT_FOUND,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let router = Router::new().route(
                MARKETS_PATH,
                get(move || async move { (status, Json(json!([{"id": "bitcoin"}]))) }),
            );

            let err = fetch_from(router).await.unwrap_err();
            assert_eq!(err.kind(), "transport", "status {} must fail", status);
        }
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let router = Router::new().route(
            MARKETS_PATH,
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!([]))
            }),
        );
        let url = spawn_server(router).await;
        let fetcher = CoinMarketFetcher::new(&config_for(url, 1), None).unwrap();

        let err = fetcher.fetch().await.unwrap_err();
        match err {
            IngestError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let url = unused_url().await;
        let fetcher = CoinMarketFetcher::new(&config_for(url, 5), None).unwrap();

        let err = fetcher.fetch().await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
