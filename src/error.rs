use thiserror::Error;

/// Every way a single ingestion run can fail.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Network failure, timeout or non-success HTTP status while fetching.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The market-data response did not have the expected shape.
    #[error("{0}")]
    Validation(String),

    /// A required setting is missing or malformed.
    #[error("{0}")]
    Config(String),

    /// Every server candidate failed; carries the error of the last one tried.
    #[error("{source} (server {server})")]
    Persistence {
        server: String,
        #[source]
        source: sqlx::Error,
    },
}

impl IngestError {
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::Transport(_) => "transport",
            IngestError::Validation(_) => "validation",
            IngestError::Config(_) => "config",
            IngestError::Persistence { .. } => "persistence",
        }
    }

    /// Single-line console message for the entry point.
    pub fn status_line(&self) -> String {
        match self {
            IngestError::Transport(err) => format!("API request failed: {}", err),
            IngestError::Validation(msg) => format!("API response error: {}", msg),
            IngestError::Config(msg) => format!("Configuration error: {}", msg),
            IngestError::Persistence { .. } => {
                format!("Database connection/insert failed: {}", self)
            }
        }
    }
}
