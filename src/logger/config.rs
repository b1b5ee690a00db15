use std::fmt;
use std::io::{Error, ErrorKind};
use tracing_subscriber::EnvFilter;

/// Supported log format types
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Plain,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Plain => write!(f, "plain"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl From<&str> for LogFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Plain,
        }
    }
}

/// `RUST_LOG` wins over the configured level when it is set.
fn build_filter(log_level: &str) -> Result<EnvFilter, Error> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(log_level)
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "Invalid log level")),
    }
}

/// Logs go to stderr; stdout is reserved for the run's status line.
pub fn init_logger(log_level: &str, log_format: &str, is_production: bool) -> Result<(), Error> {
    let filter = build_filter(log_level)?;
    let format = LogFormat::from(log_format);

    let result = if is_production {
        // Production mode without timestamps, the scheduler stamps output
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .without_time();

        match format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Plain => builder.try_init(),
        }
    } else {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);

        match format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Plain => builder.try_init(),
        }
    };

    result.map_err(|err| Error::new(ErrorKind::AlreadyExists, err.to_string()))
}
