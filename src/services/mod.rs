pub mod coingecko;
pub mod ingestion;
