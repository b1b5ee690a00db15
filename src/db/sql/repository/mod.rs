pub mod raw_coin_market_repository;

#[cfg(test)]
pub mod fake_repository;
