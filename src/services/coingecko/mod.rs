pub mod fetcher;
pub mod models;

#[cfg(test)]
pub mod test_server;
