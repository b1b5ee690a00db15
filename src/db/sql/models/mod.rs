pub mod server_candidate;
