pub mod connection;
pub mod models;
pub mod repository;
pub mod sql_service;
