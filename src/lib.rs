pub mod arena;
pub mod config;
pub mod db;
pub mod http;
pub mod metrics;
