pub mod assistant;
pub mod azure;
pub mod config;
pub mod server;
pub mod support;
