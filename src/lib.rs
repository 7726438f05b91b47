pub mod config;
pub mod error;
pub mod light;
pub mod routes;
pub mod server;
pub mod transport;
