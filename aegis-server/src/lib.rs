//! aegis-server: HTTP host for the Aegis registry

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
