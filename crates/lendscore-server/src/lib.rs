//! Lendscore Server
//!
//! HTTP surface for the Lendscore scoring pipeline: one POST scoring route
//! plus health, schema-validation, sanity-check, and metrics endpoints.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::ServerConfig;
pub use routes::create_router;
pub use state::AppState;
