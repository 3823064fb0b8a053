//! hitcounter: a small JSON backend that counts hits in PostgreSQL.
//!
//! Two endpoints are served: `/api/health` checks database connectivity and
//! `/api/message` returns a configured message together with a counter that is
//! incremented atomically on every call.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use db::Database;
pub use error::{AppError, DbError};
pub use routes::create_router;
pub use state::AppState;
