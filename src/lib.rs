pub mod account;
pub mod admin;
pub mod config;
pub mod database;
pub mod error;
pub mod faculty;
pub mod models;
pub mod protocol;
pub mod relay;
pub mod schema;
pub mod services;
pub mod student;
pub mod utils;

use actix::Addr;
use diesel::r2d2::ConnectionManager;
use diesel::SqliteConnection;

use crate::config::Config;
use crate::relay::server::RelayServer;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Shared per-worker handles: the connection pool, the effective
/// configuration, and the notification relay. Created once at startup, no
/// process-wide singletons.
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
    pub relay: Addr<RelayServer>,
}
