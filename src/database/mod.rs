pub mod assert;

use actix_web::web;
use anyhow::Context;
use diesel::connection::SimpleConnection;
use diesel::r2d2::ConnectionManager;
use diesel::SqliteConnection;
use r2d2::PooledConnection;

use crate::config::Config;
use crate::error::ServiceError;
use crate::models::users::ROLE_ADMIN;
use crate::services::auth;

pub fn get_db_conn(
    state: &web::Data<crate::AppState>,
) -> anyhow::Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
    state.pool.get().context("DB connection")
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES users (id),
    faculty_id INTEGER NOT NULL REFERENCES users (id),
    start_time TIMESTAMP NOT NULL,
    end_time TIMESTAMP NOT NULL,
    reason TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'pending'
);

CREATE TABLE IF NOT EXISTS cancellation_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    appointment_id INTEGER NOT NULL,
    requester_id INTEGER NOT NULL REFERENCES users (id),
    reason TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'pending'
);
"#;

/// Creates the tables when they do not exist yet. Safe to run on every start.
pub fn init_schema(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    conn.batch_execute(SCHEMA_SQL).context("schema setup")?;
    Ok(())
}

/// Seeds the initial admin account from configuration; a no-op once the
/// username is taken.
pub fn seed_admin(conn: &mut SqliteConnection, config: &Config) -> anyhow::Result<()> {
    match auth::create_user(conn, &config.admin_username, &config.admin_password, ROLE_ADMIN) {
        Ok(user) => {
            tracing::info!(username = %user.username, "seeded admin account");
            Ok(())
        }
        Err(ServiceError::DuplicateUsername) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
