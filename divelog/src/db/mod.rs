//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL, following the
//! Repository pattern.
//!
//! ```text
//! ┌──────────────┐
//! │ Repositories │  (db::handlers - queries & row mapping)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │    Models    │  (db::models - requests and responses)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │  PostgreSQL  │  (db_plongeur, db_palanque, db_fiche_securite, db_aptitude)
//! └──────────────┘
//! ```
//!
//! # Transactions
//!
//! Repositories borrow a connection and never begin a transaction themselves. Multi-statement
//! operations such as [`handlers::Divers::sync_dive_group`] are only atomic when the repository is
//! built from a transaction:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let sync = Divers::new(&mut tx).sync_dive_group(&group).await?;
//! tx.commit().await?;
//! ```
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and are embedded with [`crate::migrator`].

use std::{str::FromStr, time::Duration};

use sqlx::{
    ConnectOptions, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use crate::config::{DatabaseConfig, PoolSettings};

pub mod errors;
pub mod handlers;
pub mod models;

fn optional_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(optional_secs(settings.idle_timeout_secs))
        .max_lifetime(optional_secs(settings.max_lifetime_secs))
}

/// Open the connection pool. Statements slower than `slow_statement_threshold` are logged at WARN.
pub async fn connect(config: &DatabaseConfig, slow_statement_threshold: Duration) -> anyhow::Result<PgPool> {
    let options = PgConnectOptions::from_str(&config.url)?
        .log_slow_statements(log::LevelFilter::Warn, slow_statement_threshold);

    let pool = pool_options(&config.pool).connect_with(options).await?;
    info!(max_connections = config.pool.max_connections, "Connected to database");
    Ok(pool)
}
