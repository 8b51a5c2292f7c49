//! # divelog: data access for a diving club
//!
//! `divelog` persists the records a diving club keeps for each dive session: safety sheets
//! (*fiches de sécurité*), the dive groups (*palanquées*) formed on them, and the divers
//! (*plongeurs*) in each group along with their qualifications (*aptitudes*).
//!
//! ## Architecture
//!
//! The crate is a PostgreSQL data access layer built on SQLx. Each table has a repository in
//! [`db::handlers`] that borrows a connection, issues parameterized SQL, and maps rows into the
//! request/response models of [`db::models`]. Repositories share the [`db::handlers::Repository`]
//! trait for create, read, bulk read, list, update, and delete.
//!
//! Divers carry a version counter. Every update writes `version + 1`; the stored value is not
//! compared first, so the last writer wins.
//!
//! ## Quick Start
//!
//! ```no_run
//! use divelog::db::handlers::Divers;
//!
//! # async fn example(pool: sqlx::PgPool) -> anyhow::Result<()> {
//! divelog::migrator().run(&pool).await?;
//!
//! let mut conn = pool.acquire().await?;
//! let mut divers = Divers::new(&mut conn);
//! for diver in divers.list_latest(10).await? {
//!     println!("{} {}", diver.first_name, diver.last_name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options used by the `divelog` binary.

pub mod config;
pub mod db;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use types::{AptitudeId, DiveGroupId, DiverId, SafetySheetId};

/// Get the divelog database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}
