//! Repository implementations for database access.
//!
//! Each repository wraps a borrowed `PgConnection`, builds parameterized SQL, and returns models
//! from [`crate::db::models`]. Repositories never open transactions of their own: construct them
//! from a transaction when several statements must commit together.
//!
//! - [`Divers`]: divers, their listings, and dive group sync
//! - [`Aptitudes`]: qualification lookup used to resolve a diver's aptitudes
//!
//! ```ignore
//! use divelog::db::handlers::{Divers, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut divers = Divers::new(&mut tx);
//!
//!     let group = divers.list_by_dive_group(7).await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod aptitudes;
pub mod divers;
pub mod repository;

pub use aptitudes::Aptitudes;
pub use divers::Divers;
pub use repository::Repository;
