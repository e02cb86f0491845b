//! # diveclub
//!
//! Record management for a diving club: members, the dives they log, and the
//! equipment the club lends out.
//!
//! The crate exposes
//!
//! - HTML screens for listing, searching, creating, editing and deleting each
//!   record type ([`views`])
//! - a generic admin JSON API with OpenAPI documentation ([`admin`])
//! - a sample data generator ([`seed`])
//! - the `diveclub` binary (`serve`, `migrate`, `seed`)
//!
//! ```rust,ignore
//! let config = diveclub::config::Config::load()?;
//! let db = diveclub::database::connect(&config.database).await?;
//! diveclub::database::migrate(&db).await?;
//! let app = diveclub::routes::app(diveclub::AppState::new(db, config.pagination.per_page));
//! ```

use sea_orm::DatabaseConnection;

pub mod admin;
pub mod cli;
pub mod config;
pub mod database;
pub mod entities;
pub mod errors;
pub mod filtering;
pub mod logging;
pub mod migration;
pub mod operations;
pub mod pagination;
pub mod routes;
pub mod seed;
pub mod validation;
pub mod views;

pub use errors::{ApiError, Error, Result};
pub use migration::Migrator;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Rows per page in the HTML lists.
    pub per_page: u64,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, per_page: u64) -> Self {
        Self { db, per_page }
    }
}
