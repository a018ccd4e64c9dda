//! Vendo Database — SurrealDB connection management, schema migrations,
//! and repository implementations for the `vendo-core` traits.
//!
//! Every owned-entity statement carries a `WHERE vendor_id = $vendor_id`
//! filter; the scoping layer lives here, not in callers.

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
