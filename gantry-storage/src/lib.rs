//! # Gantry Storage
//!
//! Seeds the shared Postgres backing store before a service's
//! data-dependent measurements. Seeding is an atomic reset: the schema is
//! created if absent, all rows are truncated with their identity sequence,
//! and the full corpus is re-inserted, all in one transaction. Any failure
//! rolls back and surfaces as a [`StorageError`]; the controller treats it
//! as "skip this service's data-dependent cases" and carries on.

pub mod error;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use store::{PgStore, ProductStore};
