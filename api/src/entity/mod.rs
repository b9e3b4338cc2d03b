//! SeaORM entities
//!
//! Table mappings used by the PostgreSQL adapters. Schema lives in
//! `migrations/0001_init.sql`.

pub mod notes;
pub mod sessions;
pub mod users;
