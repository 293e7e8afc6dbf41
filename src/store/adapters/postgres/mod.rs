//! `PostgreSQL` adapter for every farm collection.

mod models;
mod repository;
mod schema;

pub use repository::{FarmPgPool, PostgresFarmStore};
