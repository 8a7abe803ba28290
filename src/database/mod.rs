pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod schema;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use schema::migrate;
pub use store::PgStore;
