pub mod schema_gen;
pub mod sqlite;

pub use schema_gen::*;
pub use sqlite::SqliteStore;
