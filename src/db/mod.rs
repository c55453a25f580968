pub mod seed;
pub mod sqlite;

pub use sqlite::{create_pool, SqliteCatalog};
