//! Key-value backend adapters.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryKvStore;
pub use sqlite::SqliteKvStore;
