//! Storage layer for Loops - the local key-value slot the loop collection
//! lives in.
//!
//! - `FileStore`: one JSON file per key in a data directory (durable)
//! - `MemoryStore`: a HashMap with an optional byte quota (tests, dry runs)

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, validate_key};

/// Key the loop collection is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "loops-data";
