//! Loop store for Loops.
//!
//! # Example
//!
//! ```
//! use loops::store::LoopStore;
//! use loops::storage::MemoryStore;
//!
//! let mut store = LoopStore::load(MemoryStore::new());
//! let record = store.create("Finish report", vec!["work".into()], Some(5))?;
//! store.toggle_status(&record.id);
//! assert!(store.get(&record.id).unwrap().closed_at.is_some());
//! # Ok::<(), loops::LoopsError>(())
//! ```

mod loop_store;

pub use loop_store::{CORRUPT_SUFFIX, LoopStore};
