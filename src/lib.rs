//! Loops - close your open loops, reclaim your mental energy
//!
//! A single-user tracker for open commitments ("loops"). Loops carry tags from
//! a fixed catalog and an optional energy cost, and are persisted as one JSON
//! document in a local key-value store.

pub mod domain;
pub mod error;
pub mod id;
pub mod storage;
pub mod store;
pub mod views;

pub use error::{LoopsError, Result};
