//! Domain types for Loops
//!
//! - Loop: the loop record with its status, tags and energy level
//! - LoopUpdate: partial set of user-editable fields
//! - tag: the fixed tag catalog

pub mod loop_record;
pub mod tag;

pub use loop_record::{Loop, LoopStatus, LoopUpdate, MAX_ENERGY, MIN_ENERGY};
pub use tag::{AVAILABLE_TAGS, TagColor, TagDef};
