//! Key-value storage trait.

use crate::error::{LoopsError, Result};

/// A local key-value slot store.
///
/// Values are whole serialized documents; there is no partial update.
pub trait KeyValueStore {
    /// Read the value stored at `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored at `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Reject keys that are empty or could escape a storage directory.
pub fn validate_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key.contains('/')
        || key.contains('\\')
        || key.contains("..")
        || key.chars().any(char::is_control);
    if bad {
        return Err(LoopsError::InvalidKey(key.to_string()));
    }
    Ok(())
}
