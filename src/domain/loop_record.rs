//! Loop record and related types
//!
//! A Loop is one open mental commitment: some text, a status, optional tags
//! from the catalog and an optional energy cost. The serialized form uses
//! camelCase keys so persisted data stays compatible with the browser
//! rendition of the app.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::tag;
use crate::error::{LoopsError, Result};
use crate::id::{generate_loop_id, now};

/// Lowest accepted energy level
pub const MIN_ENERGY: u8 = 1;

/// Highest accepted energy level
pub const MAX_ENERGY: u8 = 5;

/// The core Loop record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loop {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// What the loop is about, stored trimmed
    pub content: String,

    pub status: LoopStatus,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation, never earlier than `created_at`
    pub updated_at: DateTime<Utc>,

    /// When the loop was closed; cleared again on reopen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,

    /// Catalog tag values in the order they were added.
    /// Older data has no tags field at all.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Subjective drain, 1 (low) to 5 (high).
    /// Stored values outside that range load as absent.
    #[serde(
        default,
        deserialize_with = "deserialize_energy",
        skip_serializing_if = "Option::is_none"
    )]
    pub energy_level: Option<u8>,
}

/// Status of a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopStatus {
    Open,
    Closed,
}

impl LoopStatus {
    /// The opposite status
    pub fn toggled(self) -> Self {
        match self {
            LoopStatus::Open => LoopStatus::Closed,
            LoopStatus::Closed => LoopStatus::Open,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoopStatus::Open => "open",
            LoopStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial set of user-editable fields.
///
/// `None` leaves a field untouched. `energy_level: Some(None)` clears the
/// energy level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopUpdate {
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub energy_level: Option<Option<u8>>,
}

impl LoopUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn energy_level(mut self, energy_level: Option<u8>) -> Self {
        self.energy_level = Some(energy_level);
        self
    }

    /// Returns true if no field would change
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.tags.is_none() && self.energy_level.is_none()
    }
}

/// Read a stored energy level, mapping anything that is not an integer in 1-5 to `None`.
fn deserialize_energy<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let level = value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .filter(|n| (MIN_ENERGY..=MAX_ENERGY).contains(n));
    if level.is_none() {
        log::warn!("Ignoring stored energy level {}", value);
    }
    Ok(level)
}

/// Trim content and reject it if nothing is left
pub fn validate_content(content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(LoopsError::EmptyContent);
    }
    Ok(trimmed.to_string())
}

/// Check every tag against the catalog and drop repeats, keeping first-seen order
pub fn validate_tags(tags: Vec<String>) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !tag::is_known(&tag) {
            return Err(LoopsError::UnknownTag(tag));
        }
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    Ok(out)
}

/// Reject energy levels outside 1-5
pub fn validate_energy(energy_level: Option<u8>) -> Result<Option<u8>> {
    match energy_level {
        Some(level) if !(MIN_ENERGY..=MAX_ENERGY).contains(&level) => {
            Err(LoopsError::InvalidEnergyLevel(level))
        }
        other => Ok(other),
    }
}

impl Loop {
    /// Create a new open loop, validating every user-supplied field
    pub fn new(content: &str, tags: Vec<String>, energy_level: Option<u8>) -> Result<Self> {
        let content = validate_content(content)?;
        let tags = validate_tags(tags)?;
        let energy_level = validate_energy(energy_level)?;
        let now = now();

        Ok(Self {
            id: generate_loop_id(),
            content,
            status: LoopStatus::Open,
            created_at: now,
            updated_at: now,
            closed_at: None,
            tags,
            energy_level,
        })
    }

    pub fn is_open(&self) -> bool {
        self.status == LoopStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == LoopStatus::Closed
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Energy level with "unspecified" counted as zero
    pub fn energy_or_zero(&self) -> u32 {
        self.energy_level.map(u32::from).unwrap_or(0)
    }

    /// Update the timestamp
    pub fn touch(&mut self) {
        self.updated_at = now().max(self.created_at);
    }

    /// Flip open/closed and return the new status
    pub fn toggle(&mut self) -> LoopStatus {
        self.status = self.status.toggled();
        self.touch();
        self.closed_at = match self.status {
            LoopStatus::Closed => Some(self.updated_at),
            LoopStatus::Open => None,
        };
        self.status
    }

    /// Merge an update into this loop.
    ///
    /// All fields are validated before any is written, so a rejected update
    /// leaves the loop untouched.
    pub fn apply(&mut self, update: LoopUpdate) -> Result<()> {
        let content = update.content.as_deref().map(validate_content).transpose()?;
        let tags = update.tags.map(validate_tags).transpose()?;
        let energy_level = update.energy_level.map(validate_energy).transpose()?;

        if let Some(content) = content {
            self.content = content;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        if let Some(energy_level) = energy_level {
            self.energy_level = energy_level;
        }
        self.touch();
        Ok(())
    }

    /// Repair fields that older or hand-edited data may carry.
    ///
    /// Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        if let Some(level) = self.energy_level {
            if validate_energy(Some(level)).is_err() {
                log::warn!("Loop {} has out-of-range energy level {}, clearing", self.id, level);
                self.energy_level = None;
                changed = true;
            }
        }
        if self.is_open() && self.closed_at.is_some() {
            log::debug!("Loop {} is open but carries closedAt, clearing", self.id);
            self.closed_at = None;
            changed = true;
        }
        if self.updated_at < self.created_at {
            log::debug!("Loop {} has updatedAt before createdAt, raising", self.id);
            self.updated_at = self.created_at;
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_creates_open_loop() {
        let record = Loop::new("Buy milk", tags(&["shopping"]), Some(2)).unwrap();

        assert_eq!(record.content, "Buy milk");
        assert_eq!(record.status, LoopStatus::Open);
        assert_eq!(record.created_at, record.updated_at);
        assert!(record.closed_at.is_none());
        assert_eq!(record.tags, tags(&["shopping"]));
        assert_eq!(record.energy_level, Some(2));
    }

    #[test]
    fn test_new_trims_content() {
        let record = Loop::new("  call mom \n", vec![], None).unwrap();
        assert_eq!(record.content, "call mom");
    }

    #[test]
    fn test_new_rejects_blank_content() {
        assert!(matches!(Loop::new("", vec![], None), Err(LoopsError::EmptyContent)));
        assert!(matches!(Loop::new("   ", vec![], None), Err(LoopsError::EmptyContent)));
        assert!(matches!(Loop::new("\t\n", vec![], None), Err(LoopsError::EmptyContent)));
    }

    #[test]
    fn test_new_rejects_unknown_tag() {
        let result = Loop::new("x", tags(&["work", "errands"]), None);
        assert!(matches!(result, Err(LoopsError::UnknownTag(t)) if t == "errands"));
    }

    #[test]
    fn test_new_rejects_energy_out_of_range() {
        assert!(matches!(
            Loop::new("x", vec![], Some(0)),
            Err(LoopsError::InvalidEnergyLevel(0))
        ));
        assert!(matches!(
            Loop::new("x", vec![], Some(6)),
            Err(LoopsError::InvalidEnergyLevel(6))
        ));
        assert!(Loop::new("x", vec![], Some(1)).is_ok());
        assert!(Loop::new("x", vec![], Some(5)).is_ok());
    }

    #[test]
    fn test_validate_tags_dedups_in_order() {
        let out = validate_tags(tags(&["urgent", "work", "urgent", "health", "work"])).unwrap();
        assert_eq!(out, tags(&["urgent", "work", "health"]));
    }

    #[test]
    fn test_toggle_sets_and_clears_closed_at() {
        let mut record = Loop::new("x", vec![], None).unwrap();

        assert_eq!(record.toggle(), LoopStatus::Closed);
        assert!(record.is_closed());
        assert_eq!(record.closed_at, Some(record.updated_at));

        assert_eq!(record.toggle(), LoopStatus::Open);
        assert!(record.is_open());
        assert!(record.closed_at.is_none());
    }

    #[test]
    fn test_apply_merges_fields() {
        let mut record = Loop::new("x", tags(&["work"]), Some(3)).unwrap();
        let created = record.created_at;

        record
            .apply(LoopUpdate::new().content(" y ").tags(["personal"]).energy_level(None))
            .unwrap();

        assert_eq!(record.content, "y");
        assert_eq!(record.tags, tags(&["personal"]));
        assert_eq!(record.energy_level, None);
        assert_eq!(record.created_at, created);
        assert!(record.updated_at >= created);
    }

    #[test]
    fn test_apply_leaves_untouched_fields() {
        let mut record = Loop::new("x", tags(&["work"]), Some(3)).unwrap();
        record.apply(LoopUpdate::new().content("y")).unwrap();

        assert_eq!(record.tags, tags(&["work"]));
        assert_eq!(record.energy_level, Some(3));
    }

    #[test]
    fn test_apply_rejected_update_changes_nothing() {
        let mut record = Loop::new("x", tags(&["work"]), Some(3)).unwrap();
        let before = record.clone();

        let result = record.apply(LoopUpdate::new().content("y").energy_level(Some(9)));
        assert!(matches!(result, Err(LoopsError::InvalidEnergyLevel(9))));
        assert_eq!(record, before);

        let result = record.apply(LoopUpdate::new().content("   "));
        assert!(matches!(result, Err(LoopsError::EmptyContent)));
        assert_eq!(record, before);
    }

    #[test]
    fn test_loop_update_is_empty() {
        assert!(LoopUpdate::new().is_empty());
        assert!(!LoopUpdate::new().energy_level(None).is_empty());
    }

    #[test]
    fn test_energy_or_zero() {
        let mut record = Loop::new("x", vec![], None).unwrap();
        assert_eq!(record.energy_or_zero(), 0);
        record.energy_level = Some(4);
        assert_eq!(record.energy_or_zero(), 4);
    }

    #[test]
    fn test_touch_never_precedes_created_at() {
        let mut record = Loop::new("x", vec![], None).unwrap();
        record.created_at = now() + chrono::Duration::hours(1);
        record.touch();
        assert_eq!(record.updated_at, record.created_at);
    }

    #[test]
    fn test_normalize_repairs_fields() {
        let mut record = Loop::new("x", vec![], None).unwrap();
        record.energy_level = Some(9);
        record.closed_at = Some(record.created_at);

        assert!(record.normalize());
        assert_eq!(record.energy_level, None);
        assert!(record.closed_at.is_none());
        assert!(!record.normalize());
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let mut record = Loop::new("x", tags(&["work"]), Some(2)).unwrap();
        record.toggle();
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("closedAt").is_some());
        assert_eq!(value["energyLevel"], 2);
        assert_eq!(value["status"], "closed");
    }

    #[test]
    fn test_serialization_omits_absent_optionals() {
        let record = Loop::new("x", vec![], None).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("closedAt").is_none());
        assert!(value.get("energyLevel").is_none());
        assert_eq!(value["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_deserialize_missing_tags_defaults_empty() {
        let json = r#"{
            "id": "abc",
            "content": "legacy",
            "status": "open",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z"
        }"#;
        let record: Loop = serde_json::from_str(json).unwrap();

        assert!(record.tags.is_empty());
        assert!(record.energy_level.is_none());
        assert!(record.closed_at.is_none());
    }

    #[test]
    fn test_deserialize_energy_out_of_range_is_absent() {
        for raw in ["9", "300", "-1", "2.5", "\"high\"", "null"] {
            let json = format!(
                r#"{{"id":"x","content":"c","status":"open","createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z","energyLevel":{}}}"#,
                raw
            );
            let record: Loop = serde_json::from_str(&json).unwrap();
            assert_eq!(record.energy_level, None, "energyLevel {}", raw);
        }
    }

    #[test]
    fn test_deserialize_energy_in_range_kept() {
        let json = r#"{"id":"x","content":"c","status":"open","createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z","energyLevel":4}"#;
        let record: Loop = serde_json::from_str(json).unwrap();
        assert_eq!(record.energy_level, Some(4));
    }

    #[test]
    fn test_loop_status_serialization() {
        assert_eq!(serde_json::to_string(&LoopStatus::Open).unwrap(), "\"open\"");
        assert_eq!(serde_json::to_string(&LoopStatus::Closed).unwrap(), "\"closed\"");
        assert!(serde_json::from_str::<LoopStatus>("\"pending\"").is_err());
    }

    #[test]
    fn test_loop_serialization_roundtrip() {
        let record = Loop::new("Test task", tags(&["learning"]), Some(4)).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: Loop = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
