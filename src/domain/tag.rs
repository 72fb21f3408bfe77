//! Tag catalog
//!
//! Tags are a fixed, compiled-in set of category labels. Loops reference them
//! by `value`; `label` and `color` exist only for display.

use serde::Serialize;

/// Color hint attached to a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Blue,
    Purple,
    Red,
    Gray,
    Green,
    Orange,
    Cyan,
    Pink,
}

/// A single tag catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagDef {
    pub value: &'static str,
    pub label: &'static str,
    pub color: TagColor,
}

/// All tags a loop may carry, in display order
pub const AVAILABLE_TAGS: &[TagDef] = &[
    TagDef { value: "work", label: "Work", color: TagColor::Blue },
    TagDef { value: "personal", label: "Personal", color: TagColor::Purple },
    TagDef { value: "urgent", label: "Urgent", color: TagColor::Red },
    TagDef { value: "someday", label: "Someday", color: TagColor::Gray },
    TagDef { value: "shopping", label: "Shopping", color: TagColor::Green },
    TagDef { value: "health", label: "Health", color: TagColor::Orange },
    TagDef { value: "learning", label: "Learning", color: TagColor::Cyan },
    TagDef { value: "creative", label: "Creative", color: TagColor::Pink },
];

/// The whole catalog
pub fn all() -> &'static [TagDef] {
    AVAILABLE_TAGS
}

/// Find the catalog entry for a tag value
pub fn lookup(value: &str) -> Option<&'static TagDef> {
    AVAILABLE_TAGS.iter().find(|tag| tag.value == value)
}

/// Returns true if the value names a catalog tag
pub fn is_known(value: &str) -> bool {
    lookup(value).is_some()
}
