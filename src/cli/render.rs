//! Terminal rendering of loops and views.

use colored::{Color, ColoredString, Colorize};

use loops::domain::{Loop, MAX_ENERGY, TagColor, TagDef, tag};
use loops::id::short_id;
use loops::views::LoopStats;

use crate::config::DisplayConfig;

pub fn tag_color(color: TagColor) -> Color {
    match color {
        TagColor::Blue => Color::Blue,
        TagColor::Purple => Color::Magenta,
        TagColor::Red => Color::Red,
        TagColor::Gray => Color::BrightBlack,
        TagColor::Green => Color::Green,
        TagColor::Orange => Color::TrueColor { r: 255, g: 165, b: 0 },
        TagColor::Cyan => Color::Cyan,
        TagColor::Pink => Color::BrightMagenta,
    }
}

/// A tag rendered as `[Label]` in its catalog color.
/// Values missing from the catalog are dropped, as in the catalog pill.
pub fn tag_pill(value: &str) -> Option<ColoredString> {
    tag::lookup(value).map(|def| format!("[{}]", def.label).color(tag_color(def.color)))
}

/// Five-slot bar, e.g. `●●●○○`
pub fn energy_bar(level: u8) -> String {
    let filled = level.min(MAX_ENERGY) as usize;
    let empty = MAX_ENERGY as usize - filled;
    format!("{}{}", "●".repeat(filled), "○".repeat(empty))
}

/// One-line summary of a loop
pub fn loop_line(record: &Loop, display: &DisplayConfig) -> String {
    let mut parts: Vec<String> = Vec::new();

    if display.show_ids {
        parts.push(short_id(&record.id).dimmed().to_string());
    }

    let marker = if record.is_open() { "○".normal() } else { "✓".green() };
    parts.push(marker.to_string());

    let content = if record.is_open() {
        record.content.normal()
    } else {
        record.content.strikethrough().dimmed()
    };
    parts.push(content.to_string());

    for pill in record.tags.iter().filter_map(|t| tag_pill(t)) {
        parts.push(pill.to_string());
    }

    // Energy only matters while the loop is still draining
    if let Some(level) = record.energy_level {
        if record.is_open() {
            parts.push(energy_bar(level).yellow().to_string());
        }
    }

    parts.push(record.updated_at.format(&display.date_format).to_string().dimmed().to_string());
    parts.join(" ")
}

/// Multi-line detail view of a loop
pub fn loop_detail(record: &Loop, display: &DisplayConfig) -> String {
    let fmt = display.date_format.as_str();
    let mut lines = vec![
        format!("{} {}", "ID:".bold(), record.id),
        format!("{} {}", "Content:".bold(), record.content),
        format!("{} {}", "Status:".bold(), record.status),
        format!("{} {}", "Created:".bold(), record.created_at.format(fmt)),
        format!("{} {}", "Updated:".bold(), record.updated_at.format(fmt)),
    ];
    if let Some(closed_at) = record.closed_at {
        lines.push(format!("{} {}", "Closed:".bold(), closed_at.format(fmt)));
    }
    if !record.tags.is_empty() {
        let pills: Vec<String> = record
            .tags
            .iter()
            .map(|t| tag_pill(t).map(|p| p.to_string()).unwrap_or_else(|| t.clone()))
            .collect();
        lines.push(format!("{} {}", "Tags:".bold(), pills.join(" ")));
    }
    if let Some(level) = record.energy_level {
        lines.push(format!("{} {} {}/{}", "Energy:".bold(), energy_bar(level), level, MAX_ENERGY));
    }
    lines.join("\n")
}

pub fn tag_catalog_line(def: &TagDef) -> String {
    format!("{:<10} {}", def.value, format!("[{}]", def.label).color(tag_color(def.color)))
}

pub fn stats_line(stats: &LoopStats) -> String {
    let mut line = format!(
        "{} open  {} closed",
        stats.open.to_string().bold(),
        stats.closed.to_string().bold()
    );
    if stats.energy_drain > 0 {
        line.push_str(&format!("  {} energy drain", stats.energy_drain.to_string().yellow().bold()));
    }
    line
}

/// Message for an empty open board, mentioning how many loops were closed
pub fn empty_message(stats: &LoopStats) -> String {
    match stats.closed {
        0 => "No loops yet. Your mind is clear!".to_string(),
        1 => "Your mind is clear. Great work closing 1 loop!".to_string(),
        n => format!("Your mind is clear. Great work closing {} loops!", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> DisplayConfig {
        colored::control::set_override(false);
        DisplayConfig::default()
    }

    #[test]
    fn test_energy_bar() {
        assert_eq!(energy_bar(0), "○○○○○");
        assert_eq!(energy_bar(3), "●●●○○");
        assert_eq!(energy_bar(5), "●●●●●");
        assert_eq!(energy_bar(9), "●●●●●");
    }

    #[test]
    fn test_tag_pill_unknown_is_none() {
        assert!(tag_pill("errands").is_none());
        assert!(tag_pill("work").is_some());
    }

    #[test]
    fn test_loop_line_open() {
        let display = plain();
        let record = Loop::new("Finish report", vec!["work".to_string()], Some(4)).unwrap();
        let line = loop_line(&record, &display);

        assert!(line.starts_with(short_id(&record.id)));
        assert!(line.contains("Finish report"));
        assert!(line.contains("[Work]"));
        assert!(line.contains("●●●●○"));
    }

    #[test]
    fn test_loop_line_closed_hides_energy() {
        let display = plain();
        let mut record = Loop::new("Finish report", vec![], Some(4)).unwrap();
        record.toggle();
        let line = loop_line(&record, &display);

        assert!(line.contains("✓"));
        assert!(!line.contains("●"));
    }

    #[test]
    fn test_loop_line_without_ids() {
        let mut display = plain();
        display.show_ids = false;
        let record = Loop::new("x", vec![], None).unwrap();
        assert!(loop_line(&record, &display).starts_with("○ x"));
    }

    #[test]
    fn test_loop_detail() {
        let display = plain();
        let mut record = Loop::new("x", vec!["health".to_string()], Some(2)).unwrap();
        record.toggle();
        let detail = loop_detail(&record, &display);

        assert!(detail.contains(&record.id));
        assert!(detail.contains("Status: closed"));
        assert!(detail.contains("Closed:"));
        assert!(detail.contains("[Health]"));
        assert!(detail.contains("2/5"));
    }

    #[test]
    fn test_stats_line() {
        plain();
        let stats = LoopStats { open: 2, closed: 1, energy_drain: 7 };
        assert_eq!(stats_line(&stats), "2 open  1 closed  7 energy drain");

        let stats = LoopStats { open: 0, closed: 0, energy_drain: 0 };
        assert_eq!(stats_line(&stats), "0 open  0 closed");
    }

    #[test]
    fn test_empty_message() {
        let none = LoopStats::default();
        assert_eq!(empty_message(&none), "No loops yet. Your mind is clear!");

        let one = LoopStats { open: 0, closed: 1, energy_drain: 0 };
        assert_eq!(empty_message(&one), "Your mind is clear. Great work closing 1 loop!");

        let many = LoopStats { open: 0, closed: 3, energy_drain: 0 };
        assert_eq!(empty_message(&many), "Your mind is clear. Great work closing 3 loops!");
    }
}
