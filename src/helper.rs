use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{NoteError, Result};

/// The color picker palette from the original widget. `--color` accepts the
/// names; anything else passes through verbatim.
pub const COLOR_PALETTE: &[(&str, &str)] = &[
    ("white", "#ffffff"),
    ("red", "#f28b82"),
    ("orange", "#fbbc04"),
    ("yellow", "#fff475"),
    ("green", "#ccff90"),
    ("teal", "#a7ffeb"),
    ("blue", "#cbf0f8"),
    ("darkblue", "#aecbfa"),
    ("purple", "#d7aefb"),
    ("pink", "#fdcfe8"),
];

/// Resolves a palette name to its hex value; unknown strings are taken as
/// arbitrary colors and returned unchanged.
pub fn resolve_color(color: &str) -> String {
    let lowered = color.to_lowercase();
    COLOR_PALETTE
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, hex)| hex.to_string())
        .unwrap_or_else(|| color.to_string())
}

// Helper method for parsing tags
pub fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Parses a reminder timestamp: RFC 3339 first, then the datetime-local
/// format (`YYYY-MM-DDTHH:MM`) interpreted as UTC.
pub fn parse_reminder(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|_| NoteError::InvalidReminder {
            value: value.to_string(),
        })
}
