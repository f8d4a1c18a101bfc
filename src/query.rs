//! Read-only views over the note collections: view selection, substring
//! filtering, and fuzzy-ranked search.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::{debug, info};

use crate::Note;

/// Which of the three collections a caller wants to look at. Passed
/// explicitly into queries and rendering instead of living in process-wide
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewKind {
    #[default]
    Active,
    Archived,
    Trashed,
}

impl ViewKind {
    /// Maps a view name to a collection, defaulting to Active for anything
    /// unrecognized.
    pub fn from_name(name: &str) -> Self {
        match name {
            "archive" | "archived" => ViewKind::Archived,
            "trash" | "trashed" => ViewKind::Trashed,
            _ => ViewKind::Active,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Active => "notes",
            ViewKind::Archived => "archive",
            ViewKind::Trashed => "trash",
        }
    }
}

/// Case-insensitive substring filter against title, content, or any tag
/// name. Preserves collection order and never mutates. An empty search term
/// matches every note.
pub fn filter_notes<'a>(notes: &'a [Note], search_term: &str) -> Vec<&'a Note> {
    let term = search_term.to_lowercase();
    notes
        .iter()
        .filter(|note| {
            note.title.to_lowercase().contains(&term)
                || note.content.to_lowercase().contains(&term)
                || note.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
        })
        .collect()
}

/// Searches notes by title and content using fuzzy matching, returning
/// matches sorted by relevance. Title matches are weighted more heavily than
/// content matches.
pub fn search_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    info!("Searching {} notes with query: '{}'", notes.len(), query);
    let matcher = SkimMatcherV2::default();

    let mut matched: Vec<(i64, &Note)> = notes
        .iter()
        .filter_map(|note| {
            let title_score = matcher.fuzzy_match(&note.title, query).unwrap_or(0);
            let content_score = matcher.fuzzy_match(&note.content, query).unwrap_or(0);
            let final_score = title_score * 2 + content_score;
            (final_score > 0).then_some((final_score, note))
        })
        .collect();

    matched.sort_by(|a, b| b.0.cmp(&a.0));
    debug!("Found {} matching notes", matched.len());

    matched.into_iter().map(|(_, note)| note).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoteDraft;

    fn note(id: i64, title: &str, content: &str, tags: &[&str]) -> Note {
        Note::from_draft(
            id,
            NoteDraft {
                title: title.into(),
                content: content.into(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn filter_matches_title_case_insensitively() {
        let notes = vec![
            note(1, "Cat food", "", &[]),
            note(2, "Dog walk", "", &[]),
        ];

        let hits = filter_notes(&notes, "cat");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Cat food");

        let hits = filter_notes(&notes, "CAT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Cat food");
    }

    #[test]
    fn filter_matches_content_and_tags() {
        let notes = vec![
            note(1, "a", "buy groceries", &[]),
            note(2, "b", "", &["groceries"]),
            note(3, "c", "unrelated", &["other"]),
        ];

        let hits = filter_notes(&notes, "grocer");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn filter_preserves_order_and_empty_term_matches_all() {
        let notes = vec![note(3, "third", "", &[]), note(1, "first", "", &[])];
        let hits = filter_notes(&notes, "");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 3);
        assert_eq!(hits[1].id, 1);
    }

    #[test]
    fn view_kind_defaults_to_active_for_unknown_names() {
        assert_eq!(ViewKind::from_name("notes"), ViewKind::Active);
        assert_eq!(ViewKind::from_name("archive"), ViewKind::Archived);
        assert_eq!(ViewKind::from_name("trash"), ViewKind::Trashed);
        assert_eq!(ViewKind::from_name("bogus"), ViewKind::Active);
    }

    #[test]
    fn search_ranks_title_matches_first() {
        let notes = vec![
            note(1, "meeting notes", "", &[]),
            note(2, "misc", "meeting agenda from monday", &[]),
        ];
        let hits = search_notes(&notes, "meeting");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 1);
    }
}
