//! Core data structures for the cakit application.
//!
//! This module contains the Note entity and its embedded checklist items,
//! along with the serialization contract used by the persistence layer.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a note. Derived from the creation timestamp in
/// milliseconds, bumped past any existing id so it stays unique within a
/// single data directory.
pub type NoteId = i64;

/// Identifier for a checklist item, unique within its owning note.
pub type ChecklistItemId = u32;

/// A single entry in a note's checklist.
///
/// Items carry a stable per-note id so that toggling targets a specific item
/// even when two items share the same text. Records written before ids
/// existed load with `id == 0` and are renumbered by
/// [`Note::normalize_checklist_ids`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default)]
    pub id: ChecklistItemId,
    pub text: String,
    #[serde(default)]
    pub checked: bool,
}

/// Represents a single note in our system.
///
/// Field names serialize in camelCase to stay compatible with the persisted
/// record shape. All fields except `id` and `title` default when absent from
/// stored data, so partial records deserialize instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier, immutable after creation
    pub id: NoteId,
    /// Note title
    pub title: String,
    /// When the note was created, immutable after creation
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Note body text
    #[serde(default)]
    pub content: String,
    /// Background color, either a palette value or an arbitrary string
    #[serde(default = "default_color")]
    pub color: String,
    /// Optional reminder timestamp
    #[serde(default)]
    pub reminder: Option<DateTime<Utc>>,
    /// Names of tags attached to this note, referencing the tag registry
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional opaque image reference (URL or data URI)
    #[serde(default)]
    pub image: Option<String>,
    /// Ordered checklist entries
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

fn default_color() -> String {
    "#ffffff".to_string()
}

/// The fields a caller supplies when creating or committing a note. Identity
/// and creation time are assigned by the manager, never by the caller.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub color: Option<String>,
    pub reminder: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    /// Checklist entries as (text, checked) pairs; ids are assigned on commit
    pub checklist: Vec<(String, bool)>,
}

impl NoteDraft {
    /// A draft is empty when it has no title, no content, and no checklist
    /// items after trimming whitespace. Empty drafts are rejected by the
    /// manager rather than committed.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty() && self.checklist.is_empty()
    }
}

impl Note {
    /// Builds a note from a draft, assigning the given id and the current
    /// time as the creation timestamp. Checklist item ids are numbered from 1
    /// in draft order.
    pub fn from_draft(id: NoteId, draft: NoteDraft) -> Self {
        let checklist = draft
            .checklist
            .into_iter()
            .zip(1u32..)
            .map(|((text, checked), item_id)| ChecklistItem {
                id: item_id,
                text,
                checked,
            })
            .collect();

        Note {
            id,
            title: draft.title,
            created_at: Utc::now(),
            content: draft.content,
            color: draft.color.unwrap_or_else(default_color),
            reminder: draft.reminder,
            tags: draft.tags,
            image: draft.image,
            checklist,
        }
    }

    /// Turns the note back into a draft, e.g. to prefill an edit session.
    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            color: Some(self.color.clone()),
            reminder: self.reminder,
            tags: self.tags.clone(),
            image: self.image.clone(),
            checklist: self
                .checklist
                .iter()
                .map(|item| (item.text.clone(), item.checked))
                .collect(),
        }
    }

    /// Reassigns checklist item ids when stored data carries missing or
    /// duplicate ones (records written before items had ids deserialize with
    /// `id == 0` everywhere). Ids of well-formed notes are left untouched.
    pub fn normalize_checklist_ids(&mut self) {
        let mut seen = std::collections::HashSet::new();
        let well_formed = self
            .checklist
            .iter()
            .all(|item| item.id != 0 && seen.insert(item.id));
        if well_formed {
            return;
        }
        for (item, fresh_id) in self.checklist.iter_mut().zip(1u32..) {
            item.id = fresh_id;
        }
    }
}
