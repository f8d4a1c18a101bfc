//! The Collection Manager: owns the three note collections and the tag
//! registry, and implements every lifecycle transition.
//!
//! Invariant: a note id lives in at most one of Active, Archived, Trashed at
//! any time. All operations are synchronous; there is exactly one logical
//! writer, so no internal locking is needed. Each mutation persists the
//! collections it touched through the [`CollectionStore`]. Writes are
//! per-collection, not transactional: a crash between the two saves of a
//! cross-collection move can leave the files inconsistent, an accepted
//! limitation for a local single-user tool.

use chrono::Utc;
use log::{debug, info, warn};

use crate::{
    ChecklistItemId, CollectionStore, Note, NoteDraft, NoteId, Result, StoreKey, ViewKind,
};

/// A detached copy of a note taken for editing.
///
/// The original note stays in its collection until the session is committed;
/// dropping the session abandons the edit with no effect. Committing removes
/// the original and inserts the edited version as a fresh note.
#[derive(Debug, Clone)]
pub struct EditSession {
    note_id: NoteId,
    origin: ViewKind,
    draft: NoteDraft,
}

impl EditSession {
    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    pub fn origin(&self) -> ViewKind {
        self.origin
    }

    /// The note's current field values, for prefilling an editor.
    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }
}

/// Owns the Active, Archived, and Trashed collections plus the tag registry,
/// and orchestrates persistence. New items always enter a collection at the
/// front (most-recent-first).
pub struct NoteManager {
    notes: Vec<Note>,
    archived: Vec<Note>,
    trashed: Vec<Note>,
    tags: Vec<String>,
    store: CollectionStore,
}

impl NoteManager {
    /// Opens a manager over the given store, loading all four keyspaces.
    ///
    /// An absent keyspace yields an empty collection. A corrupt keyspace is
    /// logged and degrades to empty rather than failing the load, so the
    /// application starts with whatever data is still readable.
    pub fn open(store: CollectionStore) -> Result<Self> {
        let mut notes: Vec<Note> = store.load_or_default(StoreKey::Notes)?;
        let mut archived: Vec<Note> = store.load_or_default(StoreKey::Archived)?;
        let mut trashed: Vec<Note> = store.load_or_default(StoreKey::Trashed)?;
        let tags: Vec<String> = store.load_or_default(StoreKey::Tags)?;

        for note in notes
            .iter_mut()
            .chain(archived.iter_mut())
            .chain(trashed.iter_mut())
        {
            note.normalize_checklist_ids();
        }

        info!(
            "Loaded {} active, {} archived, {} trashed notes, {} tags",
            notes.len(),
            archived.len(),
            trashed.len(),
            tags.len()
        );

        Ok(Self {
            notes,
            archived,
            trashed,
            tags,
            store,
        })
    }

    /// Picks a fresh note id: the current time in milliseconds, bumped past
    /// every id already present in any collection so ids stay unique even
    /// for notes created within the same millisecond.
    fn next_id(&self) -> NoteId {
        let max_existing = self
            .notes
            .iter()
            .chain(&self.archived)
            .chain(&self.trashed)
            .map(|n| n.id)
            .max()
            .unwrap_or(0);
        Utc::now().timestamp_millis().max(max_existing + 1)
    }

    fn save(&self, key: StoreKey) -> Result<()> {
        match key {
            StoreKey::Notes => self.store.save(key, &self.notes),
            StoreKey::Archived => self.store.save(key, &self.archived),
            StoreKey::Trashed => self.store.save(key, &self.trashed),
            StoreKey::Tags => self.store.save(key, &self.tags),
        }
    }

    fn key_for(view: ViewKind) -> StoreKey {
        match view {
            ViewKind::Active => StoreKey::Notes,
            ViewKind::Archived => StoreKey::Archived,
            ViewKind::Trashed => StoreKey::Trashed,
        }
    }

    fn collection_mut(&mut self, view: ViewKind) -> &mut Vec<Note> {
        match view {
            ViewKind::Active => &mut self.notes,
            ViewKind::Archived => &mut self.archived,
            ViewKind::Trashed => &mut self.trashed,
        }
    }

    /// Creates a note from the draft at the front of the Active collection.
    ///
    /// Returns `Ok(None)` without writing anything when the draft is empty
    /// (no title, no content, no checklist items).
    pub fn create_note(&mut self, draft: NoteDraft) -> Result<Option<NoteId>> {
        if draft.is_empty() {
            debug!("Rejecting empty note submission");
            return Ok(None);
        }

        let id = self.next_id();
        let note = Note::from_draft(id, draft);
        self.notes.insert(0, note);
        self.save(StoreKey::Notes)?;

        info!("Created note {}", id);
        Ok(Some(id))
    }

    /// Starts editing a note found in Active or Archived (trashed notes are
    /// not editable). The returned session holds a detached copy; the note
    /// itself is left in place until [`commit_edit`](Self::commit_edit).
    pub fn begin_edit(&self, id: NoteId) -> Option<EditSession> {
        let (note, origin) = self
            .notes
            .iter()
            .find(|n| n.id == id)
            .map(|n| (n, ViewKind::Active))
            .or_else(|| {
                self.archived
                    .iter()
                    .find(|n| n.id == id)
                    .map(|n| (n, ViewKind::Archived))
            })?;

        debug!("Began edit session for note {} in {}", id, origin.name());
        Some(EditSession {
            note_id: note.id,
            origin,
            draft: note.to_draft(),
        })
    }

    /// Commits an edit session: removes the original note from its origin
    /// collection and creates the edited version as a fresh note (new id and
    /// timestamp) at the front of Active.
    ///
    /// An empty draft is rejected exactly like [`create_note`](Self::create_note),
    /// leaving the original note untouched. If the original was deleted while
    /// the session was open, the edited version is still created.
    pub fn commit_edit(&mut self, session: EditSession, draft: NoteDraft) -> Result<Option<NoteId>> {
        if draft.is_empty() {
            debug!("Rejecting empty edit of note {}", session.note_id);
            return Ok(None);
        }

        let origin = self.collection_mut(session.origin);
        let removed = if let Some(pos) = origin.iter().position(|n| n.id == session.note_id) {
            origin.remove(pos);
            true
        } else {
            warn!(
                "Note {} vanished from {} during edit, committing as new",
                session.note_id,
                session.origin.name()
            );
            false
        };

        let id = self.next_id();
        self.notes.insert(0, Note::from_draft(id, draft));

        if removed && session.origin != ViewKind::Active {
            self.save(Self::key_for(session.origin))?;
        }
        self.save(StoreKey::Notes)?;

        info!("Committed edit of note {} as note {}", session.note_id, id);
        Ok(Some(id))
    }

    /// Moves a note from Active (or, failing that, Archived) to the front of
    /// Trashed. Returns `false` without writing when the id is in neither.
    pub fn delete_note(&mut self, id: NoteId) -> Result<bool> {
        let (note, source) = if let Some(pos) = self.notes.iter().position(|n| n.id == id) {
            (self.notes.remove(pos), ViewKind::Active)
        } else if let Some(pos) = self.archived.iter().position(|n| n.id == id) {
            (self.archived.remove(pos), ViewKind::Archived)
        } else {
            debug!("delete_note: note {} not found", id);
            return Ok(false);
        };
        self.trashed.insert(0, note);

        self.save(Self::key_for(source))?;
        self.save(StoreKey::Trashed)?;

        info!("Moved note {} from {} to trash", id, source.name());
        Ok(true)
    }

    /// Moves a note from Active to the front of Archived. Returns `false`
    /// without writing when the id is not in Active.
    pub fn archive_note(&mut self, id: NoteId) -> Result<bool> {
        let Some(pos) = self.notes.iter().position(|n| n.id == id) else {
            debug!("archive_note: note {} not in active collection", id);
            return Ok(false);
        };

        let note = self.notes.remove(pos);
        self.archived.insert(0, note);

        self.save(StoreKey::Notes)?;
        self.save(StoreKey::Archived)?;

        info!("Archived note {}", id);
        Ok(true)
    }

    /// Moves a note from Archived (or, failing that, Trashed) back to the
    /// front of Active. Returns `false` without writing when the id is in
    /// neither.
    pub fn restore_note(&mut self, id: NoteId) -> Result<bool> {
        let (note, source) = if let Some(pos) = self.archived.iter().position(|n| n.id == id) {
            (self.archived.remove(pos), ViewKind::Archived)
        } else if let Some(pos) = self.trashed.iter().position(|n| n.id == id) {
            (self.trashed.remove(pos), ViewKind::Trashed)
        } else {
            debug!("restore_note: note {} not found", id);
            return Ok(false);
        };
        self.notes.insert(0, note);

        self.save(Self::key_for(source))?;
        self.save(StoreKey::Notes)?;

        info!("Restored note {} from {}", id, source.name());
        Ok(true)
    }

    /// Removes a note from Trashed for good. Idempotent: a second call for
    /// the same id is a no-op and writes nothing.
    pub fn delete_note_permanently(&mut self, id: NoteId) -> Result<bool> {
        let before = self.trashed.len();
        self.trashed.retain(|n| n.id != id);
        if self.trashed.len() == before {
            debug!("delete_note_permanently: note {} not in trash", id);
            return Ok(false);
        }

        self.save(StoreKey::Trashed)?;
        info!("Permanently deleted note {}", id);
        Ok(true)
    }

    /// Sets the checked state of a checklist item on an Active note,
    /// addressed by the item's stable id. Returns `false` without writing
    /// when the note or the item does not exist.
    pub fn update_checklist_item(
        &mut self,
        note_id: NoteId,
        item_id: ChecklistItemId,
        checked: bool,
    ) -> Result<bool> {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == note_id) else {
            debug!("update_checklist_item: note {} not active", note_id);
            return Ok(false);
        };
        let Some(item) = note.checklist.iter_mut().find(|i| i.id == item_id) else {
            debug!(
                "update_checklist_item: item {} not on note {}",
                item_id, note_id
            );
            return Ok(false);
        };

        item.checked = checked;
        self.save(StoreKey::Notes)?;
        Ok(true)
    }

    /// Adds a tag to the registry. The name is trimmed; empty names and
    /// exact duplicates are rejected without writing.
    pub fn add_tag(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() || self.tags.iter().any(|t| t == name) {
            debug!("add_tag: rejected '{}'", name);
            return Ok(false);
        }

        self.tags.push(name.to_string());
        self.save(StoreKey::Tags)?;

        info!("Added tag '{}'", name);
        Ok(true)
    }

    /// Removes a tag from the registry and strips it from every note in all
    /// three collections. Returns whether the registry contained the tag;
    /// stale references on notes are cleaned either way.
    pub fn delete_tag(&mut self, name: &str) -> Result<bool> {
        let before = self.tags.len();
        self.tags.retain(|t| t != name);
        let was_registered = self.tags.len() != before;

        let mut touched = Vec::new();
        for view in [ViewKind::Active, ViewKind::Archived, ViewKind::Trashed] {
            let mut changed = false;
            for note in self.collection_mut(view).iter_mut() {
                let count = note.tags.len();
                note.tags.retain(|t| t != name);
                changed |= note.tags.len() != count;
            }
            if changed {
                touched.push(view);
            }
        }

        if !was_registered && touched.is_empty() {
            debug!("delete_tag: '{}' not registered and not in use", name);
            return Ok(false);
        }

        if was_registered {
            self.save(StoreKey::Tags)?;
        }
        for view in touched {
            self.save(Self::key_for(view))?;
        }

        info!("Deleted tag '{}'", name);
        Ok(was_registered)
    }

    /// Number of Active notes carrying the given tag.
    pub fn tag_usage(&self, name: &str) -> usize {
        self.notes
            .iter()
            .filter(|n| n.tags.iter().any(|t| t == name))
            .count()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn archived(&self) -> &[Note] {
        &self.archived
    }

    pub fn trashed(&self) -> &[Note] {
        &self.trashed
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The collection backing a given view.
    pub fn collection(&self, view: ViewKind) -> &[Note] {
        match view {
            ViewKind::Active => &self.notes,
            ViewKind::Archived => &self.archived,
            ViewKind::Trashed => &self.trashed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn manager() -> (NoteManager, TempDir) {
        let dir = tempdir().unwrap();
        let store = CollectionStore::open(dir.path()).unwrap();
        (NoteManager::open(store).unwrap(), dir)
    }

    fn draft(title: &str, content: &str) -> NoteDraft {
        NoteDraft {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    fn ids(notes: &[Note]) -> Vec<NoteId> {
        notes.iter().map(|n| n.id).collect()
    }

    /// The lifecycle invariant: every id in at most one collection.
    fn assert_disjoint(m: &NoteManager) {
        let mut all = ids(m.notes());
        all.extend(ids(m.archived()));
        all.extend(ids(m.trashed()));
        let mut dedup = all.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(all.len(), dedup.len(), "note id present in two collections");
    }

    #[test]
    fn created_note_round_trips_through_storage() {
        let dir = tempdir().unwrap();
        let id = {
            let store = CollectionStore::open(dir.path()).unwrap();
            let mut m = NoteManager::open(store).unwrap();
            m.create_note(NoteDraft {
                title: "Cat food".into(),
                content: "order more".into(),
                color: Some("#f28b82".into()),
                tags: vec!["pets".into()],
                checklist: vec![("dry".into(), false), ("wet".into(), true)],
                ..Default::default()
            })
            .unwrap()
            .unwrap()
        };

        let store = CollectionStore::open(dir.path()).unwrap();
        let reloaded = NoteManager::open(store).unwrap();
        assert_eq!(reloaded.notes().len(), 1);
        let note = &reloaded.notes()[0];
        assert_eq!(note.id, id);
        assert_eq!(note.title, "Cat food");
        assert_eq!(note.color, "#f28b82");
        assert_eq!(note.tags, vec!["pets".to_string()]);
        assert_eq!(note.checklist.len(), 2);
        assert!(note.checklist[1].checked);
    }

    #[test]
    fn empty_draft_is_rejected_without_write() {
        let (mut m, dir) = manager();
        let result = m.create_note(draft("  ", "")).unwrap();
        assert!(result.is_none());
        assert!(m.notes().is_empty());
        // Nothing was ever persisted.
        assert!(!dir.path().join(StoreKey::Notes.file_name()).exists());
    }

    #[test]
    fn draft_with_only_checklist_is_accepted() {
        let (mut m, _dir) = manager();
        let id = m
            .create_note(NoteDraft {
                checklist: vec![("just a task".into(), false)],
                ..Default::default()
            })
            .unwrap();
        assert!(id.is_some());
    }

    #[test]
    fn new_notes_go_to_the_front() {
        let (mut m, _dir) = manager();
        let first = m.create_note(draft("first", "")).unwrap().unwrap();
        let second = m.create_note(draft("second", "")).unwrap().unwrap();
        assert!(second > first);
        assert_eq!(ids(m.notes()), vec![second, first]);
    }

    #[test]
    fn archive_then_delete_lands_in_trash() {
        let (mut m, _dir) = manager();
        let keep = m.create_note(draft("keep", "")).unwrap().unwrap();
        let id = m.create_note(draft("doomed", "")).unwrap().unwrap();

        assert!(m.archive_note(id).unwrap());
        assert_eq!(ids(m.archived()), vec![id]);
        assert_disjoint(&m);

        assert!(m.delete_note(id).unwrap());
        assert_eq!(ids(m.notes()), vec![keep]);
        assert!(m.archived().is_empty());
        assert_eq!(ids(m.trashed()), vec![id]);
        assert_disjoint(&m);
    }

    #[test]
    fn archive_only_touches_active() {
        let (mut m, _dir) = manager();
        let id = m.create_note(draft("n", "")).unwrap().unwrap();
        assert!(m.archive_note(id).unwrap());
        // Already archived, not in Active anymore.
        assert!(!m.archive_note(id).unwrap());
    }

    #[test]
    fn restore_brings_notes_back_to_active() {
        let (mut m, _dir) = manager();
        let a = m.create_note(draft("a", "")).unwrap().unwrap();
        let b = m.create_note(draft("b", "")).unwrap().unwrap();

        m.archive_note(a).unwrap();
        m.delete_note(b).unwrap();
        assert!(m.notes().is_empty());

        assert!(m.restore_note(a).unwrap());
        assert!(m.restore_note(b).unwrap());
        assert_eq!(ids(m.notes()), vec![b, a]);
        assert!(m.archived().is_empty());
        assert!(m.trashed().is_empty());
        assert_disjoint(&m);

        assert!(!m.restore_note(a).unwrap());
    }

    #[test]
    fn permanent_delete_is_idempotent() {
        let (mut m, _dir) = manager();
        let id = m.create_note(draft("gone", "")).unwrap().unwrap();
        m.delete_note(id).unwrap();

        assert!(m.delete_note_permanently(id).unwrap());
        assert!(m.trashed().is_empty());
        assert!(!m.delete_note_permanently(id).unwrap());
    }

    #[test]
    fn permanent_delete_ignores_active_notes() {
        let (mut m, _dir) = manager();
        let id = m.create_note(draft("still here", "")).unwrap().unwrap();
        assert!(!m.delete_note_permanently(id).unwrap());
        assert_eq!(m.notes().len(), 1);
    }

    #[test]
    fn checklist_item_updates_by_stable_id() {
        let (mut m, _dir) = manager();
        let id = m
            .create_note(NoteDraft {
                title: "chores".into(),
                checklist: vec![("laundry".into(), false), ("laundry".into(), false)],
                ..Default::default()
            })
            .unwrap()
            .unwrap();

        // Duplicate text, distinct ids: only the second item flips.
        let second_item = m.notes()[0].checklist[1].id;
        assert!(m.update_checklist_item(id, second_item, true).unwrap());
        assert!(!m.notes()[0].checklist[0].checked);
        assert!(m.notes()[0].checklist[1].checked);

        assert!(!m.update_checklist_item(id, 99, true).unwrap());
        assert!(!m.update_checklist_item(404, second_item, true).unwrap());
    }

    #[test]
    fn add_tag_trims_and_rejects_duplicates() {
        let (mut m, _dir) = manager();
        assert!(m.add_tag("  work ").unwrap());
        assert_eq!(m.tags(), ["work"]);
        assert!(!m.add_tag("work").unwrap());
        assert!(!m.add_tag("   ").unwrap());
        assert_eq!(m.tags().len(), 1);
    }

    #[test]
    fn delete_tag_cleans_registry_and_all_collections() {
        let (mut m, _dir) = manager();
        m.add_tag("x").unwrap();
        m.add_tag("y").unwrap();

        let tagged = |title: &str| NoteDraft {
            title: title.into(),
            tags: vec!["x".into()],
            ..Default::default()
        };
        m.create_note(tagged("active")).unwrap().unwrap();
        let arch = m.create_note(tagged("archived")).unwrap().unwrap();
        let gone = m.create_note(tagged("trashed")).unwrap().unwrap();
        m.archive_note(arch).unwrap();
        m.delete_note(gone).unwrap();

        assert!(m.delete_tag("x").unwrap());
        assert_eq!(m.tags(), ["y"]);
        assert!(m.notes().iter().all(|n| n.tags.is_empty()));
        assert!(m.archived().iter().all(|n| n.tags.is_empty()));
        assert!(m.trashed().iter().all(|n| n.tags.is_empty()));

        assert!(!m.delete_tag("x").unwrap());
    }

    #[test]
    fn delete_tag_survives_reload() {
        let dir = tempdir().unwrap();
        {
            let store = CollectionStore::open(dir.path()).unwrap();
            let mut m = NoteManager::open(store).unwrap();
            m.add_tag("x").unwrap();
            m.create_note(NoteDraft {
                title: "n".into(),
                tags: vec!["x".into()],
                ..Default::default()
            })
            .unwrap();
            m.delete_tag("x").unwrap();
        }

        let store = CollectionStore::open(dir.path()).unwrap();
        let m = NoteManager::open(store).unwrap();
        assert!(m.tags().is_empty());
        assert!(m.notes()[0].tags.is_empty());
    }

    #[test]
    fn edit_session_leaves_original_in_place_until_commit() {
        let (mut m, _dir) = manager();
        let id = m.create_note(draft("original", "body")).unwrap().unwrap();

        let session = m.begin_edit(id).unwrap();
        assert_eq!(session.draft().title, "original");
        assert_eq!(ids(m.notes()), vec![id]);

        // Abandoning the session changes nothing.
        drop(session);
        assert_eq!(ids(m.notes()), vec![id]);

        let session = m.begin_edit(id).unwrap();
        let new_id = m
            .commit_edit(session, draft("edited", "body"))
            .unwrap()
            .unwrap();
        assert_ne!(new_id, id);
        assert_eq!(ids(m.notes()), vec![new_id]);
        assert_eq!(m.notes()[0].title, "edited");
        assert_disjoint(&m);
    }

    #[test]
    fn edit_covers_archived_but_not_trashed() {
        let (mut m, _dir) = manager();
        let arch = m.create_note(draft("arch", "")).unwrap().unwrap();
        let gone = m.create_note(draft("gone", "")).unwrap().unwrap();
        m.archive_note(arch).unwrap();
        m.delete_note(gone).unwrap();

        assert!(m.begin_edit(gone).is_none());

        let session = m.begin_edit(arch).unwrap();
        assert_eq!(session.origin(), ViewKind::Archived);
        let new_id = m
            .commit_edit(session, draft("arch v2", ""))
            .unwrap()
            .unwrap();
        assert!(m.archived().is_empty());
        assert_eq!(ids(m.notes()), vec![new_id]);
        assert_disjoint(&m);
    }

    #[test]
    fn empty_edit_commit_is_rejected_and_original_survives() {
        let (mut m, _dir) = manager();
        let id = m.create_note(draft("keep me", "")).unwrap().unwrap();
        let session = m.begin_edit(id).unwrap();

        let result = m.commit_edit(session, draft("", "")).unwrap();
        assert!(result.is_none());
        assert_eq!(ids(m.notes()), vec![id]);
    }

    #[test]
    fn collection_lookup_matches_views() {
        let (mut m, _dir) = manager();
        let a = m.create_note(draft("a", "")).unwrap().unwrap();
        let b = m.create_note(draft("b", "")).unwrap().unwrap();
        m.archive_note(a).unwrap();
        m.delete_note(b).unwrap();

        assert!(m.collection(ViewKind::Active).is_empty());
        assert_eq!(ids(m.collection(ViewKind::Archived)), vec![a]);
        assert_eq!(ids(m.collection(ViewKind::Trashed)), vec![b]);
    }

    #[test]
    fn state_survives_reload() {
        let dir = tempdir().unwrap();
        let (a, b) = {
            let store = CollectionStore::open(dir.path()).unwrap();
            let mut m = NoteManager::open(store).unwrap();
            let a = m.create_note(draft("a", "")).unwrap().unwrap();
            let b = m.create_note(draft("b", "")).unwrap().unwrap();
            m.archive_note(a).unwrap();
            m.add_tag("todo").unwrap();
            (a, b)
        };

        let store = CollectionStore::open(dir.path()).unwrap();
        let m = NoteManager::open(store).unwrap();
        assert_eq!(ids(m.notes()), vec![b]);
        assert_eq!(ids(m.archived()), vec![a]);
        assert_eq!(m.tags(), ["todo"]);
        assert_disjoint(&m);
    }
}
