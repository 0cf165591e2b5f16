//! The in-memory note collection
//!
//! [`NoteStore`] is the single source of truth during a session. Notes are
//! kept in insertion order and every mutating call persists the full
//! collection exactly once through the [`PersistenceGateway`] before
//! returning. When the write fails the in-memory change stands and the call
//! returns [`NotesError::PersistenceWrite`], so the caller can warn that the
//! change is not durable.

use super::{search, Color, Note, NoteId, Selection};
use crate::error::{NotesError, Result};
use crate::storage::PersistenceGateway;
use std::collections::HashMap;

/// Question put to the user before clearing the board
pub const DELETE_ALL_PROMPT: &str = "Are you sure you want to delete all notes?";

/// What a delete-all request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAllOutcome {
    /// The user confirmed; this many notes were removed
    Cleared(usize),
    /// The user declined; nothing changed
    Declined,
}

/// A user reference to a note: its id, or its 1-based position on the board
/// at the time the reference is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteRef {
    /// Full note id
    Id(NoteId),
    /// 1-based display position
    Position(usize),
}

impl std::str::FromStr for NoteRef {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(position) = s.parse::<usize>() {
            return Ok(NoteRef::Position(position));
        }
        NoteId::from_string(s).map(NoteRef::Id)
    }
}

/// Ordered note collection with its selection and persistence
pub struct NoteStore {
    notes: Vec<Note>,
    selection: Selection,
    gateway: PersistenceGateway,
}

impl NoteStore {
    /// Build the store from whatever the gateway has persisted
    pub fn load(gateway: PersistenceGateway) -> Self {
        let notes = gateway.load();
        tracing::debug!("Note store opened with {} notes", notes.len());
        Self {
            notes,
            selection: Selection::default(),
            gateway,
        }
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// The selection survives only if its note is still present.
    pub fn reload(&mut self) {
        self.notes = self.gateway.load();
        if let Some(id) = self.selection.selected().cloned() {
            if !self.contains(&id) {
                self.selection.clear();
            }
        }
    }

    /// Append a new note and persist. Colors default to the gateway defaults.
    pub fn create(
        &mut self,
        content: impl Into<String>,
        background_color: Option<Color>,
        text_color: Option<Color>,
    ) -> Result<NoteId> {
        let note = Note::new(
            content,
            background_color.unwrap_or_else(|| self.gateway.default_background().clone()),
            text_color.unwrap_or_else(|| self.gateway.default_text().clone()),
        );
        let id = note.id.clone();
        tracing::debug!("Created note {}", id);
        self.notes.push(note);
        self.persist()?;
        Ok(id)
    }

    /// Remove a note if present, clearing the selection if it pointed at it.
    ///
    /// Deleting an absent note is a no-op returning `false`.
    pub fn delete(&mut self, id: &NoteId) -> Result<bool> {
        let Some(index) = self.position(id) else {
            tracing::debug!("Delete of absent note {} ignored", id);
            return Ok(false);
        };

        self.notes.remove(index);
        if self.selection.clear_if(id) {
            tracing::debug!("Selected note {} deleted, selection cleared", id);
        }
        self.persist()?;
        Ok(true)
    }

    /// Clear the board after the user confirms.
    ///
    /// Fails with [`NotesError::EmptyCollection`] without asking when there
    /// is nothing to delete.
    pub fn delete_all<F>(&mut self, confirm: F) -> Result<DeleteAllOutcome>
    where
        F: FnOnce() -> bool,
    {
        if self.notes.is_empty() {
            return Err(NotesError::EmptyCollection);
        }
        if !confirm() {
            return Ok(DeleteAllOutcome::Declined);
        }

        let removed = self.notes.len();
        self.notes.clear();
        self.selection.clear();
        tracing::debug!("Deleted all {} notes", removed);
        self.persist()?;
        Ok(DeleteAllOutcome::Cleared(removed))
    }

    /// Replace a note's content and persist; returns `false` if the note no
    /// longer exists.
    pub fn update_content(&mut self, id: &NoteId, content: impl Into<String>) -> Result<bool> {
        let Some(note) = self.get_mut(id) else {
            return Ok(false);
        };
        note.update_content(content.into());
        self.persist()?;
        Ok(true)
    }

    /// Expand or collapse a note and persist; `None` if the note is gone
    pub fn toggle_collapsed(&mut self, id: &NoteId) -> Result<Option<bool>> {
        let Some(note) = self.get_mut(id) else {
            return Ok(None);
        };
        let collapsed = note.toggle_collapsed();
        self.persist()?;
        Ok(Some(collapsed))
    }

    /// Select an existing note, returning the previously selected one
    pub fn select(&mut self, id: &NoteId) -> Result<Option<NoteId>> {
        if !self.contains(id) {
            return Err(NotesError::NoteNotFound(id.to_string()));
        }
        Ok(self.selection.select(id.clone()))
    }

    /// Drop the selection
    pub fn clear_selection(&mut self) -> Option<NoteId> {
        self.selection.clear()
    }

    /// Current selection state
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selected note, if any
    pub fn selected_note(&self) -> Option<&Note> {
        self.selection.selected().and_then(|id| self.get(id))
    }

    /// All notes in insertion order
    pub fn all(&self) -> &[Note] {
        &self.notes
    }

    /// Look up a note
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    /// Whether a note exists
    pub fn contains(&self, id: &NoteId) -> bool {
        self.position(id).is_some()
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the board is empty
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Visibility of every note for a search query
    pub fn visibility(&self, query: &str) -> HashMap<NoteId, bool> {
        search::compute_visibility(query, &self.notes)
    }

    /// Resolve a user reference to an id of an existing note
    pub fn resolve(&self, note_ref: &NoteRef) -> Result<NoteId> {
        match note_ref {
            NoteRef::Id(id) if self.contains(id) => Ok(id.clone()),
            NoteRef::Id(id) => Err(NotesError::NoteNotFound(id.to_string())),
            NoteRef::Position(position) => position
                .checked_sub(1)
                .and_then(|index| self.notes.get(index))
                .map(|note| note.id.clone())
                .ok_or_else(|| NotesError::NoteNotFound(format!("#{}", position))),
        }
    }

    /// The gateway this store persists through
    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    pub(crate) fn get_mut(&mut self, id: &NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| &note.id == id)
    }

    pub(crate) fn selected_note_mut(&mut self) -> Result<&mut Note> {
        let id = self.selection.selected().cloned().ok_or(NotesError::NoSelection)?;
        self.get_mut(&id).ok_or(NotesError::NoSelection)
    }

    pub(crate) fn persist(&self) -> Result<()> {
        self.gateway.save(&self.notes)
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|note| &note.id == id)
    }
}
