//! Durable storage for the note collection
//!
//! The whole collection lives under one fixed key of a [`KeyValueStore`], as
//! a JSON array in collection order. [`PersistenceGateway::save`] rewrites
//! that key after every mutation; [`PersistenceGateway::load`] reads it back
//! and never fails: an absent or corrupt value is an empty collection.

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::{MemoryKeyValueStore, MemoryStoreConfig};

use crate::error::{NotesError, Result};
use crate::notes::{Color, Note, NoteId, StyleFlags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key under which the collection is stored unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "notes";

/// A string key/value store in the manner of browser local storage
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Persisted shape of one note
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    background_color: Option<String>,
    /// Older boards stored the background under this name
    #[serde(default, rename = "bgColor", skip_serializing)]
    legacy_background_color: Option<String>,
    #[serde(default)]
    text_color: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underline: bool,
    #[serde(default)]
    collapsed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<&Note> for PersistedNote {
    fn from(note: &Note) -> Self {
        Self {
            id: Some(note.id.to_string()),
            content: Some(note.content.clone()),
            background_color: Some(note.background_color.to_string()),
            legacy_background_color: None,
            text_color: Some(note.text_color.to_string()),
            bold: note.style.bold,
            italic: note.style.italic,
            underline: note.style.underline,
            collapsed: note.collapsed,
            created_at: Some(note.created_at),
            updated_at: Some(note.updated_at),
        }
    }
}

/// Reads and writes the note collection under a single key
pub struct PersistenceGateway {
    backend: Box<dyn KeyValueStore>,
    key: String,
    default_background: Color,
    default_text: Color,
}

impl PersistenceGateway {
    /// Create a gateway over `backend` storing under `key`
    pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            default_background: Color::default_background(),
            default_text: Color::default_text(),
        }
    }

    /// Override the colors given to new notes and to persisted notes whose
    /// colors are missing or invalid
    pub fn with_default_colors(mut self, background: Color, text: Color) -> Self {
        self.default_background = background;
        self.default_text = text;
        self
    }

    /// The storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Default background color for new notes
    pub fn default_background(&self) -> &Color {
        &self.default_background
    }

    /// Default text color for new notes
    pub fn default_text(&self) -> &Color {
        &self.default_text
    }

    /// Serialize the whole collection and overwrite the stored value.
    ///
    /// Returns only after the backend accepted the write.
    pub fn save(&self, notes: &[Note]) -> Result<()> {
        let records: Vec<PersistedNote> = notes.iter().map(PersistedNote::from).collect();
        let json = serde_json::to_string(&records)
            .map_err(|e| NotesError::PersistenceWrite(e.to_string()))?;

        self.backend
            .set_item(&self.key, &json)
            .map_err(|e| NotesError::PersistenceWrite(e.to_string()))?;

        tracing::debug!("Saved {} notes under key '{}'", notes.len(), self.key);
        Ok(())
    }

    /// Read the stored collection, failing soft to an empty one
    pub fn load(&self) -> Vec<Note> {
        match self.try_load() {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!("{}; starting with an empty board", e);
                Vec::new()
            }
        }
    }

    /// Read the stored collection, reporting why it could not be read
    pub fn try_load(&self) -> Result<Vec<Note>> {
        let raw = self
            .backend
            .get_item(&self.key)
            .map_err(|e| NotesError::PersistenceRead(e.to_string()))?;

        let Some(raw) = raw else {
            tracing::debug!("No notes stored under key '{}'", self.key);
            return Ok(Vec::new());
        };

        let records: Option<Vec<PersistedNote>> = serde_json::from_str(&raw)
            .map_err(|e| NotesError::PersistenceRead(format!("key '{}': {}", self.key, e)))?;

        let mut seen = HashSet::new();
        let notes: Vec<Note> = records
            .unwrap_or_default()
            .into_iter()
            .map(|record| self.restore(record, &mut seen))
            .collect();

        tracing::debug!("Loaded {} notes from key '{}'", notes.len(), self.key);
        Ok(notes)
    }

    fn restore(&self, record: PersistedNote, seen: &mut HashSet<NoteId>) -> Note {
        let color = |value: Option<String>, default: &Color| {
            value.map_or_else(|| default.clone(), |v| Color::parse_or(&v, default))
        };

        let mut note = Note::new(
            record.content.unwrap_or_default(),
            color(
                record.background_color.or(record.legacy_background_color),
                &self.default_background,
            ),
            color(record.text_color, &self.default_text),
        );

        // Entries without a usable id keep the fresh one from Note::new.
        if let Some(id) = record.id.and_then(|id| NoteId::from_string(&id).ok()) {
            if !seen.contains(&id) {
                note.id = id;
            }
        }
        seen.insert(note.id.clone());

        note.style = StyleFlags {
            bold: record.bold,
            italic: record.italic,
            underline: record.underline,
        };
        note.collapsed = record.collapsed;
        if let Some(created_at) = record.created_at {
            note.created_at = created_at;
        }
        note.updated_at = record.updated_at.unwrap_or(note.created_at);
        note
    }
}
