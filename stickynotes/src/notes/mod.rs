//! Note records and the in-memory note board
//!
//! A [`Note`] is a single card: rich text content, a background color, a
//! text color, independent bold/italic/underline flags and a collapsed
//! toggle. The [`NoteStore`] keeps the ordered collection together with the
//! [`Selection`] that the global style controls act on, and rewrites durable
//! storage after every mutation.
//!
//! ## Basic Usage
//!
//! ```rust
//! use stickynotes::notes::{NoteStore, StyleFlag};
//! use stickynotes::storage::{MemoryKeyValueStore, PersistenceGateway};
//!
//! # fn example() -> stickynotes::Result<()> {
//! let gateway = PersistenceGateway::new(Box::new(MemoryKeyValueStore::new()), "notes");
//! let mut store = NoteStore::load(gateway);
//!
//! let id = store.create("Buy <b>milk</b>", None, None)?;
//! store.select(&id)?;
//! store.toggle_style_flag(StyleFlag::Bold)?;
//!
//! assert!(store.get(&id).unwrap().style.bold);
//! # Ok(())
//! # }
//! ```

mod color;
mod id;
pub mod search;
mod selection;
mod store;
mod style;

pub use color::{Color, DEFAULT_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR};
pub use id::NoteId;
pub use search::{compute_visibility, display_text, escape_text, filter_visible, plain_text};
pub use selection::Selection;
pub use store::{DeleteAllOutcome, NoteRef, NoteStore, DELETE_ALL_PROMPT};
pub use style::{ColorTarget, StyleFlag, StyleFlags};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single user-authored card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Stable identity, never reused
    pub id: NoteId,
    /// Rich text payload; may embed inline markup such as `<b>` spans
    pub content: String,
    /// Color of the whole card
    pub background_color: Color,
    /// Color of the content text
    pub text_color: Color,
    /// Bold/italic/underline toggles
    pub style: StyleFlags,
    /// Whether the content is displayed truncated
    pub collapsed: bool,
    /// When the note was created
    pub created_at: DateTime<Utc>,
    /// When the note was last changed
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a note with a fresh id and default style
    pub fn new(content: impl Into<String>, background_color: Color, text_color: Color) -> Self {
        let now = Utc::now();
        Self {
            id: NoteId::new(),
            content: content.into(),
            background_color,
            text_color,
            style: StyleFlags::default(),
            collapsed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the content and bump the update timestamp
    pub fn update_content(&mut self, content: String) {
        self.content = content;
        self.touch();
    }

    /// Flip one style flag, returning its new value
    pub fn toggle_flag(&mut self, flag: StyleFlag) -> bool {
        let value = self.style.toggle(flag);
        self.touch();
        value
    }

    /// Set the background or text color
    pub fn set_color(&mut self, target: ColorTarget, color: Color) {
        match target {
            ColorTarget::Background => self.background_color = color,
            ColorTarget::Text => self.text_color = color,
        }
        self.touch();
    }

    /// Flip the collapsed toggle, returning its new value
    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.touch();
        self.collapsed
    }

    /// Content with markup removed, as matched by search
    pub fn plain_text(&self) -> String {
        plain_text(&self.content)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(content: &str) -> Note {
        Note::new(content, Color::default_background(), Color::default_text())
    }

    #[test]
    fn test_note_creation_defaults() {
        let note = note("");

        assert_eq!(note.content, "");
        assert_eq!(note.background_color.as_str(), DEFAULT_BACKGROUND_COLOR);
        assert_eq!(note.text_color.as_str(), DEFAULT_TEXT_COLOR);
        assert_eq!(note.style, StyleFlags::default());
        assert!(!note.collapsed);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_note_update_content() {
        let mut note = note("Original");
        let original_created_at = note.created_at;
        let original_updated_at = note.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(1));
        note.update_content("Updated".to_string());

        assert_eq!(note.content, "Updated");
        assert_eq!(note.created_at, original_created_at);
        assert!(note.updated_at > original_updated_at);
    }

    #[test]
    fn test_set_color_targets_one_field() {
        let mut note = note("x");
        note.set_color(ColorTarget::Text, Color::parse("red").unwrap());

        assert_eq!(note.text_color.as_str(), "red");
        assert_eq!(note.background_color.as_str(), DEFAULT_BACKGROUND_COLOR);
    }

    #[test]
    fn test_toggle_collapsed() {
        let mut note = note("x");
        assert!(note.toggle_collapsed());
        assert!(!note.toggle_collapsed());
    }

    #[test]
    fn test_note_serialization() {
        let note = note("<i>hello</i>");
        let json = serde_json::to_string(&note).unwrap();
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(note, back);
    }
}
