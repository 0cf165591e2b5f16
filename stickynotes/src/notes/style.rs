//! Style flags and the global style controls
//!
//! The controls are shared by the whole board but act on the selected note
//! only. With nothing selected they fail with [`NotesError::NoSelection`]
//! and change nothing.

use super::{Color, NoteStore};
use crate::error::{NotesError, Result};
use serde::{Deserialize, Serialize};

/// One of the independent text style toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleFlag {
    /// Bold text
    Bold,
    /// Italic text
    Italic,
    /// Underlined text
    Underline,
}

impl StyleFlag {
    /// All flags in display order
    pub const ALL: [StyleFlag; 3] = [StyleFlag::Bold, StyleFlag::Italic, StyleFlag::Underline];

    /// Lowercase name of the flag
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleFlag::Bold => "bold",
            StyleFlag::Italic => "italic",
            StyleFlag::Underline => "underline",
        }
    }
}

impl std::fmt::Display for StyleFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StyleFlag {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bold" | "b" => Ok(StyleFlag::Bold),
            "italic" | "i" => Ok(StyleFlag::Italic),
            "underline" | "u" => Ok(StyleFlag::Underline),
            other => Err(NotesError::Other(format!("Unknown style flag: {}", other))),
        }
    }
}

/// Active state of each style flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleFlags {
    /// Bold toggle
    pub bold: bool,
    /// Italic toggle
    pub italic: bool,
    /// Underline toggle
    pub underline: bool,
}

impl StyleFlags {
    /// Whether `flag` is active
    pub fn is_set(&self, flag: StyleFlag) -> bool {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
        }
    }

    /// Flip `flag`, leaving the others untouched; returns the new value
    pub fn toggle(&mut self, flag: StyleFlag) -> bool {
        let slot = match flag {
            StyleFlag::Bold => &mut self.bold,
            StyleFlag::Italic => &mut self.italic,
            StyleFlag::Underline => &mut self.underline,
        };
        *slot = !*slot;
        *slot
    }

    /// Active flags in display order
    pub fn active(&self) -> Vec<StyleFlag> {
        StyleFlag::ALL
            .into_iter()
            .filter(|flag| self.is_set(*flag))
            .collect()
    }
}

/// Which color of a note a color control sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTarget {
    /// The card background
    Background,
    /// The content text
    Text,
}

impl std::str::FromStr for ColorTarget {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "background" | "bg" => Ok(ColorTarget::Background),
            "text" | "fg" | "color" => Ok(ColorTarget::Text),
            other => Err(NotesError::Other(format!("Unknown color target: {}", other))),
        }
    }
}

impl NoteStore {
    /// Flip `flag` on the selected note and persist; returns the new value.
    pub fn toggle_style_flag(&mut self, flag: StyleFlag) -> Result<bool> {
        let note = self.selected_note_mut()?;
        let value = note.toggle_flag(flag);
        tracing::debug!("Set {} = {} on note {}", flag, value, note.id);
        self.persist()?;
        Ok(value)
    }

    /// Set a color of the selected note and persist.
    pub fn set_color(&mut self, target: ColorTarget, color: Color) -> Result<()> {
        let note = self.selected_note_mut()?;
        tracing::debug!("Set {:?} color {} on note {}", target, color, note.id);
        note.set_color(target, color);
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryKeyValueStore, PersistenceGateway};

    fn store() -> (NoteStore, MemoryKeyValueStore) {
        let kv = MemoryKeyValueStore::new();
        let gateway = PersistenceGateway::new(Box::new(kv.clone()), "notes");
        (NoteStore::load(gateway), kv)
    }

    #[test]
    fn test_flags_are_independent() {
        let mut flags = StyleFlags::default();
        assert!(flags.toggle(StyleFlag::Italic));
        assert!(!flags.bold);
        assert!(!flags.underline);
        assert_eq!(flags.active(), vec![StyleFlag::Italic]);
    }

    #[test]
    fn test_parse_flag_and_target() {
        assert_eq!("Bold".parse::<StyleFlag>().unwrap(), StyleFlag::Bold);
        assert_eq!("u".parse::<StyleFlag>().unwrap(), StyleFlag::Underline);
        assert!("strike".parse::<StyleFlag>().is_err());
        assert_eq!("bg".parse::<ColorTarget>().unwrap(), ColorTarget::Background);
        assert_eq!("text".parse::<ColorTarget>().unwrap(), ColorTarget::Text);
    }

    #[test]
    fn test_toggle_requires_selection() {
        let (mut store, kv) = store();
        store.create("Alpha", None, None).unwrap();
        let writes = kv.write_count();

        assert!(matches!(
            store.toggle_style_flag(StyleFlag::Bold),
            Err(NotesError::NoSelection)
        ));
        assert!(matches!(
            store.set_color(ColorTarget::Background, Color::parse("red").unwrap()),
            Err(NotesError::NoSelection)
        ));
        assert!(!store.all()[0].style.bold);
        assert_eq!(kv.write_count(), writes);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let (mut store, kv) = store();
        let id = store.create("Alpha", None, None).unwrap();
        store.select(&id).unwrap();
        let writes = kv.write_count();

        assert!(store.toggle_style_flag(StyleFlag::Underline).unwrap());
        assert!(!store.toggle_style_flag(StyleFlag::Underline).unwrap());
        assert!(!store.get(&id).unwrap().style.underline);
        assert_eq!(kv.write_count(), writes + 2);
    }

    #[test]
    fn test_set_color_persists_once() {
        let (mut store, kv) = store();
        let id = store.create("Alpha", None, None).unwrap();
        store.select(&id).unwrap();
        let writes = kv.write_count();

        store
            .set_color(ColorTarget::Background, Color::parse("lightyellow").unwrap())
            .unwrap();

        assert_eq!(kv.write_count(), writes + 1);
        assert_eq!(store.get(&id).unwrap().background_color.as_str(), "lightyellow");
    }

    #[test]
    fn test_style_follows_selection_change() {
        let (mut store, _kv) = store();
        let alpha = store.create("Alpha", None, None).unwrap();
        let beta = store.create("Beta", None, None).unwrap();

        store.select(&alpha).unwrap();
        store.select(&beta).unwrap();
        store.toggle_style_flag(StyleFlag::Bold).unwrap();
        store
            .set_color(ColorTarget::Text, Color::parse("#ff0000").unwrap())
            .unwrap();

        let alpha_note = store.get(&alpha).unwrap();
        let beta_note = store.get(&beta).unwrap();
        assert!(!alpha_note.style.bold);
        assert_eq!(alpha_note.text_color, Color::default_text());
        assert!(beta_note.style.bold);
        assert_eq!(beta_note.text_color.as_str(), "#ff0000");
    }
}
