//! Note identity
//!
//! Notes are addressed by ULIDs drawn from a process-wide monotonic
//! generator, so ids sort in creation order and are never handed out twice,
//! even after the note carrying one has been deleted.

use crate::error::{NotesError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use ulid::{Generator, Ulid};

static ULID_GENERATOR: std::sync::OnceLock<Mutex<Generator>> = std::sync::OnceLock::new();

/// Generate a ULID strictly greater than every previous one from this process
fn next_monotonic_ulid() -> Ulid {
    let generator = ULID_GENERATOR.get_or_init(|| Mutex::new(Generator::new()));
    // A poisoned lock still guards a valid generator.
    let mut gen = generator.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    // Overflow means 2^80 ids inside one millisecond; a random ULID is still unique.
    gen.generate().unwrap_or_else(|_| Ulid::new())
}

/// Type-safe wrapper for note ids
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(Ulid);

impl NoteId {
    /// Allocate a fresh id
    pub fn new() -> Self {
        Self(next_monotonic_ulid())
    }

    /// Parse an id from its 26 character ULID form
    pub fn from_string(id: &str) -> Result<Self> {
        Ulid::from_string(id.trim())
            .map(Self)
            .map_err(|_| NotesError::invalid_note_id(id))
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NoteId {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for NoteId {
    type Error = NotesError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_string(&value)
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_monotonic_and_unique() {
        let ids: Vec<NoteId> = (0..100).map(|_| NoteId::new()).collect();

        let unique: HashSet<_> = ids.iter().cloned().collect();
        assert_eq!(unique.len(), ids.len());

        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_id_string_roundtrip() {
        let id = NoteId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 26);
        assert_eq!(NoteId::from_string(&text).unwrap(), id);
    }

    #[test]
    fn test_invalid_id_rejected() {
        match NoteId::from_string("not-a-ulid") {
            Err(NotesError::InvalidNoteId(value)) => assert_eq!(value, "not-a-ulid"),
            other => panic!("Expected InvalidNoteId, got {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_allocation() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (0..25).map(|_| NoteId::new()).collect::<Vec<_>>()))
            .collect();

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }

        let unique: HashSet<_> = all.iter().cloned().collect();
        assert_eq!(unique.len(), 200);
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = NoteId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: NoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
