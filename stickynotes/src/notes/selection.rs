//! The single active note targeted by the global style controls

use super::NoteId;

/// Either nothing is selected or exactly one note is.
///
/// `Selected(id)` is only valid while `id` is in the collection; the store
/// clears the selection in the same call that removes the note.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No note is targeted
    #[default]
    NoneSelected,
    /// Exactly this note is targeted
    Selected(NoteId),
}

impl Selection {
    /// Target `id`, returning the previously selected note if it was a
    /// different one (its selected marker must be cleared).
    pub fn select(&mut self, id: NoteId) -> Option<NoteId> {
        match std::mem::replace(self, Self::Selected(id.clone())) {
            Self::Selected(previous) if previous != id => Some(previous),
            _ => None,
        }
    }

    /// Drop the selection, returning what was selected
    pub fn clear(&mut self) -> Option<NoteId> {
        match std::mem::take(self) {
            Self::Selected(previous) => Some(previous),
            Self::NoneSelected => None,
        }
    }

    /// Clear only if `id` is the selected note
    pub fn clear_if(&mut self, id: &NoteId) -> bool {
        if self.is_selected(id) {
            *self = Self::NoneSelected;
            true
        } else {
            false
        }
    }

    /// The selected note, if any
    pub fn selected(&self) -> Option<&NoteId> {
        match self {
            Self::Selected(id) => Some(id),
            Self::NoneSelected => None,
        }
    }

    /// Whether `id` is the selected note
    pub fn is_selected(&self, id: &NoteId) -> bool {
        self.selected() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert_eq!(Selection::default(), Selection::NoneSelected);
        assert!(Selection::default().selected().is_none());
    }

    #[test]
    fn test_select_replaces_previous() {
        let (a, b) = (NoteId::new(), NoteId::new());
        let mut selection = Selection::default();

        assert_eq!(selection.select(a.clone()), None);
        assert_eq!(selection.select(b.clone()), Some(a.clone()));
        assert!(selection.is_selected(&b));
        assert!(!selection.is_selected(&a));
    }

    #[test]
    fn test_reselecting_same_note_reports_nothing() {
        let a = NoteId::new();
        let mut selection = Selection::default();
        selection.select(a.clone());
        assert_eq!(selection.select(a.clone()), None);
        assert!(selection.is_selected(&a));
    }

    #[test]
    fn test_clear_if_only_matches_selected() {
        let (a, b) = (NoteId::new(), NoteId::new());
        let mut selection = Selection::default();
        selection.select(a.clone());

        assert!(!selection.clear_if(&b));
        assert!(selection.is_selected(&a));
        assert!(selection.clear_if(&a));
        assert_eq!(selection, Selection::NoneSelected);
    }

    #[test]
    fn test_clear_returns_previous() {
        let a = NoteId::new();
        let mut selection = Selection::Selected(a.clone());
        assert_eq!(selection.clear(), Some(a));
        assert_eq!(selection.clear(), None);
    }
}
