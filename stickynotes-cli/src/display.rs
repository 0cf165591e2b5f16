//! Board rendering for the terminal

use stickynotes::notes::{
    display_text, filter_visible, Note, NoteId, NoteStore, StyleFlag, StyleFlags,
};
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Style},
    Table, Tabled,
};

/// How notes are laid out
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Lines of wrapped text shown for a collapsed note
    pub collapsed_lines: usize,
    /// Wrap width of the note column
    pub width: usize,
    /// Color the table header
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            collapsed_lines: 3,
            width: 48,
            color: false,
        }
    }
}

#[derive(Tabled)]
struct NoteRow {
    #[tabled(rename = "#")]
    position: String,
    #[tabled(rename = "Note")]
    text: String,
    #[tabled(rename = "Colors")]
    colors: String,
    #[tabled(rename = "Style")]
    style: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Short form of the active style flags, e.g. `B U`
pub fn describe_style(style: &StyleFlags) -> String {
    let active: Vec<&str> = style
        .active()
        .into_iter()
        .map(|flag| match flag {
            StyleFlag::Bold => "B",
            StyleFlag::Italic => "I",
            StyleFlag::Underline => "U",
        })
        .collect();
    if active.is_empty() {
        "-".to_string()
    } else {
        active.join(" ")
    }
}

/// Wrapped note text, truncated to `collapsed_lines` when collapsed
pub fn preview(note: &Note, options: &RenderOptions) -> String {
    let text = display_text(&note.content);
    if text.trim().is_empty() {
        return "(empty)".to_string();
    }

    let lines: Vec<String> = text
        .lines()
        .flat_map(|line| {
            textwrap::wrap(line, options.width)
                .into_iter()
                .map(|l| l.into_owned())
                .collect::<Vec<_>>()
        })
        .collect();

    if note.collapsed && lines.len() > options.collapsed_lines {
        let mut shown = lines[..options.collapsed_lines].to_vec();
        if let Some(last) = shown.last_mut() {
            last.push_str(" …");
        }
        shown.join("\n")
    } else {
        lines.join("\n")
    }
}

/// 1-based position of a note on the board
pub fn position_of(store: &NoteStore, id: &NoteId) -> Option<usize> {
    store.all().iter().position(|note| &note.id == id).map(|i| i + 1)
}

/// The board as a table, filtered by `query`. Positions always refer to
/// the unfiltered board and the selected note is marked with `>`.
pub fn render_board(store: &NoteStore, query: Option<&str>, options: &RenderOptions) -> String {
    if store.is_empty() {
        return "No notes yet.".to_string();
    }

    let visible = filter_visible(query.unwrap_or(""), store.all());
    if visible.is_empty() {
        return format!("No notes match '{}'.", query.unwrap_or(""));
    }

    let rows: Vec<NoteRow> = visible
        .iter()
        .map(|note| {
            let position = position_of(store, &note.id).unwrap_or_default();
            let marker = if store.selection().is_selected(&note.id) {
                ">"
            } else {
                ""
            };
            NoteRow {
                position: format!("{}{}", marker, position),
                text: preview(note, options),
                colors: format!("{} / {}", note.background_color, note.text_color),
                style: describe_style(&note.style),
                id: note.id.to_string(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    if options.color {
        table.with(Modify::new(Rows::one(0)).with(Color::FG_BRIGHT_CYAN));
    }
    table.with(Modify::new(Rows::new(1..)).with(Alignment::left()));
    table.to_string()
}

/// Full details of one note
pub fn render_note(store: &NoteStore, note: &Note) -> String {
    let position = position_of(store, &note.id).unwrap_or_default();
    let mut out = String::new();
    out.push_str(&format!("📝 Note #{}\n", position));
    out.push_str(&format!("🆔 ID: {}\n", note.id));
    out.push_str(&format!(
        "🎨 Colors: background {}, text {}\n",
        note.background_color, note.text_color
    ));
    out.push_str(&format!("✒️  Style: {}\n", describe_style(&note.style)));
    if note.collapsed {
        out.push_str("📕 Collapsed\n");
    }
    out.push_str(&format!(
        "📅 Created: {}\n",
        note.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "🔄 Updated: {}\n",
        note.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push('\n');
    out.push_str(&display_text(&note.content));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickynotes::notes::Color as NoteColor;
    use stickynotes::storage::{MemoryKeyValueStore, PersistenceGateway};

    fn store() -> NoteStore {
        NoteStore::load(PersistenceGateway::new(
            Box::new(MemoryKeyValueStore::new()),
            "notes",
        ))
    }

    fn note(content: &str) -> Note {
        Note::new(content, NoteColor::default_background(), NoteColor::default_text())
    }

    #[test]
    fn test_describe_style() {
        let mut flags = StyleFlags::default();
        assert_eq!(describe_style(&flags), "-");
        flags.bold = true;
        flags.underline = true;
        assert_eq!(describe_style(&flags), "B U");
    }

    #[test]
    fn test_preview_collapses() {
        let options = RenderOptions {
            collapsed_lines: 2,
            width: 40,
            color: false,
        };
        let mut n = note("one<br>two<br>three<br>four");
        assert_eq!(preview(&n, &options), "one\ntwo\nthree\nfour");

        n.collapsed = true;
        assert_eq!(preview(&n, &options), "one\ntwo …");
        assert_eq!(preview(&note("<b></b>"), &options), "(empty)");
    }

    #[test]
    fn test_board_keeps_positions_when_filtered() {
        let mut store = store();
        store.create("Alpha", None, None).unwrap();
        let beta = store.create("Beta", None, None).unwrap();
        store.select(&beta).unwrap();

        let rendered = render_board(&store, Some("bet"), &RenderOptions::default());
        assert!(rendered.contains(">2"));
        assert!(rendered.contains("Beta"));
        assert!(!rendered.contains("Alpha"));

        let none = render_board(&store, Some("zzz"), &RenderOptions::default());
        assert_eq!(none, "No notes match 'zzz'.");
    }

    #[test]
    fn test_render_note_details() {
        let mut store = store();
        let id = store.create("Hello &amp; bye", None, None).unwrap();
        let rendered = render_note(&store, store.get(&id).unwrap());
        assert!(rendered.contains("Note #1"));
        assert!(rendered.contains(&id.to_string()));
        assert!(rendered.ends_with("Hello & bye"));
    }
}
