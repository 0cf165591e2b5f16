//! Search filtering over note content
//!
//! Matching runs against the text of a note only: inline markup is stripped
//! and HTML entities are decoded before a case-insensitive substring test.

use super::{Note, NoteId};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|<(?:div|p|li|h[1-6])(?:\s[^>]*)?>").expect("valid regex")
});

static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex"));

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or(body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Text content of a markup string, with tags removed and entities decoded
pub fn plain_text(content: &str) -> String {
    decode_entities(&TAG.replace_all(content, ""))
}

/// Like [`plain_text`] but keeps line structure: `<br>` and block elements
/// become newlines. This is the text sent for summarization.
pub fn display_text(content: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(content, "\n");
    decode_entities(&TAG.replace_all(&with_breaks, ""))
        .trim_matches('\n')
        .to_string()
}

/// Turn plain text into content markup, the inverse of [`display_text`]
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' => escaped.push_str("<br>"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn matches(note: &Note, query_lower: &str) -> bool {
    query_lower.is_empty() || note.plain_text().to_lowercase().contains(query_lower)
}

/// Visibility of every note for `query`; an empty query shows everything.
pub fn compute_visibility(query: &str, notes: &[Note]) -> HashMap<NoteId, bool> {
    let query_lower = query.to_lowercase();
    notes
        .iter()
        .map(|note| (note.id.clone(), matches(note, &query_lower)))
        .collect()
}

/// The visible notes for `query`, in collection order
pub fn filter_visible<'a>(query: &str, notes: &'a [Note]) -> Vec<&'a Note> {
    let query_lower = query.to_lowercase();
    notes
        .iter()
        .filter(|note| matches(note, &query_lower))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::Color;

    fn note(content: &str) -> Note {
        Note::new(content, Color::default_background(), Color::default_text())
    }

    #[test]
    fn test_plain_text_strips_markup() {
        assert_eq!(plain_text("<b>Bold</b> and <i>it</i>"), "Bold and it");
        assert_eq!(plain_text("a &amp; b &lt;c&gt; &#65;&#x42;"), "a & b <c> AB");
        assert_eq!(plain_text("&unknown; stays"), "&unknown; stays");
    }

    #[test]
    fn test_display_text_keeps_lines() {
        assert_eq!(display_text("one<div>two</div><div>three</div>"), "one\ntwo\nthree");
        assert_eq!(display_text("<div>a</div><div><br></div>"), "a");
        assert_eq!(display_text("x<br/>y"), "x\ny");
    }

    #[test]
    fn test_escape_roundtrips_through_display_text() {
        let text = "if a < b && c > d\nthen stop";
        assert_eq!(display_text(&escape_text(text)), text);
    }

    #[test]
    fn test_empty_query_shows_all() {
        let notes = vec![note(""), note("Alpha"), note("<b></b>")];
        let visibility = compute_visibility("", &notes);
        assert_eq!(visibility.len(), 3);
        assert!(visibility.values().all(|visible| *visible));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let notes = vec![note("Alpha"), note("Beta")];
        let visibility = compute_visibility("ALP", &notes);
        assert!(visibility[&notes[0].id]);
        assert!(!visibility[&notes[1].id]);
    }

    #[test]
    fn test_markup_is_not_searchable() {
        let notes = vec![note("<b>plain</b>"), note("<span style=\"color:red\">x</span>")];

        let bold = compute_visibility("b>", &notes);
        assert!(!bold[&notes[0].id]);

        let style = compute_visibility("color", &notes);
        assert!(!style[&notes[1].id]);

        let text = compute_visibility("plain", &notes);
        assert!(text[&notes[0].id]);
    }

    #[test]
    fn test_match_spans_markup_boundaries() {
        let notes = vec![note("Hel<b>lo</b> world")];
        assert!(compute_visibility("hello", &notes)[&notes[0].id]);
    }

    #[test]
    fn test_filter_visible_preserves_order() {
        let notes = vec![note("apple pie"), note("banana"), note("apple tart")];
        let visible: Vec<_> = filter_visible("apple", &notes)
            .into_iter()
            .map(|n| n.content.as_str())
            .collect();
        assert_eq!(visible, vec!["apple pie", "apple tart"]);
    }
}
