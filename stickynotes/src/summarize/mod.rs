//! Asynchronous note summarization
//!
//! Summarizing is split so that the note store is never held across an
//! await point:
//!
//! 1. [`NoteStore::begin_summary`] captures the note's text in a
//!    [`SummaryRequest`].
//! 2. A [`Summarizer`] runs the request, possibly on another task, while the
//!    board keeps accepting edits.
//! 3. [`NoteStore::complete_summary`] applies the result, after checking the
//!    note still exists.
//!
//! A failed request replaces the note content with
//! [`SUMMARY_FAILURE_MESSAGE`]. Nothing is retried.

mod http;
mod mock;

pub use http::{HttpSummarizer, DEFAULT_SUMMARIZER_URL};
pub use mock::MockSummarizer;

use crate::error::{Result, SummarizationError};
use crate::notes::{display_text, escape_text, NoteId, NoteStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Content written into a note whose summary request failed
pub const SUMMARY_FAILURE_MESSAGE: &str = "An error occurred while summarizing.";

/// Length bounds passed to the summarization service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBounds {
    /// Minimum summary length
    pub min_length: u32,
    /// Maximum summary length
    pub max_length: u32,
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self {
            min_length: 20,
            max_length: 50,
        }
    }
}

/// An external text summarization service
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text` within `bounds`
    async fn summarize(
        &self,
        text: &str,
        bounds: SummaryBounds,
    ) -> std::result::Result<String, SummarizationError>;
}

/// Text captured from a note when its summary was requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    /// The note the summary belongs to
    pub note_id: NoteId,
    /// Plain text sent to the service
    pub input: String,
}

/// What happened when a summary result came back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The note content was replaced by the summary
    Applied,
    /// The note content was replaced by the failure message
    Failed(SummarizationError),
    /// The note was deleted while the request was in flight
    Discarded,
}

impl NoteStore {
    /// Capture the text of a note for summarization; `None` if it is gone
    pub fn begin_summary(&self, id: &NoteId) -> Option<SummaryRequest> {
        self.get(id).map(|note| SummaryRequest {
            note_id: id.clone(),
            input: display_text(&note.content),
        })
    }

    /// Apply a finished summary request.
    ///
    /// Results for notes deleted in the meantime are dropped without
    /// persisting.
    pub fn complete_summary(
        &mut self,
        request: &SummaryRequest,
        result: std::result::Result<String, SummarizationError>,
    ) -> Result<SummaryOutcome> {
        let Some(note) = self.get_mut(&request.note_id) else {
            tracing::info!(
                "Note {} was deleted before its summary arrived; discarding",
                request.note_id
            );
            return Ok(SummaryOutcome::Discarded);
        };

        let outcome = match result {
            Ok(summary) => {
                tracing::info!("Summarized note {}", request.note_id);
                note.update_content(escape_text(&summary));
                SummaryOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Summarizing note {} failed: {}", request.note_id, e);
                note.update_content(SUMMARY_FAILURE_MESSAGE.to_string());
                SummaryOutcome::Failed(e)
            }
        };

        self.persist()?;
        Ok(outcome)
    }
}

/// Summarize one note end to end, for callers that can wait on the result
pub async fn summarize_note(
    store: &mut NoteStore,
    summarizer: &dyn Summarizer,
    id: &NoteId,
    bounds: SummaryBounds,
) -> Result<SummaryOutcome> {
    let Some(request) = store.begin_summary(id) else {
        return Ok(SummaryOutcome::Discarded);
    };
    let result = summarizer.summarize(&request.input, bounds).await;
    store.complete_summary(&request, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore, PersistenceGateway};

    fn store() -> (NoteStore, MemoryKeyValueStore) {
        let kv = MemoryKeyValueStore::new();
        let gateway = PersistenceGateway::new(Box::new(kv.clone()), "notes");
        (NoteStore::load(gateway), kv)
    }

    #[test]
    fn test_begin_summary_uses_display_text() {
        let (mut store, _kv) = store();
        let id = store
            .create("<b>Meeting</b> notes<br>Ship &amp; test", None, None)
            .unwrap();

        let request = store.begin_summary(&id).unwrap();
        assert_eq!(request.note_id, id);
        assert_eq!(request.input, "Meeting notes\nShip & test");
        assert!(store.begin_summary(&NoteId::new()).is_none());
    }

    #[test]
    fn test_success_replaces_content_and_persists() {
        let (mut store, kv) = store();
        let id = store.create("long text", None, None).unwrap();
        let request = store.begin_summary(&id).unwrap();
        let writes = kv.write_count();

        let outcome = store
            .complete_summary(&request, Ok("Short <summary>".to_string()))
            .unwrap();

        assert_eq!(outcome, SummaryOutcome::Applied);
        assert_eq!(store.get(&id).unwrap().content, "Short &lt;summary&gt;");
        assert_eq!(store.get(&id).unwrap().plain_text(), "Short <summary>");
        assert_eq!(kv.write_count(), writes + 1);
    }

    #[test]
    fn test_failure_writes_message_to_that_note_only() {
        let (mut store, kv) = store();
        let alpha = store.create("Alpha", None, None).unwrap();
        let beta = store.create("Beta", None, None).unwrap();
        let request = store.begin_summary(&beta).unwrap();

        let error = SummarizationError::Network("connection refused".into());
        let outcome = store.complete_summary(&request, Err(error.clone())).unwrap();

        assert_eq!(outcome, SummaryOutcome::Failed(error));
        assert_eq!(store.get(&alpha).unwrap().content, "Alpha");
        assert_eq!(store.get(&beta).unwrap().content, SUMMARY_FAILURE_MESSAGE);

        let raw = kv.get_item("notes").unwrap().unwrap();
        assert!(raw.contains(SUMMARY_FAILURE_MESSAGE));
    }

    #[test]
    fn test_result_for_deleted_note_is_discarded() {
        let (mut store, kv) = store();
        let id = store.create("Doomed", None, None).unwrap();
        let request = store.begin_summary(&id).unwrap();
        store.delete(&id).unwrap();
        let writes = kv.write_count();

        let outcome = store
            .complete_summary(&request, Ok("summary".to_string()))
            .unwrap();

        assert_eq!(outcome, SummaryOutcome::Discarded);
        assert!(store.is_empty());
        assert_eq!(kv.write_count(), writes);
    }

    #[tokio::test]
    async fn test_summarize_note_with_mock() {
        let (mut store, _kv) = store();
        let id = store.create("A very long note", None, None).unwrap();
        let summarizer = MockSummarizer::new().with_response("Short");

        let outcome = summarize_note(&mut store, &summarizer, &id, SummaryBounds::default())
            .await
            .unwrap();

        assert_eq!(outcome, SummaryOutcome::Applied);
        assert_eq!(store.get(&id).unwrap().content, "Short");
        assert_eq!(summarizer.calls(), vec!["A very long note".to_string()]);
    }
}
