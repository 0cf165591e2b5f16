//! # stickynotes
//!
//! A sticky note board: create, edit, style, search and delete note cards,
//! persist them under a single storage key, and optionally shorten a note
//! through an external summarization service.
//!
//! ## Features
//!
//! - **Note store**: ordered collection with stable ULID identities
//! - **Selection**: global style controls act on the one selected note
//! - **Search**: case-insensitive matching on note text, markup ignored
//! - **Persistence**: the whole board is rewritten after every change
//! - **Summarization**: async requests that tolerate the note being deleted
//!
//! ## Quick Start
//!
//! ```rust
//! use stickynotes::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let gateway = PersistenceGateway::new(Box::new(MemoryKeyValueStore::new()), "notes");
//! let mut store = NoteStore::load(gateway);
//!
//! store.create("Alpha", None, None)?;
//! let beta = store.create("Beta", None, None)?;
//!
//! store.select(&beta)?;
//! store.set_color(ColorTarget::Background, Color::parse("#ffee88")?)?;
//!
//! let visible = filter_visible("alp", store.all());
//! assert_eq!(visible.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Shared helpers
pub mod common;

/// Layered configuration
pub mod config;

/// Error types
pub mod error;

/// Note records, the note store, selection, styling and search
pub mod notes;

/// Key/value storage and the persistence gateway
pub mod storage;

/// Summarization service boundary
pub mod summarize;

pub use config::{Config, ConfigError};
pub use error::{NotesError, Result, SummarizationError};
pub use notes::{Note, NoteId, NoteStore};
pub use storage::{KeyValueStore, PersistenceGateway};
pub use summarize::{Summarizer, SummaryBounds};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::notes::{
        compute_visibility, filter_visible, Color, ColorTarget, DeleteAllOutcome, Note, NoteId,
        NoteRef, NoteStore, Selection, StyleFlag, StyleFlags,
    };
    pub use crate::storage::{
        FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, PersistenceGateway,
    };
    pub use crate::summarize::{
        summarize_note, HttpSummarizer, MockSummarizer, Summarizer, SummaryBounds, SummaryOutcome,
        SummaryRequest,
    };
    pub use crate::{Config, NotesError, Result};
}
