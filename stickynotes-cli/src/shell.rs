//! Interactive board
//!
//! A single event loop owns the [`NoteStore`]. It waits on the next input
//! line and on finished summaries at the same time, so the board keeps
//! accepting commands while summaries run on background tasks. Background
//! tasks never touch the store: they send their result back over a channel
//! and the loop applies it with [`NoteStore::complete_summary`].

use crate::display::{self, RenderOptions};
use crate::error::CliResult;
use crate::notes::{is_yes, open_store, render_options};
use colored::Colorize;
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::Arc;
use stickynotes::notes::{
    escape_text, Color, ColorTarget, DeleteAllOutcome, NoteId, NoteRef, NoteStore, StyleFlag,
    DELETE_ALL_PROMPT,
};
use stickynotes::summarize::{
    Summarizer, SummaryBounds, SummaryOutcome, SummaryRequest, SUMMARY_FAILURE_MESSAGE,
};
use stickynotes::{Config, NotesError, SummarizationError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A finished summary request on its way back to the event loop
pub type SummaryCompletion = (
    SummaryRequest,
    std::result::Result<String, SummarizationError>,
);

const HELP: &str = "\
Commands:
  add [text]              add a note (empty without text)
  list                    show all notes
  search <text>           show notes containing text
  show <n>                show one note in full
  select <n>              select a note for the style commands
  deselect                clear the selection
  bold | italic | underline
                          toggle a style on the selected note
  bg <color>              set the selected note's background
  fg <color>              set the selected note's text color
  edit <n> <text>         replace a note's content
  collapse <n>            expand or collapse a note
  summarize <n>           summarize a note in the background
  delete <n>              delete a note
  clear                   delete all notes (asks first)
  help                    show this help
  quit                    leave the shell

<n> is a position from 'list' or a full note ID.";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Add a note
    Add(String),
    /// Show the board, optionally filtered
    List(Option<String>),
    /// Show one note
    Show(String),
    /// Select a note
    Select(String),
    /// Clear the selection
    Deselect,
    /// Toggle a style on the selected note
    Toggle(StyleFlag),
    /// Set a color of the selected note
    SetColor(ColorTarget, String),
    /// Replace a note's content
    Edit(String, String),
    /// Expand or collapse a note
    Collapse(String),
    /// Summarize a note in the background
    Summarize(String),
    /// Delete a note
    Delete(String),
    /// Delete all notes
    Clear,
    /// Show help
    Help,
    /// Leave the shell
    Quit,
}

fn required(argument: &str, usage: &str) -> Result<String, String> {
    if argument.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(argument.to_string())
    }
}

/// Parse one input line; blank lines are `None`
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    let command = match word.to_ascii_lowercase().as_str() {
        "add" | "new" => ShellCommand::Add(rest.to_string()),
        "list" | "ls" => ShellCommand::List(None),
        "search" | "find" => ShellCommand::List(Some(rest.to_string())),
        "show" => ShellCommand::Show(required(rest, "show <n>")?),
        "select" | "sel" => ShellCommand::Select(required(rest, "select <n>")?),
        "deselect" => ShellCommand::Deselect,
        "bold" | "italic" | "underline" => {
            ShellCommand::Toggle(word.parse().map_err(|e: NotesError| e.to_string())?)
        }
        "bg" | "background" => {
            ShellCommand::SetColor(ColorTarget::Background, required(rest, "bg <color>")?)
        }
        "fg" | "text" => ShellCommand::SetColor(ColorTarget::Text, required(rest, "fg <color>")?),
        "edit" => {
            let (note, content) = rest
                .split_once(char::is_whitespace)
                .map(|(n, c)| (n, c.trim()))
                .unwrap_or((rest, ""));
            ShellCommand::Edit(required(note, "edit <n> <text>")?, content.to_string())
        }
        "collapse" | "expand" => ShellCommand::Collapse(required(rest, "collapse <n>")?),
        "summarize" | "sum" => ShellCommand::Summarize(required(rest, "summarize <n>")?),
        "delete" | "rm" => ShellCommand::Delete(required(rest, "delete <n>")?),
        "clear" => ShellCommand::Clear,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(Some(command))
}

/// Whether the loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Leave the shell
    Quit,
}

/// Shell state: the board, the summarizer and the pending confirmation
pub struct Shell {
    store: NoteStore,
    summarizer: Arc<dyn Summarizer>,
    bounds: SummaryBounds,
    options: RenderOptions,
    completions: mpsc::UnboundedSender<SummaryCompletion>,
    in_flight: HashSet<NoteId>,
    pending_clear: bool,
}

impl Shell {
    /// Create a shell and the receiver its summaries complete on
    pub fn new(
        store: NoteStore,
        summarizer: Arc<dyn Summarizer>,
        bounds: SummaryBounds,
        options: RenderOptions,
    ) -> (Self, mpsc::UnboundedReceiver<SummaryCompletion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let shell = Self {
            store,
            summarizer,
            bounds,
            options,
            completions,
            in_flight: HashSet::new(),
            pending_clear: false,
        };
        (shell, receiver)
    }

    /// The board
    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Summaries not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Prompt text, showing the selected note
    pub fn prompt(&self) -> String {
        if self.pending_clear {
            return format!("{} [y/N] ", DELETE_ALL_PROMPT);
        }
        match self
            .store
            .selection()
            .selected()
            .and_then(|id| display::position_of(&self.store, id))
        {
            Some(position) => format!("notes[#{}]> ", position),
            None => "notes> ".to_string(),
        }
    }

    /// Handle one input line
    pub fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> io::Result<Flow> {
        if self.pending_clear {
            self.pending_clear = false;
            let agreed = is_yes(line);
            let message = self.store.delete_all(|| agreed).map(|outcome| match outcome {
                DeleteAllOutcome::Cleared(count) => format!("🗑️  Deleted all {} notes", count),
                DeleteAllOutcome::Declined => "Nothing deleted.".to_string(),
            });
            self.report(message, out)?;
            return Ok(Flow::Continue);
        }

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(message) => {
                writeln!(out, "{}", message.yellow())?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Help => writeln!(out, "{}", HELP)?,
            ShellCommand::List(query) => writeln!(
                out,
                "{}",
                display::render_board(&self.store, query.as_deref(), &self.options)
            )?,
            ShellCommand::Clear => {
                if self.store.is_empty() {
                    writeln!(out, "{}", NotesError::EmptyCollection.to_string().yellow())?;
                } else {
                    self.pending_clear = true;
                }
            }
            ShellCommand::Summarize(reference) => {
                let result = self.start_summary(&reference);
                self.report(result, out)?;
            }
            other => {
                let result = self.apply(other);
                self.report(result, out)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, command: ShellCommand) -> stickynotes::Result<String> {
        let store = &mut self.store;
        match command {
            ShellCommand::Add(content) => {
                let id = store.create(escape_text(&content), None, None)?;
                Ok(format!("✅ Added note #{} ({})", number(store, &id), id))
            }
            ShellCommand::Show(reference) => {
                let id = lookup(store, &reference)?;
                let note = store
                    .get(&id)
                    .ok_or_else(|| NotesError::NoteNotFound(reference.clone()))?;
                Ok(display::render_note(store, note))
            }
            ShellCommand::Select(reference) => {
                let id = lookup(store, &reference)?;
                store.select(&id)?;
                Ok(format!("Selected note #{}", number(store, &id)))
            }
            ShellCommand::Deselect => {
                store.clear_selection();
                Ok("Selection cleared".to_string())
            }
            ShellCommand::Toggle(flag) => {
                let on = store.toggle_style_flag(flag)?;
                Ok(format!("{} {}", flag, if on { "on" } else { "off" }))
            }
            ShellCommand::SetColor(target, value) => {
                let color = Color::parse(&value)?;
                store.set_color(target, color.clone())?;
                Ok(match target {
                    ColorTarget::Background => format!("Background set to {}", color),
                    ColorTarget::Text => format!("Text color set to {}", color),
                })
            }
            ShellCommand::Edit(reference, content) => {
                let id = lookup(store, &reference)?;
                store.update_content(&id, escape_text(&content))?;
                Ok(format!("✅ Updated note #{}", number(store, &id)))
            }
            ShellCommand::Collapse(reference) => {
                let id = lookup(store, &reference)?;
                Ok(match store.toggle_collapsed(&id)? {
                    Some(true) => format!("📕 Collapsed note #{}", number(store, &id)),
                    _ => format!("📖 Expanded note #{}", number(store, &id)),
                })
            }
            ShellCommand::Delete(reference) => {
                let id = lookup(store, &reference)?;
                let position = number(store, &id);
                store.delete(&id)?;
                Ok(format!("🗑️  Deleted note #{}", position))
            }
            ShellCommand::List(_)
            | ShellCommand::Summarize(_)
            | ShellCommand::Clear
            | ShellCommand::Help
            | ShellCommand::Quit => Ok(String::new()),
        }
    }

    fn start_summary(&mut self, reference: &str) -> stickynotes::Result<String> {
        let id = lookup(&self.store, reference)?;
        if self.in_flight.contains(&id) {
            return Ok(format!(
                "Note #{} is already being summarized",
                number(&self.store, &id)
            ));
        }
        let Some(request) = self.store.begin_summary(&id) else {
            return Err(NotesError::NoteNotFound(reference.to_string()));
        };

        self.in_flight.insert(id.clone());
        let summarizer = Arc::clone(&self.summarizer);
        let completions = self.completions.clone();
        let bounds = self.bounds;
        tokio::spawn(async move {
            let result = summarizer.summarize(&request.input, bounds).await;
            if completions.send((request, result)).is_err() {
                tracing::debug!("Shell closed before a summary finished");
            }
        });

        Ok(format!(
            "⏳ Summarizing note #{} in the background...",
            number(&self.store, &id)
        ))
    }

    /// Apply a finished summary
    pub fn handle_completion(
        &mut self,
        (request, result): SummaryCompletion,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        self.in_flight.remove(&request.note_id);
        let position = number(&self.store, &request.note_id);
        let outcome = self.store.complete_summary(&request, result);
        let message = outcome.and_then(|outcome| match outcome {
            SummaryOutcome::Applied => Ok(format!("✨ Note #{} summarized", position)),
            SummaryOutcome::Failed(e) => {
                tracing::debug!("Summary failure detail: {}", e);
                Err(NotesError::Other(format!(
                    "Note #{}: {}",
                    position, SUMMARY_FAILURE_MESSAGE
                )))
            }
            SummaryOutcome::Discarded => {
                Ok("Summary arrived for a deleted note and was discarded".to_string())
            }
        });
        writeln!(out)?;
        self.report(message, out)
    }

    fn report(&self, result: stickynotes::Result<String>, out: &mut dyn Write) -> io::Result<()> {
        match result {
            Ok(message) if message.is_empty() => Ok(()),
            Ok(message) => writeln!(out, "{}", message),
            Err(e) if e.is_user_notice() => writeln!(out, "{}", e.to_string().yellow()),
            Err(e @ NotesError::PersistenceWrite(_)) => writeln!(
                out,
                "{} {} (the change is kept until you quit)",
                "⚠️".yellow(),
                e
            ),
            Err(e) => writeln!(out, "{} {}", "Error:".red(), e),
        }
    }
}

fn lookup(store: &NoteStore, reference: &str) -> stickynotes::Result<NoteId> {
    let note_ref: NoteRef = reference.parse()?;
    store.resolve(&note_ref)
}

fn number(store: &NoteStore, id: &NoteId) -> usize {
    display::position_of(store, id).unwrap_or_default()
}

/// Run the interactive board until `quit`, end of input or Ctrl+C
pub async fn run_shell(config: &Config) -> CliResult<()> {
    let store = open_store(config)?;
    let summarizer: Arc<dyn Summarizer> = Arc::new(config.summarizer()?);
    let (mut shell, mut completions) = Shell::new(
        store,
        summarizer,
        config.summary_bounds(),
        render_options(config),
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            ctrl_c.cancel();
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();
    writeln!(
        stdout,
        "stickynotes shell: {} notes. Type 'help' for commands.",
        shell.store().len()
    )?;
    tracing::info!("Shell started with {} notes", shell.store().len());

    loop {
        write!(stdout, "{}", shell.prompt())?;
        stdout.flush()?;

        tokio::select! {
            _ = cancel.cancelled() => break,
            Some(completion) = completions.recv() => {
                shell.handle_completion(completion, &mut stdout)?;
            }
            line = lines.next_line() => match line? {
                Some(line) => {
                    if shell.handle_line(&line, &mut stdout)? == Flow::Quit {
                        break;
                    }
                }
                None => break,
            },
        }
    }

    if shell.in_flight() > 0 {
        tracing::info!("Leaving with {} summaries unfinished", shell.in_flight());
    }
    writeln!(stdout)?;
    Ok(())
}
