//! One-shot note commands

use crate::cli::{Cli, Commands, OutputFormat};
use crate::display::{self, RenderOptions};
use crate::error::{CliError, CliResult};
use crate::exit_codes::EXIT_ERROR;
use colored::Colorize;
use is_terminal::IsTerminal;
use std::io::{self, BufRead, Read, Write};
use stickynotes::notes::{
    escape_text, filter_visible, Color, ColorTarget, DeleteAllOutcome, NoteId, NoteRef, NoteStore,
    StyleFlag, DELETE_ALL_PROMPT,
};
use stickynotes::summarize::{summarize_note, SummaryOutcome};
use stickynotes::{Config, NotesError};

/// Open the board described by `config`
pub fn open_store(config: &Config) -> CliResult<NoteStore> {
    let gateway = config.gateway()?;
    Ok(NoteStore::load(gateway))
}

/// Rendering options from configuration and the terminal
pub fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        collapsed_lines: config.collapsed_lines,
        color: Cli::is_tty() && std::env::var("NO_COLOR").is_err(),
        ..RenderOptions::default()
    }
}

/// Resolve a position or id typed by the user
pub fn resolve_note(store: &NoteStore, reference: &str) -> CliResult<NoteId> {
    let note_ref: NoteRef = reference.parse()?;
    Ok(store.resolve(&note_ref)?)
}

/// Parse a user supplied color
pub fn parse_color(value: Option<&str>) -> CliResult<Option<Color>> {
    value.map(Color::parse).transpose().map_err(CliError::from)
}

/// Read content from the argument, or from stdin when it is `-`
pub fn get_content_input(content: Option<String>) -> CliResult<String> {
    match content {
        Some(c) if c == "-" => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer.trim().to_string())
        }
        Some(c) => Ok(c),
        None => Ok(String::new()),
    }
}

/// Ask before clearing the board. On a terminal this is an interactive
/// prompt; otherwise one line is read from stdin and only `y`/`yes` agree.
fn confirm_delete_all() -> bool {
    if io::stdin().is_terminal() {
        return dialoguer::Confirm::new()
            .with_prompt(DELETE_ALL_PROMPT)
            .default(false)
            .interact()
            .unwrap_or(false);
    }

    eprint!("{} [y/N] ", DELETE_ALL_PROMPT);
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

/// Whether a confirmation answer agrees
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn position(store: &NoteStore, id: &NoteId) -> usize {
    display::position_of(store, id).unwrap_or_default()
}

/// Run a note command against the configured board
pub async fn run_note_command(command: Commands, config: &Config) -> CliResult<()> {
    let mut store = open_store(config)?;
    let options = render_options(config);

    match command {
        Commands::Add {
            content,
            bg,
            text_color,
        } => {
            let background = parse_color(bg.as_deref())?;
            let text = parse_color(text_color.as_deref())?;
            let content = escape_text(&get_content_input(content)?);
            let id = store.create(content, background, text)?;
            println!("{} Created note #{}", "✅".green(), position(&store, &id));
            println!("🆔 ID: {}", id);
        }
        Commands::List { search, format } => {
            list_notes(&store, search.as_deref(), format, &options)?;
        }
        Commands::Show { note } => {
            let id = resolve_note(&store, &note)?;
            if let Some(note) = store.get(&id) {
                println!("{}", display::render_note(&store, note));
            }
        }
        Commands::Edit { note, content } => {
            let id = resolve_note(&store, &note)?;
            let content = escape_text(&get_content_input(Some(content))?);
            store.update_content(&id, content)?;
            println!("{} Updated note #{}", "✅".green(), position(&store, &id));
        }
        Commands::Delete { note } => {
            let id = resolve_note(&store, &note)?;
            let number = position(&store, &id);
            store.delete(&id)?;
            println!("🗑️  Deleted note #{}", number);
        }
        Commands::Clear { yes } => match store.delete_all(|| yes || confirm_delete_all())? {
            DeleteAllOutcome::Cleared(count) => println!("🗑️  Deleted all {} notes", count),
            DeleteAllOutcome::Declined => println!("Nothing deleted."),
        },
        Commands::Style { note, flag } => {
            let id = resolve_note(&store, &note)?;
            let flag = StyleFlag::from(flag);
            store.select(&id)?;
            let on = store.toggle_style_flag(flag)?;
            println!(
                "{} {} {} for note #{}",
                "✅".green(),
                flag,
                if on { "on" } else { "off" },
                position(&store, &id)
            );
        }
        Commands::Color {
            note,
            target,
            value,
        } => {
            let id = resolve_note(&store, &note)?;
            let color = Color::parse(&value)?;
            let target = ColorTarget::from(target);
            store.select(&id)?;
            store.set_color(target, color.clone())?;
            let what = match target {
                ColorTarget::Background => "Background",
                ColorTarget::Text => "Text color",
            };
            println!(
                "{} {} of note #{} set to {}",
                "✅".green(),
                what,
                position(&store, &id),
                color
            );
        }
        Commands::Collapse { note } => {
            let id = resolve_note(&store, &note)?;
            match store.toggle_collapsed(&id)? {
                Some(true) => println!("📕 Collapsed note #{}", position(&store, &id)),
                Some(false) => println!("📖 Expanded note #{}", position(&store, &id)),
                None => {}
            }
        }
        Commands::Summarize { note } => {
            let id = resolve_note(&store, &note)?;
            let summarizer = config.summarizer()?;
            println!("⏳ Summarizing note #{}...", position(&store, &id));
            match summarize_note(&mut store, &summarizer, &id, config.summary_bounds()).await? {
                SummaryOutcome::Applied => {
                    if let Some(note) = store.get(&id) {
                        println!("{} Summarized note #{}", "✨".green(), position(&store, &id));
                        println!("{}", display::preview(note, &options));
                    }
                }
                SummaryOutcome::Failed(e) => {
                    tracing::debug!("Summary failure detail: {}", e);
                    return Err(CliError::warning(NotesError::Summarization(e)));
                }
                SummaryOutcome::Discarded => {}
            }
        }
        Commands::Shell | Commands::Config | Commands::Completion { .. } => {
            return Err(CliError::new("not a note command", EXIT_ERROR));
        }
    }

    Ok(())
}

fn list_notes(
    store: &NoteStore,
    search: Option<&str>,
    format: OutputFormat,
    options: &RenderOptions,
) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", display::render_board(store, search, options));
        }
        OutputFormat::Json => {
            let visible = filter_visible(search.unwrap_or(""), store.all());
            let json = serde_json::to_string_pretty(&visible).map_err(NotesError::from)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let visible = filter_visible(search.unwrap_or(""), store.all());
            let yaml = serde_yaml::to_string(&visible).map_err(NotesError::from)?;
            print!("{}", yaml);
        }
    }
    Ok(())
}
