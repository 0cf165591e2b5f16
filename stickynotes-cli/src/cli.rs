use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::io;
use std::path::PathBuf;
use stickynotes::notes::{ColorTarget, StyleFlag};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleArg {
    Bold,
    Italic,
    Underline,
}

impl From<StyleArg> for StyleFlag {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Bold => StyleFlag::Bold,
            StyleArg::Italic => StyleFlag::Italic,
            StyleArg::Underline => StyleFlag::Underline,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTargetArg {
    Background,
    Text,
}

impl From<ColorTargetArg> for ColorTarget {
    fn from(arg: ColorTargetArg) -> Self {
        match arg {
            ColorTargetArg::Background => ColorTarget::Background,
            ColorTargetArg::Text => ColorTarget::Text,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "stickynotes")]
#[command(version)]
#[command(about = "A sticky note board for the terminal")]
#[command(long_about = "
stickynotes keeps a board of note cards. Notes can be styled, colored,
searched, collapsed and summarized through an external summarization
service. The board is saved after every change.

Notes are referenced by their 1-based position in `stickynotes list` or
by their full ID.

Example usage:
  stickynotes add \"Buy milk\"            # Add a note
  stickynotes list --search milk        # Find notes
  stickynotes style 1 bold              # Toggle bold on note #1
  stickynotes shell                     # Interactive board
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Read configuration from this YAML file instead of searching for stickynotes.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a note
    #[command(long_about = "
Adds a note to the end of the board. Without content the note starts empty.
Use '-' to read the content from stdin.

Examples:
  stickynotes add
  stickynotes add \"Call the plumber\" --bg lightyellow
  echo \"From a pipe\" | stickynotes add -
")]
    Add {
        /// Note content ('-' reads stdin)
        content: Option<String>,

        /// Background color (hex, rgb(), hsl() or a color name)
        #[arg(long)]
        bg: Option<String>,

        /// Text color
        #[arg(long)]
        text_color: Option<String>,
    },
    /// List notes
    #[command(long_about = "
Lists the notes on the board in creation order.

Output formats:
  table  - Formatted table (default)
  json   - JSON output for scripting
  yaml   - YAML output for scripting

Examples:
  stickynotes list
  stickynotes list --search milk
  stickynotes list --format json
")]
    List {
        /// Only show notes whose text contains this (case-insensitive)
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show one note in full
    Show {
        /// Position or ID
        note: String,
    },
    /// Replace the content of a note
    Edit {
        /// Position or ID
        note: String,

        /// New content ('-' reads stdin)
        content: String,
    },
    /// Delete a note
    Delete {
        /// Position or ID
        note: String,
    },
    /// Delete all notes after confirmation
    Clear {
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Toggle bold, italic or underline on a note
    Style {
        /// Position or ID
        note: String,

        /// Style to toggle
        #[arg(value_enum)]
        flag: StyleArg,
    },
    /// Set the background or text color of a note
    Color {
        /// Position or ID
        note: String,

        /// Which color to set
        #[arg(value_enum)]
        target: ColorTargetArg,

        /// The color (hex, rgb(), hsl() or a color name)
        value: String,
    },
    /// Expand or collapse a note
    Collapse {
        /// Position or ID
        note: String,
    },
    /// Replace a note's content with a summary from the summarization service
    Summarize {
        /// Position or ID
        note: String,
    },
    /// Open the interactive board
    #[command(long_about = "
Opens an interactive board. Summaries run in the background while you
keep editing. Type 'help' inside the shell for its commands.

Logs are written to ~/.stickynotes/shell.log (override the file name with
STICKYNOTES_LOG_FILE).
")]
    Shell,
    /// Print an example configuration file
    Config,
    /// Generate shell completions
    #[command(long_about = "
Generates shell completion scripts for various shells.

Examples:
  stickynotes completion bash > ~/.local/share/bash-completion/completions/stickynotes
  stickynotes completion zsh > ~/.zfunc/_stickynotes
  stickynotes completion fish > ~/.config/fish/completions/stickynotes.fish
")]
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    pub fn is_tty() -> bool {
        io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_help_works() {
        let error = Cli::try_parse_from_args(["stickynotes", "--help"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_works() {
        let error = Cli::try_parse_from_args(["stickynotes", "--version"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_no_subcommand() {
        let cli = Cli::try_parse_from_args(["stickynotes"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_invalid_subcommand() {
        let error = Cli::try_parse_from_args(["stickynotes", "invalid"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_add_without_content() {
        let cli = Cli::try_parse_from_args(["stickynotes", "add"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Add {
                content: None,
                bg: None,
                text_color: None
            })
        ));
    }

    #[test]
    fn test_add_with_colors() {
        let cli = Cli::try_parse_from_args([
            "stickynotes",
            "add",
            "Buy milk",
            "--bg",
            "#ffee88",
            "--text-color",
            "navy",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add {
                content,
                bg,
                text_color,
            }) => {
                assert_eq!(content.as_deref(), Some("Buy milk"));
                assert_eq!(bg.as_deref(), Some("#ffee88"));
                assert_eq!(text_color.as_deref(), Some("navy"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_list_defaults_to_table() {
        let cli = Cli::try_parse_from_args(["stickynotes", "list", "-s", "milk"]).unwrap();
        match cli.command {
            Some(Commands::List { search, format }) => {
                assert_eq!(search.as_deref(), Some("milk"));
                assert_eq!(format, OutputFormat::Table);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_style_flag_values() {
        let cli = Cli::try_parse_from_args(["stickynotes", "style", "2", "underline"]).unwrap();
        match cli.command {
            Some(Commands::Style { note, flag }) => {
                assert_eq!(note, "2");
                assert_eq!(StyleFlag::from(flag), StyleFlag::Underline);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from_args(["stickynotes", "style", "2", "strike"]).is_err());
    }

    #[test]
    fn test_color_command() {
        let cli =
            Cli::try_parse_from_args(["stickynotes", "color", "1", "background", "pink"]).unwrap();
        match cli.command {
            Some(Commands::Color {
                note,
                target,
                value,
            }) => {
                assert_eq!(note, "1");
                assert_eq!(ColorTarget::from(target), ColorTarget::Background);
                assert_eq!(value, "pink");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from_args([
            "stickynotes",
            "clear",
            "--yes",
            "--quiet",
            "--config",
            "board.yaml",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("board.yaml")));
        assert!(matches!(cli.command, Some(Commands::Clear { yes: true })));
    }

    #[test]
    fn test_completion_subcommand() {
        let cli = Cli::try_parse_from_args(["stickynotes", "completion", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completion {
                shell: clap_complete::Shell::Bash
            })
        ));
    }
}
