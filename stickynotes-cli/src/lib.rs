//! stickynotes CLI library
//!
//! Command-line definitions, rendering and the interactive shell for the
//! `stickynotes` binary. Exposed as a library so the pieces can be tested.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// Shell completion scripts
pub mod completions;
/// Terminal rendering of notes and the board
pub mod display;
/// CLI error type and exit code mapping
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Tracing subscriber setup
pub mod logging;
/// One-shot note commands
pub mod notes;
/// Interactive board
pub mod shell;
