//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: A notice was shown and nothing changed (no selection, nothing to delete)
//! - 2: Errors: bad input, missing notes, storage failures

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// The command was refused with a user notice
pub const EXIT_WARNING: i32 = 1;

/// The command failed
pub const EXIT_ERROR: i32 = 2;
