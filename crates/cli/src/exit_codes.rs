//! CLI Exit Code Registry
//!
//! Single source of truth for `gridshare` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (I/O, save already in flight)               |
//! | 2    | Usage error (bad arguments, cell outside the table)       |
//! | 3    | Validation error (missing name, backend rejected input)   |
//! | 4    | Backend failure (network, HTTP, unreadable response)      |
//! | 5    | Not authenticated                                         |
//! | 6    | Unsaved changes would be discarded                        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, or a cell address outside the visible table.
pub const EXIT_USAGE: u8 = 2;

/// The table failed a local or server-side validation check.
pub const EXIT_VALIDATION: u8 = 3;

/// The backend could not be reached or rejected the request.
pub const EXIT_REMOTE: u8 = 4;

/// No saved credentials; run `gridshare login`.
pub const EXIT_NOT_AUTH: u8 = 5;

/// The current draft has a name or hidden cells and would be discarded.
pub const EXIT_UNSAVED: u8 = 6;
