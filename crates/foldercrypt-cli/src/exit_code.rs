//! Process exit codes
//!
//! Every subcommand exits non-zero on failure, with the code telling scripts
//! *why* without parsing stderr.

pub const SUCCESS: u8 = 0;
pub const GENERAL_ERROR: u8 = 1;
/// Password validation failed.
pub const AUTH_FAILED: u8 = 2;
/// The folder (or another required path) does not exist.
pub const NOT_FOUND: u8 = 3;
/// The folder was in the wrong state: already open, or not open.
pub const FOLDER_STATE: u8 = 4;
pub const PERMISSION_DENIED: u8 = 5;
