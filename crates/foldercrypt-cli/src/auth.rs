//! Interactive password acquisition

use anyhow::{Context, Result};

/// Prompt for the password on the controlling terminal with echo suppressed.
///
/// There is no confirmation step and no strength check; the password the
/// user types is the password the key is derived from.
pub fn prompt_password() -> Result<String> {
    rpassword::prompt_password("Enter password: ")
        .context("failed to read password from terminal")
}
