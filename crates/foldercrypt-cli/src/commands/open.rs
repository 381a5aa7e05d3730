use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use foldercrypt_core::Folder;

#[derive(ClapArgs)]
pub struct Args {
    /// Encrypted folder to open
    pub path: PathBuf,
}

#[instrument(level = "info", name = "cmd::open", skip_all, fields(path = %args.path.display()))]
pub fn execute(args: &Args, password: &str) -> Result<()> {
    let folder = Folder::new(&args.path);
    let shadow = folder
        .open(password)
        .with_context(|| format!("failed to open folder {}", args.path.display()))?;
    println!("Folder decrypted to: {}", shadow.display());
    Ok(())
}
