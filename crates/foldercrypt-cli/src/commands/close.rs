use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use foldercrypt_core::Folder;

#[derive(ClapArgs)]
pub struct Args {
    /// Encrypted folder whose shadow should be re-encrypted and removed
    pub path: PathBuf,
}

#[instrument(level = "info", name = "cmd::close", skip_all, fields(path = %args.path.display()))]
pub fn execute(args: &Args, password: &str) -> Result<()> {
    let folder = Folder::new(&args.path);
    folder
        .close(password)
        .with_context(|| format!("failed to close folder {}", args.path.display()))?;
    println!("Decrypted folder closed and re-encrypted.");
    Ok(())
}
