use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use foldercrypt_core::Folder;

#[derive(ClapArgs)]
pub struct Args {
    /// Folder to encrypt (created empty if it does not exist)
    pub path: PathBuf,
}

#[instrument(level = "info", name = "cmd::create", skip_all, fields(path = %args.path.display()))]
pub fn execute(args: &Args, password: &str) -> Result<()> {
    let folder = Folder::new(&args.path);
    folder
        .create(password)
        .with_context(|| format!("failed to encrypt folder {}", args.path.display()))?;
    println!("Folder encrypted successfully.");
    Ok(())
}
