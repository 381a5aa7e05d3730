#![deny(unsafe_code)]

mod auth;
mod commands;
mod exit_code;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use foldercrypt_core::error::{FolderError, PasswordValidationError};

use crate::commands::{close, create, open};

/// Command-line interface for password-encrypted folders
#[derive(Parser)]
#[command(name = "foldercrypt")]
#[command(author, version)]
#[command(propagate_version = true)]
#[command(after_help = "EXAMPLES:
    # Encrypt a folder in place
    foldercrypt create ~/notes

    # Decrypt it into ~/notes_decrypt, work on the files, then seal it again
    foldercrypt open ~/notes
    foldercrypt close ~/notes

    # Pipe the password from a secret manager
    echo \"$SECRET\" | foldercrypt --password-stdin open ~/notes
")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Folder password (insecure, prefer --password-stdin or FOLDERCRYPT_PASSWORD)
    #[arg(long, env = "FOLDERCRYPT_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Read password from stdin (single line)
    #[arg(long, conflicts_with = "password", global = true)]
    password_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a folder in place, making it the encrypted rest state
    Create(create::Args),

    /// Decrypt an encrypted folder into a cleartext shadow next to it
    Open(open::Args),

    /// Re-encrypt the shadow back into the folder and remove it
    Close(close::Args),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(e) => {
            // Determine appropriate exit code based on error type
            let code = categorize_error(&e);

            // Only print error if not quiet mode (quiet is parsed separately for this)
            let args: Vec<String> = std::env::args().collect();
            let is_quiet = args.iter().any(|a| a == "-q" || a == "--quiet");

            if !is_quiet {
                eprintln!("Error: {e:#}");
            }

            ExitCode::from(code)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity (skip if quiet)
    if !cli.quiet {
        setup_tracing(cli.verbose);
    }

    let password = get_password(&cli)?;

    match cli.command {
        Commands::Create(args) => create::execute(&args, &password),
        Commands::Open(args) => open::execute(&args, &password),
        Commands::Close(args) => close::execute(&args, &password),
    }
}

/// Get the password using the priority chain:
/// 1. --password-stdin
/// 2. --password / FOLDERCRYPT_PASSWORD
/// 3. Interactive prompt
fn get_password(cli: &Cli) -> Result<String> {
    if cli.password_stdin {
        read_password_from_stdin()
    } else if let Some(ref password) = cli.password {
        Ok(password.clone())
    } else {
        auth::prompt_password()
    }
}

/// Read the password from stdin (first line only)
fn read_password_from_stdin() -> Result<String> {
    // Check if stdin has data (not a TTY)
    if io::stdin().is_terminal() {
        anyhow::bail!(
            "--password-stdin requires the password to be piped in.\n\
             Example: echo \"$SECRET\" | foldercrypt --password-stdin open ~/notes"
        );
    }

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;

    // Trim trailing newline
    let password = password.trim_end_matches('\n').trim_end_matches('\r');

    if password.is_empty() {
        anyhow::bail!("Password from stdin is empty");
    }

    Ok(password.to_string())
}

/// Set up tracing/logging based on verbosity level
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

/// Categorize an error into an exit code using typed error downcasting
///
/// This approach is more robust than string matching because it doesn't
/// depend on error message wording.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(folder_err) = cause.downcast_ref::<FolderError>() {
            match folder_err {
                FolderError::MissingRoot(_) => return exit_code::NOT_FOUND,
                FolderError::AlreadyOpen(_) | FolderError::NotOpen(_) => {
                    return exit_code::FOLDER_STATE;
                }
                FolderError::Password(PasswordValidationError::IncorrectPassword) => {
                    return exit_code::AUTH_FAILED;
                }
                _ => {}
            }
        }

        if let Some(PasswordValidationError::IncorrectPassword) =
            cause.downcast_ref::<PasswordValidationError>()
        {
            return exit_code::AUTH_FAILED;
        }

        // Generic I/O errors
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::PermissionDenied => return exit_code::PERMISSION_DENIED,
                io::ErrorKind::NotFound => return exit_code::NOT_FOUND,
                _ => {}
            }
        }
    }

    exit_code::GENERAL_ERROR
}
