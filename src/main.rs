//! keyfob - terminal TOTP authenticator
//!
//! Stores named accounts with Base32 secrets and generates RFC 6238
//! codes, either one-shot or as a live view refreshed at every
//! 30-second boundary.

use clap::{Parser, Subcommand};
use keyfob_core::{error::KeyfobError, init_logging};

mod cli;

#[derive(Parser)]
#[command(name = "keyfob")]
#[command(about = "Terminal TOTP authenticator with an epoch-aligned live view")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an account
    Add {
        /// Account name (case-sensitive, must be unused)
        name: String,
        /// Base32 secret; internal spaces are fine when quoted
        secret: String,
    },
    /// Replace an account's name and secret in one step
    Rename {
        /// Current account name
        name: String,
        /// New account name
        new_name: String,
        /// New Base32 secret
        secret: String,
    },
    /// Remove an account
    Remove {
        /// Account name
        name: String,
    },
    /// List all accounts with their current codes
    List,
    /// Print one account's current code
    Code {
        /// Account name
        name: String,
    },
    /// Live view with codes redrawn at every 30-second boundary
    Watch,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add { name, secret } => cli::accounts::run_add(&name, &secret),
        Commands::Rename {
            name,
            new_name,
            secret,
        } => cli::accounts::run_rename(&name, &new_name, &secret),
        Commands::Remove { name } => cli::accounts::run_remove(&name),
        Commands::List => cli::accounts::run_list(),
        Commands::Code { name } => cli::accounts::run_code(&name),
        Commands::Watch => cli::watch::run_watch().await,
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Bad input: unknown names, duplicates, undecodable secrets (exit code 2)
                KeyfobError::Otp(_) | KeyfobError::Store(_) => 2,
                // Runtime I/O failures (exit code 1)
                KeyfobError::Persist(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
