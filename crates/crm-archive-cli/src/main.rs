//! crm-archive - archive emails into the CRM from the command line.
//!
//! Stands in for the mail add-in's task pane: signs in, searches CRM
//! accounts, and archives a message by id against an account, a domain, or
//! an account name. Results are printed as JSON.

mod cli;
mod sign_in;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use crm_archive_core::{Account, ArchiveOutcome, Config, CrmClient, StaticMailbox, TokenManager};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Command;
use sign_in::TerminalSignIn;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Run one command. `Ok(false)` means the command ran but reported a failure.
async fn run(args: &[String]) -> Result<bool> {
    let command = match cli::parse(args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n", cli::USAGE);
            return Err(e);
        }
    };
    let mut config = Config::load()?;

    match command {
        Command::Help => {
            println!("{}", cli::USAGE);
            Ok(true)
        }
        Command::ConfigShow => {
            print_json(&serde_json::json!({
                "path": Config::config_path()?.display().to_string(),
                "base_url": config.base_url(),
                "user_email": config.user_email,
                "request_timeout_secs": config.request_timeout().as_secs(),
            }))?;
            Ok(true)
        }
        Command::ConfigSetBaseUrl(url) => {
            config.base_url = Some(url);
            config.save().context("Failed to save config")?;
            Ok(true)
        }
        Command::ConfigSetEmail(email) => {
            config.user_email = Some(email);
            config.save().context("Failed to save config")?;
            Ok(true)
        }
        Command::Search { query } => {
            let crm = connect(&config, None)?;
            match crm.search_accounts(&query).await {
                Ok(accounts) => {
                    print_json(&accounts)?;
                    Ok(true)
                }
                Err(e) => report(ArchiveOutcome::failure(e.to_string())),
            }
        }
        Command::Archive {
            message_id,
            account_id,
            account_name,
        } => {
            let crm = connect(&config, Some(message_id))?;
            let outcome = crm
                .archive_to_account(&Account::new(account_id, account_name))
                .await;
            report(outcome)
        }
        Command::ArchiveBy {
            message_id,
            identifier,
            identifier_type,
        } => {
            let crm = connect(&config, Some(message_id))?;
            let outcome = crm.archive_by_identifier(&identifier, identifier_type).await;
            report(outcome)
        }
    }
}

/// Build a client for one session, with the message (if any) as the open item.
fn connect(config: &Config, message_id: Option<String>) -> Result<CrmClient> {
    let tokens = TokenManager::from_config(config, Arc::new(TerminalSignIn::from_env()))
        .context("Failed to create HTTP client")?;
    info!(base_url = %tokens.base_url(), "Session started");

    let mailbox = StaticMailbox::new(message_id, config.user_email.clone());
    Ok(CrmClient::new(Arc::new(tokens), Arc::new(mailbox)))
}

fn report(outcome: ArchiveOutcome) -> Result<bool> {
    print_json(&outcome)?;
    Ok(outcome.success)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
