use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use mail_digest::{
    Credential, DumpSource, EmailStore, Settings, fetch_and_normalize, write_json,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Normalize recent inbox messages and export them for summarization
#[derive(Parser)]
#[command(name = "mail-digest", version)]
struct Cli {
    /// JSON dump mapping message id to provider payload
    #[arg(short, long)]
    input: PathBuf,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the JSON export path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Override the SQLite database path
    #[arg(long)]
    database: Option<PathBuf>,

    /// Skip the database upsert
    #[arg(long = "no-store")]
    no_store: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(path) = cli.export {
        settings.export_path = path;
    }
    if let Some(path) = cli.database {
        settings.database_path = path;
    }

    let credential = load_credential(&settings);
    let source = DumpSource::open(&cli.input)
        .with_context(|| format!("reading message dump {}", cli.input.display()))?;

    let emails = fetch_and_normalize(&source, &credential, settings.window()?)?;
    let without_body = emails.iter().filter(|e| !e.has_body()).count();
    if without_body > 0 {
        warn!("{without_body} emails have no readable body");
    }

    write_json(&settings.export_path, &emails)
        .with_context(|| format!("writing {}", settings.export_path.display()))?;

    if !cli.no_store {
        let mut store = EmailStore::open(&settings.database_path)
            .with_context(|| format!("opening {}", settings.database_path.display()))?;
        store.upsert_all(&emails)?;
        info!("{} emails stored", store.count()?);
    }

    Ok(())
}

fn load_credential(settings: &Settings) -> Credential {
    if !settings.token_file.exists() {
        return Credential::default();
    }

    match Credential::load(&settings.token_file) {
        Ok(credential) => {
            if credential.is_expired(Utc::now()) {
                if credential.can_refresh() {
                    warn!("Access token expired; it will need a refresh before live fetching");
                } else {
                    warn!("Access token expired and has no refresh token");
                }
            }
            credential
        }
        Err(e) => {
            warn!("Ignoring unreadable token file {}: {e}", settings.token_file.display());
            Credential::default()
        }
    }
}
