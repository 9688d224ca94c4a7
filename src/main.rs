use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{load_settings, ConfigOverrides, Settings};
use database::{connect, ensure_schema, MemoryQuoteStore, QuoteRepository};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the quote service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; real deployments set DATABASE_URL and PORT directly.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::InitDb(overrides) => handle_init_db(overrides).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Stores short attributed quotes and serves them over HTTP.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Defaults to `serve` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Create the quotes table if it is missing, then exit.
    InitDb(ConfigOverrides),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve(ServeArgs::default())
    }
}

#[derive(Parser, Default)]
struct ServeArgs {
    #[command(flatten)]
    overrides: ConfigOverrides,

    /// Keep quotes in process memory instead of PostgreSQL. Nothing is persisted.
    #[arg(long)]
    in_memory: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.overrides).context("failed to load configuration")?;

    let repo = if args.in_memory {
        tracing::warn!("Running with the in-memory store; quotes are lost on exit.");
        QuoteRepository::new(Arc::new(MemoryQuoteStore::new()))
    } else {
        QuoteRepository::postgres(open_database(&settings).await?)
    };

    web_server::run_server(&settings.server, repo).await
}

async fn handle_init_db(overrides: ConfigOverrides) -> anyhow::Result<()> {
    let settings = load_settings(&overrides).context("failed to load configuration")?;
    let pool = open_database(&settings).await?;
    pool.close().await;
    Ok(())
}

/// Connects and ensures the schema. Either failure is fatal for the process.
async fn open_database(settings: &Settings) -> anyhow::Result<sqlx::PgPool> {
    let pool = connect(&settings.database)
        .await
        .context("failed to connect to the database")?;
    ensure_schema(&pool)
        .await
        .context("failed to create the quotes table")?;
    Ok(pool)
}
