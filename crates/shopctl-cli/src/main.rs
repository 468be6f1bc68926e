//! shopctl - seller and admin dashboard CLI
//!
//! A command-line frontend for the shop backend: authentication,
//! dashboard summary, and category/product/review management.

mod commands;
mod output;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shopctl_core::{ApiClient, ApiConfig, CredentialCache, SessionStore};

#[derive(Parser)]
#[command(name = "shopctl")]
#[command(author, version, about = "Seller and admin dashboard CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    /// Backend base URL (or set SHOPCTL_API_URL env var)
    #[arg(long, env = "SHOPCTL_API_URL", global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        email: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Account role: buyer (default), seller or admin
        #[arg(long)]
        role: Option<String>,
    },

    /// Log out and forget the cached session
    Logout,

    /// Show the current session
    Whoami,

    /// Dashboard summary (stats and recent products)
    Dashboard,

    /// Manage product categories (admin)
    Category {
        #[command(subcommand)]
        action: commands::categories::CategoryAction,
    },

    /// Manage products
    Product {
        #[command(subcommand)]
        action: commands::products::ProductAction,
    },

    /// Moderate customer reviews
    Review {
        #[command(subcommand)]
        action: commands::reviews::ReviewAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.api_url {
        Some(url) if !url.trim().is_empty() => ApiConfig::new(url.trim()),
        _ => match ApiConfig::from_env() {
            Ok(config) => config,
            Err(err) => bail!("{}", err),
        },
    };

    log::debug!("using backend {}", config.base_url);

    let api = ApiClient::new(&config)?.with_credential_cache(CredentialCache::default_path()?);
    let session = SessionStore::new(api.clone(), api.auth_state());

    let mut ctx = commands::Context {
        api,
        session,
        format: cli.format,
        quiet: cli.quiet,
        assume_yes: cli.yes,
    };

    // Validate the cached credential before any screen decision
    ctx.session.check().await;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&mut ctx, email, password).await,
        Commands::Register { name, email, password, role } => {
            commands::auth::register(&mut ctx, name, email, password, role).await
        }
        Commands::Logout => commands::auth::logout(&mut ctx).await,
        Commands::Whoami => commands::auth::whoami(&mut ctx),
        Commands::Dashboard => commands::dashboard::execute(&mut ctx).await,
        Commands::Category { action } => commands::categories::execute(&mut ctx, action).await,
        Commands::Product { action } => commands::products::execute(&mut ctx, action).await,
        Commands::Review { action } => commands::reviews::execute(&mut ctx, action).await,
    }
}
