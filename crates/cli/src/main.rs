//! ECOthread CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Create the user table and the session store schema
//! ecothread-cli migrate
//!
//! # Create the demo account (safe to run repeatedly)
//! ecothread-cli seed --password looper-demo
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Create a demo account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ecothread-cli")]
#[command(author, version, about = "ECOthread CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create a demo account
    Seed {
        /// Demo account email address
        #[arg(short, long, default_value = commands::seed::DEMO_EMAIL)]
        email: String,

        /// Demo account password
        #[arg(short, long, env = "ECOTHREAD_SEED_PASSWORD")]
        password: String,

        /// Demo account display name
        #[arg(short, long, default_value = commands::seed::DEMO_NAME)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            email,
            password,
            name,
        } => commands::seed::demo_account(&email, &password, &name).await?,
    }
    Ok(())
}
