//! Cheffy CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cheffy-cli migrate
//!
//! # Create a user with one saved recipe
//! cheffy-cli seed -e cook@example.com -p "kitchen-secret"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Create a test user with a sample saved recipe

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cheffy-cli")]
#[command(author, version, about = "Cheffy CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with a test user and one saved recipe
    Seed {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// User password
        #[arg(short, long)]
        password: String,

        /// User display name
        #[arg(short, long, default_value = "Test Cook")]
        name: String,

        /// Preferred language
        #[arg(short, long, default_value = "English")]
        language: String,

        /// Country
        #[arg(short, long, default_value = "US")]
        country: String,
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
            language,
            country,
        } => {
            commands::seed::user(&email, &password, &name, &language, &country).await?;
        }
    }
    Ok(())
}
