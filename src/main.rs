use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fileflow::server::{self, MigrateDirection};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the file hosting server
    Serve {
        #[clap(short, long, default_value = "8000")]
        port: u16,
        #[clap(short, long, default_value = "fileflow.db")]
        database: String,
        #[clap(short, long, default_value = "uploads")]
        upload_root: String,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Run database migrations
    Migrate {
        #[clap(subcommand)]
        direction: MigrateDirection,
        #[clap(short, long, default_value = "fileflow.db")]
        database: String,
    },
    /// Seed the database with the file type catalog and a default project
    Seed {
        #[clap(short, long, default_value = "fileflow.db")]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Command::Serve {
            port,
            database,
            upload_root,
            cors_origin,
        } => {
            info!("Starting server on port {}", port);
            server::start_server(port, &database, Path::new(&upload_root), cors_origin.as_deref())
                .await?;
        }
        Command::Migrate {
            direction,
            database,
        } => {
            server::migrate_database(&database, direction).await?;
        }
        Command::Seed { database } => {
            server::seed_database(&database).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .without_time()
        .init();
}
