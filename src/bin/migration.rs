use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use migrations::{Migrator, MigratorTrait};
use tracing::info;

use swagsuite_api::{config, db};

/// Applies or rolls back the SwagSuite schema migrations.
#[derive(Debug, Parser)]
#[command(name = "migration", version)]
struct Cli {
    /// Overrides the configured database URL.
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply every pending migration (the default).
    Up,
    /// Roll back the most recent migrations.
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// List applied and pending migrations.
    Status,
    /// Drop every table and apply all migrations from scratch.
    Fresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config().context("failed to load configuration")?;
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;

    match cli.command.unwrap_or(Command::Up) {
        Command::Up => {
            db::run_migrations(&pool).await?;
        }
        Command::Down { steps } => {
            info!(steps, "Rolling back migrations");
            Migrator::down(&pool, Some(steps)).await?;
        }
        Command::Status => {
            Migrator::status(&pool).await?;
        }
        Command::Fresh => {
            info!("Recreating schema from scratch");
            Migrator::fresh(&pool).await?;
        }
    }

    info!("Migration command finished");
    Ok(())
}
