use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use swagsuite_api::{
    config, db,
    services::reconciliation::{ReconcileReport, ReconciliationService},
};

/// Recomputes stored line and order totals and repairs rows that drifted.
#[derive(Debug, Parser)]
#[command(name = "reconcile-totals", version)]
struct Cli {
    /// Report what would change without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Print the full report as JSON.
    #[arg(long)]
    json: bool,

    /// Overrides the configured database URL.
    #[arg(long)]
    database_url: Option<String>,
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

    // No event processor runs here, so the service gets no sender.
    let service = ReconciliationService::new(Arc::new(pool), None);
    let report = service.reconcile(cli.dry_run).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &ReconcileReport) {
    let mode = if report.dry_run { "dry run" } else { "applied" };
    info!(
        orders_scanned = report.orders_scanned,
        orders_repaired = report.orders_repaired,
        items_repaired = report.items_repaired,
        "Reconciliation finished ({})",
        mode
    );
    println!(
        "Scanned {} orders, {} with drift, {} line items corrected ({}).",
        report.orders_scanned, report.orders_repaired, report.items_repaired, mode
    );
    for repair in &report.repairs {
        if report.dry_run {
            warn!(order = %repair.order_number, "Totals drifted");
        }
        println!(
            "  {}  subtotal {} -> {}  total {} -> {}  ({} items)",
            repair.order_number,
            repair.subtotal_before,
            repair.subtotal_after,
            repair.total_before,
            repair.total_after,
            repair.items_repaired
        );
    }
}
