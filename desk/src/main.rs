//! Box office desk.
//!
//! Opens the data files, reports what was loaded and prints the sales report.

use boxoffice_core::SystemClock;
use boxoffice_core::metrics::register_store_metrics;
use boxoffice_desk::{Config, init_tracing, open_box_office};
use std::sync::Arc;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional .env file; real environment variables take precedence
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env();
    init_tracing(&config.log_filter);
    if let Err(error) = dotenv {
        if !error.not_found() {
            warn!(%error, "Failed to read .env file");
        }
    }
    register_store_metrics();

    info!(
        data_dir = %config.data.dir.display(),
        max_users = config.limits.max_users,
        max_events = config.limits.max_events,
        max_tickets = config.limits.max_tickets,
        "Configuration loaded"
    );

    let office = open_box_office(&config, Arc::new(SystemClock))?;
    let [users, events, tickets] = office.load_reports();
    let skipped = users.skipped + events.skipped + tickets.skipped;
    if skipped > 0 {
        warn!(skipped, "Some stored lines could not be loaded");
    }

    print!("{}", office.sales_report());
    Ok(())
}
