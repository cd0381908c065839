//! Startup wiring: from configuration to an open `BoxOffice`.

use crate::config::Config;
use boxoffice_core::{BoxOffice, Clock, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber: `EnvFilter` plus the `fmt` layer.
///
/// `RUST_LOG` wins when set and valid; otherwise `fallback_filter` is used.
pub fn init_tracing(fallback_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the box office over the configured data files.
///
/// # Errors
///
/// Returns [`boxoffice_core::StoreError::Persistence`] if a data file exists
/// but cannot be read.
pub fn open_box_office(config: &Config, clock: Arc<dyn Clock>) -> Result<BoxOffice> {
    let files = config.data.files();
    info!(
        users = %files.users.display(),
        events = %files.events.display(),
        tickets = %files.tickets.display(),
        "Opening data files"
    );

    let office = BoxOffice::open(files.stores(), &config.limits, config.admin.clone(), clock)?;
    for report in office.load_reports() {
        info!(
            collection = %report.collection,
            loaded = report.loaded,
            skipped = report.skipped,
            "Load report"
        );
    }
    Ok(office)
}
