//! # newsharvest
//!
//! Harvests a news site section: walks the paginated listing newest-first,
//! visits each linked article, keeps the ones whose publication date falls
//! inside the configured window, and writes the result as one JSON array.
//!
//! ## Usage
//!
//! ```sh
//! newsharvest
//! ```
//!
//! There are no runtime flags; the date window, output path, timeouts, and
//! target site live in [`config`] and are edited in source.
//!
//! ## Architecture
//!
//! One sequential pipeline:
//! 1. **Listing**: load a listing page at the current offset
//! 2. **Extraction**: visit each article, filter by date, extract content
//! 3. **Advance**: probe the next offset, stride 10, until a stop condition
//! 4. **Output**: persist whatever was accumulated, on every exit path

use std::error::Error;
use tracing::{error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod config;
mod crawler;
mod dates;
mod models;
mod outputs;
mod retry;
mod scrape;
mod session;
mod utils;

use config::{HarvestConfig, SiteProfile};
use crawler::StopReason;
use session::HttpPageSource;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsharvest starting up");

    let config = HarvestConfig::default();
    let profile = SiteProfile::default();
    info!(
        start_date = ?config.start_date,
        end_date = ?config.end_date,
        output_file = %config.output_file.display(),
        page_timeout = ?config.page_timeout,
        max_pages = ?config.max_pages,
        listing = %profile.listing_url(0),
        "configuration loaded"
    );

    // The session lives for the whole run and is threaded into every crawl
    // step; dropping it on any exit path below releases it.
    let mut session = HttpPageSource::new(config.page_timeout, &profile.user_agent)?;

    let report = crawler::run(&mut session, &config, &profile).await;
    info!(
        records = report.records.len(),
        pages_fetched = report.pages_fetched,
        "crawl loop exited"
    );

    // Partial results beat no results: persist before surfacing any failure.
    if let Err(e) = outputs::json::write_records(&report.records, &config.output_file).await {
        error!(error = %e, path = %config.output_file.display(), "failed to write output");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "execution complete"
    );

    match report.stop {
        StopReason::ListingFailed(e) => {
            error!(error = %e, "run ended on a listing failure");
            Err(e)
        }
        stop => {
            info!(stop = ?stop, "run ended normally");
            Ok(())
        }
    }
}
