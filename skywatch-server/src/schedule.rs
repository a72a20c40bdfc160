//! Scheduled ingest.
//!
//! Runs the ingest handler on a fixed period, standing in for an external
//! cron trigger. The first run happens one full period after start-up.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::handlers::IngestHandler;

/// Runs the ingest loop until the task is aborted
pub async fn run_ingest_schedule(handler: IngestHandler, period: Duration) {
    info!("Scheduled ingest every {}s", period.as_secs());

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Skip the first immediate tick
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let response = handler.handle().await;
        if response.is_success() {
            info!("Scheduled ingest completed");
        } else {
            warn!("Scheduled ingest failed with status {}", response.status_code);
        }
    }
}
