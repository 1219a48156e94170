// libs/slot-cell/src/services/scheduler.rs
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

use shared_config::AppConfig;

use crate::services::generator::SlotGeneratorService;

/// Daily background trigger for the slot generator. Failures are logged and
/// swallowed; the next day's run fills any gap because generation is
/// idempotent.
pub struct SlotGeneratorJob {
    config: Arc<AppConfig>,
}

impl SlotGeneratorJob {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    #[instrument(skip(self))]
    pub async fn run(self) {
        let generator = SlotGeneratorService::new(&self.config);
        info!(
            "Slot generator job started, daily run at {:02}:00 UTC",
            self.config.slot_generation_hour_utc
        );

        loop {
            let wait = duration_until_next_run(Utc::now(), self.config.slot_generation_hour_utc);
            debug!("Next slot generation run in {}s", wait.as_secs());
            sleep(wait).await;

            match generator.generate_monthly_slots().await {
                Ok(report) => info!(
                    "Daily slot generation complete: {} created, {} already present, {} schedules skipped",
                    report.slots_created, report.slots_skipped, report.schedules_skipped
                ),
                Err(e) => error!("Daily slot generation failed: {}", e),
            }
        }
    }
}

/// Time until the next occurrence of `hour_utc:00`, strictly in the future.
pub fn duration_until_next_run(now: DateTime<Utc>, hour_utc: u32) -> StdDuration {
    let hour = hour_utc.min(23);
    let today_run = match now.date_naive().and_hms_opt(hour, 0, 0) {
        Some(dt) => dt.and_utc(),
        None => return StdDuration::from_secs(24 * 60 * 60),
    };

    let next_run = if today_run > now {
        today_run
    } else {
        today_run + Duration::days(1)
    };

    (next_run - now).to_std().unwrap_or_default()
}
