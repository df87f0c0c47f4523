// service/scheduler.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};

use crate::service::{
    points_conversion::PointsConversionService, roi_distribution::RoiDistributionService,
};

/// Injectable wall clock so next-midnight arithmetic is testable without
/// waiting on real time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time remaining until the next UTC midnight strictly after `now`.
pub fn duration_until_next_midnight(now: DateTime<Utc>) -> std::time::Duration {
    let next_midnight = (now + chrono::Duration::days(1))
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc();

    (next_midnight - now).to_std().unwrap_or_default()
}

pub const DAILY_INTERVAL_SECS: u64 = 86_400;
pub const HOURLY_INTERVAL_SECS: u64 = 3_600;

/// Owns the two batch timers. `start()` arms a daily timer that fires at
/// the next UTC midnight (ROI distribution then points conversion) and an
/// independent hourly timer for points conversion alone; `stop()` aborts
/// both. Overlapping runs are not locked against — idempotency lives in
/// the per-investment and per-task guards, not here.
pub struct BatchScheduler {
    roi_service: Arc<RoiDistributionService>,
    points_service: Arc<PointsConversionService>,
    clock: Arc<dyn Clock>,
    run_on_startup: bool,
    handles: Vec<JoinHandle<()>>,
}

impl BatchScheduler {
    pub fn new(
        roi_service: Arc<RoiDistributionService>,
        points_service: Arc<PointsConversionService>,
        clock: Arc<dyn Clock>,
        run_on_startup: bool,
    ) -> Self {
        Self {
            roi_service,
            points_service,
            clock,
            run_on_startup,
            handles: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        if self.run_on_startup {
            // Non-production convenience: fire both batches once right away.
            let roi_service = self.roi_service.clone();
            let points_service = self.points_service.clone();
            self.handles.push(tokio::spawn(async move {
                tracing::info!("Startup run of both batches");
                if let Err(e) = roi_service.run().await {
                    tracing::error!("Startup ROI distribution failed: {}", e);
                }
                if let Err(e) = points_service.run().await {
                    tracing::error!("Startup points conversion failed: {}", e);
                }
            }));
        }

        // Daily timer: sleep until the next UTC midnight, then every 24h.
        let roi_service = self.roi_service.clone();
        let points_service = self.points_service.clone();
        let wait = duration_until_next_midnight(self.clock.now());
        self.handles.push(tokio::spawn(async move {
            tracing::info!(
                "Daily distribution armed: first run in {} seconds",
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;

            let mut ticker = interval(Duration::from_secs(DAILY_INTERVAL_SECS));
            loop {
                ticker.tick().await;

                tracing::info!("Running daily ROI distribution at {}", Utc::now());
                match roi_service.run().await {
                    Ok(summary) => tracing::info!(
                        "Daily ROI distribution completed: {} paid, {} completed",
                        summary.paid,
                        summary.completed
                    ),
                    Err(e) => tracing::error!("Daily ROI distribution failed: {}", e),
                }

                if let Err(e) = points_service.run().await {
                    tracing::error!("Daily points conversion failed: {}", e);
                }
            }
        }));

        // Hourly timer: points conversion alone, to settle newly-eligible
        // conversions promptly. The immediate first tick is consumed so the
        // first run is one hour in.
        let points_service = self.points_service.clone();
        self.handles.push(tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(HOURLY_INTERVAL_SECS));
            ticker.tick().await;
            loop {
                ticker.tick().await;

                tracing::info!("Running hourly points conversion at {}", Utc::now());
                if let Err(e) = points_service.run().await {
                    tracing::error!("Hourly points conversion failed: {}", e);
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        tracing::info!("Batch scheduler stopped");
    }
}

impl Drop for BatchScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn next_midnight_from_midday() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let wait = duration_until_next_midnight(now);
        assert_eq!(wait.as_secs(), 12 * 3_600);
    }

    #[test]
    fn next_midnight_from_just_before_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 23, 59, 59).unwrap();
        assert_eq!(duration_until_next_midnight(now).as_secs(), 1);
    }

    #[test]
    fn next_midnight_from_exactly_midnight_is_a_full_day() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        assert_eq!(
            duration_until_next_midnight(now).as_secs(),
            DAILY_INTERVAL_SECS
        );
    }

    #[test]
    fn next_midnight_crosses_month_end() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 18, 30, 0).unwrap();
        let wait = duration_until_next_midnight(now);
        assert_eq!(wait.as_secs(), 5 * 3_600 + 30 * 60);

        let clock = FixedClock(now);
        // The clock trait is what the scheduler consumes; sanity-check it.
        assert_eq!(clock.now(), now);
    }
}
