// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Expiration Scheduler
//!
//! Background task that runs the expiration sweep once a day.
//!
//! ## Strategy
//!
//! The scheduler sleeps until the next `sweep_hour:00` UTC, then:
//! 1. Runs [`ExpirationSweep::run`] as of the wake-up time.
//! 2. Purges read notifications older than the retention period.
//!
//! Runs never overlap: the next sleep only starts once both steps finish.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::sweep::ExpirationSweep;
use crate::storage::{NotificationLedger, VaultDatabase};

/// Default wall-clock hour (UTC) of the daily sweep.
pub const DEFAULT_SWEEP_HOUR: u32 = 9;

/// Default age after which read notifications are purged.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Next occurrence of `hour:00` UTC strictly after `now`.
pub fn next_run_after(now: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = Utc.from_utc_datetime(&now.date_naive().and_time(at));
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

pub struct ExpirationScheduler {
    db: Arc<VaultDatabase>,
    sweep: ExpirationSweep,
    sweep_hour: u32,
    retention: Duration,
}

impl ExpirationScheduler {
    pub fn new(db: Arc<VaultDatabase>, sweep: ExpirationSweep, sweep_hour: u32, retention_days: i64) -> Self {
        Self {
            db,
            sweep,
            sweep_hour,
            retention: Duration::try_days(retention_days).unwrap_or(Duration::MAX),
        }
    }

    /// Run the scheduler loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(scheduler.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            sweep_hour_utc = self.sweep_hour,
            retention_days = self.retention.num_days(),
            "Expiration scheduler starting"
        );

        loop {
            let now = Utc::now();
            let next = next_run_after(now, self.sweep_hour);
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next_run = %next, "Expiration scheduler sleeping");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {},
                _ = shutdown.cancelled() => {
                    info!("Expiration scheduler shutting down");
                    return;
                }
            }

            self.tick(Utc::now()).await;
        }
    }

    /// One scheduled run: sweep, then retention purge.
    pub async fn tick(&self, now: DateTime<Utc>) {
        self.sweep.run(now).await;

        let Some(cutoff) = now.checked_sub_signed(self.retention) else {
            warn!(
                retention_days = self.retention.num_days(),
                "Retention cutoff out of range; purge skipped"
            );
            return;
        };
        match NotificationLedger::new(&self.db).purge_read_before(cutoff) {
            Ok(purged) => info!(purged, cutoff = %cutoff, "Read notifications purged"),
            Err(e) => warn!(error = %e, "Notification retention purge failed"),
        }
    }
}
