// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Expiration Sweep
//!
//! For every reminder offset `d` in [`REMINDER_DAYS`] the sweep looks for
//! assets (standalone, then showroom) expiring on the UTC calendar day
//! `today + d`, skipping FILES assets and assets with reminders disabled.
//!
//! Each qualifying asset gets at most one reminder per calendar day. The
//! dedup check, the append to the asset's reminder log and the insert of
//! the tenant-wide notification happen in one database transaction; only
//! then are emails sent to every active user of the tenant. A failed email
//! is logged and counted, never retried, and never stops the sweep.
//!
//! A day on which the sweep does not run is not caught up later.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::mailer::Mailer;
use super::messages::{self, Reminder};
use crate::storage::{
    AssetRepository, ClientRepository, DbError, ReminderSubject, ShowroomRepository, StoredAsset,
    StoredNotification, StoredUser, UserRepository, VaultDatabase,
};

/// Days before expiration on which a reminder goes out, in sweep order.
pub const REMINDER_DAYS: [i64; 4] = [5, 3, 2, 0];

/// Emails in flight at once for one reminder.
const EMAIL_CONCURRENCY: usize = 8;

/// Counters for one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub notifications_created: usize,
    pub emails_sent: usize,
    pub emails_failed: usize,
    /// Already reminded today, or owner client/showroom missing.
    pub entities_skipped: usize,
}

enum Outcome {
    Reminded { sent: usize, failed: usize },
    Skipped,
}

/// First and last instant of the UTC calendar day `days` after `now`.
pub fn target_window(now: DateTime<Utc>, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let day = now.date_naive() + Duration::days(days);
    let start = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

pub struct ExpirationSweep {
    db: Arc<VaultDatabase>,
    mailer: Arc<dyn Mailer>,
}

impl ExpirationSweep {
    pub fn new(db: Arc<VaultDatabase>, mailer: Arc<dyn Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Run one sweep as of `now`.
    pub async fn run(&self, now: DateTime<Utc>) -> SweepReport {
        info!(today = %now.date_naive(), "Expiration sweep starting");
        let mut report = SweepReport::default();

        for days in REMINDER_DAYS {
            let (start, end) = target_window(now, days);
            let collections = [
                ("assets", AssetRepository::standalone(&self.db)),
                ("showroom_assets", AssetRepository::showroom_assets(&self.db)),
            ];

            for (collection, repo) in collections {
                let candidates = match repo.expiring_between(start, end) {
                    Ok(candidates) => candidates,
                    Err(e) => {
                        error!(collection, days, error = %e, "Expiration sweep: query failed");
                        continue;
                    }
                };

                for asset in candidates {
                    if asset.reminded_on(now.date_naive()) {
                        report.entities_skipped += 1;
                        continue;
                    }

                    match self.remind(&repo, &asset, days, now).await {
                        Ok(Outcome::Reminded { sent, failed }) => {
                            report.notifications_created += 1;
                            report.emails_sent += sent;
                            report.emails_failed += failed;
                            info!(
                                asset_id = %asset.id,
                                collection,
                                days,
                                emails_sent = sent,
                                emails_failed = failed,
                                "Expiration reminder sent"
                            );
                        }
                        Ok(Outcome::Skipped) => report.entities_skipped += 1,
                        Err(e) => {
                            error!(asset_id = %asset.id, collection, error = %e, "Expiration sweep: asset failed");
                        }
                    }
                }
            }
        }

        info!(
            notifications_created = report.notifications_created,
            emails_sent = report.emails_sent,
            emails_failed = report.emails_failed,
            entities_skipped = report.entities_skipped,
            "Expiration sweep completed"
        );
        report
    }

    async fn remind(
        &self,
        repo: &AssetRepository<'_>,
        asset: &StoredAsset,
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<Outcome, DbError> {
        let Some(client) = ClientRepository::new(&self.db).get(&asset.tenant_id, &asset.client_id)? else {
            warn!(asset_id = %asset.id, client_id = %asset.client_id, "Expiration sweep: client missing");
            return Ok(Outcome::Skipped);
        };

        let showroom_name = match &asset.showroom_id {
            None => None,
            Some(showroom_id) => match ShowroomRepository::new(&self.db).find(showroom_id)? {
                Some(showroom) => Some(showroom.name),
                None => {
                    warn!(asset_id = %asset.id, showroom_id = %showroom_id, "Expiration sweep: showroom missing");
                    return Ok(Outcome::Skipped);
                }
            },
        };

        let reminder = messages::compose(&asset.name, showroom_name.as_deref(), days);
        let notification = StoredNotification {
            id: Uuid::new_v4().to_string(),
            title: reminder.title.clone(),
            message: reminder.message.clone(),
            notification_type: reminder.notification_type,
            tenant_id: asset.tenant_id.clone(),
            client_id: asset.client_id.clone(),
            user_id: None,
            subject: match asset.showroom_id {
                Some(_) => ReminderSubject::ShowroomAsset(asset.id.clone()),
                None => ReminderSubject::Asset(asset.id.clone()),
            },
            asset_name: asset.name.clone(),
            showroom_name: showroom_name.clone(),
            days_until_expiry: days,
            is_read: false,
            created_at: now,
        };

        if !repo.claim_reminder(&asset.id, now, &notification)? {
            return Ok(Outcome::Skipped);
        }

        let recipients = UserRepository::new(&self.db).active_in_tenant(&asset.tenant_id)?;
        let (sent, failed) = self
            .deliver(recipients, &client.name, showroom_name.as_deref(), &reminder)
            .await;
        Ok(Outcome::Reminded { sent, failed })
    }

    /// Email every recipient. Returns `(sent, failed)`.
    ///
    /// Each delivery owns its recipient and mail so the sweep future stays
    /// `Send` for `tokio::spawn`.
    async fn deliver(
        &self,
        recipients: Vec<StoredUser>,
        client_name: &str,
        showroom_name: Option<&str>,
        reminder: &Reminder,
    ) -> (usize, usize) {
        let deliveries: Vec<_> = recipients
            .into_iter()
            .map(|user| {
                let mail = messages::email(&user.name, client_name, showroom_name, reminder);
                let mailer = Arc::clone(&self.mailer);
                async move {
                    match mailer.send(&user.email, &mail.subject, &mail.body).await {
                        Ok(()) => true,
                        Err(e) => {
                            warn!(user_id = %user.id, error = %e, "Expiration sweep: email failed");
                            false
                        }
                    }
                }
            })
            .collect();

        let results: Vec<bool> = stream::iter(deliveries)
            .buffer_unordered(EMAIL_CONCURRENCY)
            .collect()
            .await;

        let sent = results.iter().filter(|ok| **ok).count();
        (sent, results.len() - sent)
    }
}
