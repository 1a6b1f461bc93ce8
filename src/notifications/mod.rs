// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Notifications
//!
//! Expiration reminders: the daily [`ExpirationSweep`], the
//! [`ExpirationScheduler`] that drives it, reminder texts and outbound mail.
//! The ledger itself lives in [`crate::storage::NotificationLedger`].

pub mod mailer;
pub mod messages;
pub mod scheduler;
pub mod sweep;

pub use mailer::{HttpMailer, LogMailer, MailError, Mailer};
pub use scheduler::ExpirationScheduler;
pub use sweep::{ExpirationSweep, SweepReport, REMINDER_DAYS};
