// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reminder texts for notifications and emails.

use crate::storage::NotificationType;

/// Title, message and type of one reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
}

/// An outgoing reminder email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEmail {
    pub subject: String,
    pub body: String,
}

fn day_word(days: i64) -> &'static str {
    if days == 1 {
        "day"
    } else {
        "days"
    }
}

/// Compose the reminder for an asset `days` away from expiring.
pub fn compose(asset_name: &str, showroom_name: Option<&str>, days: i64) -> Reminder {
    let (subject, about) = match showroom_name {
        Some(showroom) => (
            format!("\"{asset_name}\" in \"{showroom}\""),
            format!("The asset \"{asset_name}\" in showroom \"{showroom}\""),
        ),
        None => (
            format!("\"{asset_name}\""),
            format!("The asset \"{asset_name}\""),
        ),
    };

    if days == 0 {
        Reminder {
            title: format!("{subject} expires TODAY!"),
            message: format!("{about} is expiring today. Please take action to renew."),
            notification_type: NotificationType::ExpirationToday,
        }
    } else {
        let unit = day_word(days);
        Reminder {
            title: format!("{subject} expires in {days} {unit}"),
            message: format!("{about} will expire in {days} {unit}. Please plan for renewal."),
            notification_type: NotificationType::ExpirationReminder,
        }
    }
}

/// Personal email carrying a reminder.
pub fn email(recipient_name: &str, client_name: &str, showroom_name: Option<&str>, reminder: &Reminder) -> ReminderEmail {
    let mut body = format!(
        "Hi {recipient_name},\n\n{}\n\nClient: {client_name}\n",
        reminder.message
    );
    if let Some(showroom) = showroom_name {
        body.push_str(&format!("Showroom: {showroom}\n"));
    }
    body.push_str("\nYou receive this email because expiration reminders are enabled for this asset.");

    ReminderEmail {
        subject: format!("[{client_name}] {}", reminder.title),
        body,
    }
}
