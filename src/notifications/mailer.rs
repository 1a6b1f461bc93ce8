// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound mail.
//!
//! The sweep talks to a [`Mailer`]. [`HttpMailer`] posts each message to a
//! JSON mail relay; [`LogMailer`] is used when no relay is configured and
//! only records the send in the log.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use url::Url;

/// Timeout for one relay request.
const RELAY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay rejected the message with status {0}")]
    Rejected(u16),

    #[error("invalid mail relay configuration: {0}")]
    Config(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Mail relay reached over HTTP.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: &str, api_key: Option<String>, from: impl Into<String>) -> Result<Self, MailError> {
        let endpoint = Url::parse(endpoint).map_err(|e| MailError::Config(format!("{endpoint}: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(MailError::Config(format!("unsupported scheme {}", endpoint.scheme())));
        }
        let client = reqwest::Client::builder().timeout(RELAY_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            from: from.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let message = RelayMessage {
            from: &self.from,
            to,
            subject,
            text: body,
        };

        let mut request = self.client.post(self.endpoint.clone()).json(&message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

/// Mailer that only logs. Used when no relay is configured.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), MailError> {
        info!(to = %to, subject = %subject, "Mail relay not configured; email logged only");
        Ok(())
    }
}
