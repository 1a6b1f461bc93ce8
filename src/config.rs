// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and passed down explicitly.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory of the embedded database file | `./data` |
//! | `UPLOADS_DIR` | Root of the tenant/client upload tree | `./uploads` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ENCRYPTION_KEY` | Field key: 64 hex chars, base64 of 32 bytes, or 32 raw bytes | Required |
//! | `JWT_SECRET_KEY` | HS256 secret used to verify caller tokens | Required |
//! | `SWEEP_HOUR_UTC` | Hour of the daily expiration sweep | `9` |
//! | `NOTIFICATION_RETENTION_DAYS` | Age after which read notifications are purged | `30` |
//! | `MAIL_API_URL` | HTTP mail relay endpoint; unset means emails are only logged | unset |
//! | `MAIL_API_KEY` | Bearer token for the mail relay | unset |
//! | `MAIL_FROM` | Sender address | `no-reply@asset-vault.local` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use crate::notifications::scheduler::{DEFAULT_RETENTION_DAYS, DEFAULT_SWEEP_HOUR};
use crate::storage::paths::{DEFAULT_DATA_DIR, DEFAULT_UPLOADS_DIR};

pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const UPLOADS_DIR_ENV: &str = "UPLOADS_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Never logged.
pub const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET_KEY";

pub const SWEEP_HOUR_ENV: &str = "SWEEP_HOUR_UTC";
pub const RETENTION_DAYS_ENV: &str = "NOTIFICATION_RETENTION_DAYS";

pub const MAIL_API_URL_ENV: &str = "MAIL_API_URL";
pub const MAIL_API_KEY_ENV: &str = "MAIL_API_KEY";
pub const MAIL_FROM_ENV: &str = "MAIL_FROM";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAIL_FROM: &str = "no-reply@asset-vault.local";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Upper bound on `NOTIFICATION_RETENTION_DAYS` (about a century).
pub const MAX_RETENTION_DAYS: i64 = 36_500;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Mail relay settings. Absent when `MAIL_API_URL` is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub encryption_key: String,
    pub jwt_secret: String,
    pub sweep_hour: u32,
    pub retention_days: i64,
    pub mail: Option<MailConfig>,
    pub mail_from: String,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("data_dir", &self.data_dir)
            .field("uploads_dir", &self.uploads_dir)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sweep_hour", &self.sweep_hour)
            .field("retention_days", &self.retention_days)
            .field("mail_relay", &self.mail.as_ref().map(|m| &m.api_url))
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    ///
    /// Secrets are taken verbatim; every other value is trimmed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let secret = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let sweep_hour = parse_or(get(SWEEP_HOUR_ENV), SWEEP_HOUR_ENV, DEFAULT_SWEEP_HOUR)?;
        if sweep_hour > 23 {
            return Err(ConfigError::Invalid {
                name: SWEEP_HOUR_ENV,
                reason: format!("{sweep_hour} is not an hour of the day"),
            });
        }
        let retention_days = parse_or(get(RETENTION_DAYS_ENV), RETENTION_DAYS_ENV, DEFAULT_RETENTION_DAYS)?;
        if !(1..=MAX_RETENTION_DAYS).contains(&retention_days) {
            return Err(ConfigError::Invalid {
                name: RETENTION_DAYS_ENV,
                reason: format!("{retention_days} is outside 1..={MAX_RETENTION_DAYS}"),
            });
        }

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("unknown format {other}"),
                })
            }
        };

        Ok(Self {
            data_dir: PathBuf::from(get(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            uploads_dir: PathBuf::from(get(UPLOADS_DIR_ENV).unwrap_or_else(|| DEFAULT_UPLOADS_DIR.to_string())),
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?,
            encryption_key: secret(ENCRYPTION_KEY_ENV)?,
            jwt_secret: secret(JWT_SECRET_ENV)?,
            sweep_hour,
            retention_days,
            mail: get(MAIL_API_URL_ENV).map(|api_url| MailConfig {
                api_url,
                api_key: get(MAIL_API_KEY_ENV),
            }),
            mail_from: get(MAIL_FROM_ENV).unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [(ENCRYPTION_KEY_ENV, "0123456789abcdef0123456789abcdef"), (JWT_SECRET_ENV, "secret")];

    #[test]
    fn defaults_apply() {
        let cfg = config(&REQUIRED).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("./data"));
        assert_eq!(cfg.uploads_dir, PathBuf::from("./uploads"));
        assert_eq!(cfg.bind_address(), "0.0.0.0:8080");
        assert_eq!(cfg.sweep_hour, 9);
        assert_eq!(cfg.retention_days, 30);
        assert!(cfg.mail.is_none());
        assert_eq!(cfg.mail_from, DEFAULT_MAIL_FROM);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn secrets_are_required() {
        assert!(matches!(
            config(&[(JWT_SECRET_ENV, "secret")]),
            Err(ConfigError::Missing(ENCRYPTION_KEY_ENV))
        ));
        assert!(matches!(
            config(&[(ENCRYPTION_KEY_ENV, "k"), (JWT_SECRET_ENV, "  ")]),
            Err(ConfigError::Missing(JWT_SECRET_ENV))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push((PORT_ENV, "eighty"));
        assert!(matches!(config(&vars), Err(ConfigError::Invalid { name: PORT_ENV, .. })));

        let mut vars = REQUIRED.to_vec();
        vars.push((SWEEP_HOUR_ENV, "24"));
        assert!(matches!(config(&vars), Err(ConfigError::Invalid { name: SWEEP_HOUR_ENV, .. })));

        let mut vars = REQUIRED.to_vec();
        vars.push((LOG_FORMAT_ENV, "xml"));
        assert!(config(&vars).is_err());
    }

    #[test]
    fn retention_days_are_bounded() {
        for bad in ["0", "-1", "36501", "1000000000"] {
            let mut vars = REQUIRED.to_vec();
            vars.push((RETENTION_DAYS_ENV, bad));
            assert!(
                matches!(config(&vars), Err(ConfigError::Invalid { name: RETENTION_DAYS_ENV, .. })),
                "{bad} should be rejected"
            );
        }

        let mut vars = REQUIRED.to_vec();
        vars.push((RETENTION_DAYS_ENV, "36500"));
        assert_eq!(config(&vars).unwrap().retention_days, MAX_RETENTION_DAYS);
    }

    #[test]
    fn secrets_keep_surrounding_whitespace() {
        let cfg = config(&[
            (ENCRYPTION_KEY_ENV, " 0123456789abcdef0123456789abcde"),
            (JWT_SECRET_ENV, "secret \n"),
            (HOST_ENV, " 127.0.0.1 "),
        ])
        .unwrap();
        assert_eq!(cfg.encryption_key, " 0123456789abcdef0123456789abcde");
        assert_eq!(cfg.jwt_secret, "secret \n");
        assert_eq!(cfg.host, "127.0.0.1");
    }

    #[test]
    fn mail_relay_and_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            (MAIL_API_URL_ENV, "https://mail.example.com/send"),
            (MAIL_API_KEY_ENV, "key"),
            (LOG_FORMAT_ENV, "JSON"),
            (PORT_ENV, "9090"),
        ]);
        let cfg = config(&vars).unwrap();
        let mail = cfg.mail.clone().unwrap();
        assert_eq!(mail.api_url, "https://mail.example.com/send");
        assert_eq!(mail.api_key.as_deref(), Some("key"));
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.port, 9090);

        let debug = format!("{cfg:?}");
        assert!(!debug.contains("0123456789abcdef"));
        assert!(!debug.contains("secret"));
    }
}
