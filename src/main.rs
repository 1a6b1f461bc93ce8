// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use asset_vault_server::{
    api::router,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    crypto::FieldCipher,
    notifications::{ExpirationScheduler, ExpirationSweep, HttpMailer, LogMailer, Mailer},
    state::{AppState, AuthConfig},
    storage::{FileStore, StoragePaths, VaultDatabase},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Asset vault server failed");
        eprintln!("asset-vault-server: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);
    info!(config = ?config, "Configuration loaded");

    // A bad key stops startup before any request is served
    let cipher = FieldCipher::from_key_material(&config.encryption_key)?;

    let paths = StoragePaths::new(&config.data_dir, &config.uploads_dir);
    std::fs::create_dir_all(paths.data_dir())?;
    let db = Arc::new(VaultDatabase::open(&paths.database_file())?);
    let mut files = FileStore::new(paths);
    files.initialize()?;
    info!(
        database = %files.paths().database_file().display(),
        uploads = %files.paths().uploads_dir().display(),
        "Storage ready"
    );

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail) => {
            let mailer = HttpMailer::new(&mail.api_url, mail.api_key.clone(), config.mail_from.clone())?;
            info!(endpoint = %mailer.endpoint(), "Reminder emails go through the mail relay");
            Arc::new(mailer)
        }
        None => {
            info!("No mail relay configured; reminder emails are only logged");
            Arc::new(LogMailer)
        }
    };

    let shutdown = CancellationToken::new();
    let scheduler = ExpirationScheduler::new(
        db.clone(),
        ExpirationSweep::new(db.clone(), mailer),
        config.sweep_hour,
        config.retention_days,
    );
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown.clone()));

    let state = AppState::new(
        db,
        Arc::new(files),
        Arc::new(cipher),
        AuthConfig::hs256(&config.jwt_secret),
    );
    let app = router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Asset vault server listening (docs at /docs)");

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Err(e) = scheduler_handle.await {
        error!(error = %e, "Expiration scheduler task failed");
    }
    info!("Shutdown complete");
    Ok(())
}
