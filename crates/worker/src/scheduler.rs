//! Long-running `run` mode.
//!
//! Runs `update-status` then `seo-sync` on a fixed interval until `cancel`
//! is triggered. The seo sync freshness check keeps Google calls to one per
//! staleness period whatever the interval.

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::commands::seo_sync::{self, SeoSyncOptions};
use crate::commands::update_status;
use crate::config::WorkerConfig;

/// Run the scheduler loop. Errors of a pass are logged, never fatal.
pub async fn run(pool: PgPool, config: WorkerConfig, cancel: CancellationToken) {
    tracing::info!(interval_secs = config.interval.as_secs(), "Scheduler started");

    let mut interval = tokio::time::interval(config.interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Scheduler stopping");
                break;
            }
            _ = interval.tick() => {
                run_pass(&pool, &config).await;
            }
        }
    }
}

async fn run_pass(pool: &PgPool, config: &WorkerConfig) {
    let now = Utc::now();

    match update_status::run(pool, now.date_naive()).await {
        Ok(report) if !report.is_success() => {
            tracing::warn!(errors = report.errors, "Status update pass had errors");
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "Status update pass failed"),
    }

    match seo_sync::run(pool, config, SeoSyncOptions::default(), now).await {
        Ok(report) if !report.is_success() => {
            tracing::warn!(errors = report.total_errors(), "SEO sync pass had errors");
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "SEO sync pass failed"),
    }
}
