use std::time::Duration;

use anyhow::Context;
use folio_config::Config;
use folio_email_contracts::EmailService;
use folio_shared_contracts::rate_limit::RateLimitService;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::{
    email,
    environment::{self, types::RateLimit},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let email = email::connect(&config.email)?;
    match &email {
        Some(email) => {
            info!("Connecting to smtp server");
            email
                .ping()
                .await
                .context("Failed to connect to SMTP server")?;
        }
        None => warn!("No SMTP server configured, contact messages will only be logged"),
    }

    let rate_limit = environment::rate_limit(&config);
    spawn_sweeper(rate_limit.clone(), config.rate_limit.sweep_interval.into());

    let server = environment::rest_server(&config, rate_limit, email)?;
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}

/// Periodically drop rate limit records whose window has passed.
fn spawn_sweeper(rate_limit: RateLimit, interval: Duration) {
    if interval.is_zero() {
        info!("Rate limit sweep is disabled");
        return;
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = rate_limit.sweep().await;
            if removed > 0 {
                debug!(removed, "Removed expired rate limit records");
            }
        }
    });
}
