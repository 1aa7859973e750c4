use std::{sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::{
    config::{Config, DatabaseConfig},
    domain::events::InboundEvent,
    handlers::BotHandler,
    repository::{PgRepository, Repository},
    services::{ReferralLedger, UserRegistry},
    telegram::{client::BotClient, types::Update},
};

/// Pause after a failed `getUpdates` call before polling again.
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(3);

pub struct Application;

impl Application {
    /// Wires everything up and polls until interrupted. Any failure before
    /// the first poll is fatal.
    pub async fn build(config: Config) -> anyhow::Result<()> {
        Self::setup_tracing(&config.application.debug_mode)?;

        let db_pool = Self::get_pool(&config.database);
        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("failed to create tables")?;
        tracing::info!("database schema ready");

        let client = BotClient::new(&config.telegram)?;
        let me = client
            .get_me()
            .await
            .context("telegram authentication failed")?;
        let bot_username = me
            .username
            .context("bot account has no username to build links with")?;
        tracing::info!("authorized on account {}", bot_username);

        let repository: Arc<dyn Repository> = Arc::new(PgRepository::new(db_pool));
        let handler = BotHandler::new(
            UserRegistry::new(repository.clone()),
            ReferralLedger::new(repository, config.referral.max_attempts),
            Arc::new(client.clone()),
            bot_username,
        );

        tokio::select! {
            _ = Self::poll(&client, &handler, config.telegram.poll_timeout) => {}
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for shutdown signal")?;
                tracing::info!("shutting down");
            }
        }

        Ok(())
    }

    /// Long-polls for updates and handles them one at a time, in order.
    async fn poll(client: &BotClient, handler: &BotHandler, timeout: u64) {
        let mut offset: i64 = 0;
        loop {
            let updates = match client.get_updates(offset, timeout).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to get updates, retrying in 3 seconds");
                    tokio::time::sleep(POLL_ERROR_PAUSE).await;
                    continue;
                }
            };

            let (next_offset, events) = collect_events(offset, &updates);
            offset = next_offset;
            for event in events {
                handler.handle(event).await;
            }
        }
    }

    fn setup_tracing(debug_mode: &str) -> anyhow::Result<()> {
        LogTracer::init()?;
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| debug_mode.into()))
            .with(tracing_subscriber::fmt::layer());
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }

    fn get_pool(db_config: &DatabaseConfig) -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy_with(db_config.get_connect_options())
    }
}

/// Classifies one `getUpdates` batch and returns the offset that acknowledges
/// it. Updates that carry no actionable message still advance the offset.
pub(crate) fn collect_events(offset: i64, updates: &[Update]) -> (i64, Vec<InboundEvent>) {
    let mut next_offset = offset;
    let mut events = Vec::new();
    for update in updates {
        next_offset = next_offset.max(update.update_id + 1);
        tracing::debug!(update_id = update.update_id, "received update >>> {:?}", update.message);

        if let Some(event) = update.message.as_ref().and_then(InboundEvent::from_message) {
            events.push(event);
        }
    }
    (next_offset, events)
}
