use crate::application_port::UserService;
use crate::logger::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Logs the total number of users every `interval` until cancelled.
pub struct UserCountReporter {
    user_service: Arc<dyn UserService>,
    interval: Duration,
    cancellation_token: CancellationToken,
}

impl UserCountReporter {
    pub fn new(
        user_service: Arc<dyn UserService>,
        interval: Duration,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            user_service,
            interval,
            cancellation_token,
        }
    }

    async fn tick_once(&self) -> anyhow::Result<u64> {
        let count = self.user_service.count_users().await?;
        info!(total_users = count, "user count");
        Ok(count)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    info!("user count reporter shutting down...");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick_once().await {
                        error!("counting users: {:#}", e);
                    }
                }
            }
        }
        Ok(())
    }
}
