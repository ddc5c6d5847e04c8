use std::{future::Future, time::Duration};

use anyhow::Context;

use crate::{
    dispatch::{Dispatcher, UpdateHandler},
    telegram::TelegramClient,
};

/// Pause after a failed `getUpdates` call before polling again
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Long-polls Telegram for updates until `shutdown` resolves, then waits for
/// in-flight runs.
///
/// Any registered webhook is removed first, since Telegram refuses
/// `getUpdates` while one is set.
pub async fn run_polling<H>(
    telegram: &TelegramClient,
    dispatcher: Dispatcher<H>,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()>
where
    H: UpdateHandler + Send + Sync + 'static,
{
    telegram
        .delete_webhook()
        .await
        .context("Failed to remove webhook before polling")?;
    tracing::info!("Polling for updates");

    tokio::pin!(shutdown);
    let mut offset = 0_i64;

    loop {
        let updates = tokio::select! {
            _ = &mut shutdown => break,
            result = telegram.get_updates(offset, TelegramClient::POLL_TIMEOUT_SECS) => result,
        };

        match updates {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    dispatcher.dispatch(update);
                }
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to fetch updates");
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(POLL_ERROR_BACKOFF) => {}
                }
            }
        }
    }

    tracing::info!("Stopped polling");
    dispatcher.shutdown().await;
    Ok(())
}
