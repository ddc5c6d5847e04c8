use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    dispatch::{Dispatcher, UpdateHandler},
    telegram::TelegramClient,
    types::Update,
};

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub bind_addr: SocketAddr,
    /// Public base url Telegram can reach, without the `/webhook/...` path
    pub public_base_url: String,
    pub secret: String,
}

impl WebhookConfig {
    pub fn webhook_url(&self) -> String {
        format!(
            "{}/webhook/{}",
            self.public_base_url.trim_end_matches('/'),
            self.secret
        )
    }
}

struct AppState<H> {
    dispatcher: Dispatcher<H>,
    secret: String,
}

/// `GET /` health check and `POST /webhook/{secret}` update intake
pub fn router<H>(dispatcher: Dispatcher<H>, secret: impl Into<String>) -> Router
where
    H: UpdateHandler + Send + Sync + 'static,
{
    let state = Arc::new(AppState {
        dispatcher,
        secret: secret.into(),
    });

    Router::new()
        .route("/", get(health_check))
        .route("/webhook/{secret}", post(receive_update::<H>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Acknowledges the update as soon as it has been handed to the dispatcher
async fn receive_update<H>(
    State(state): State<Arc<AppState<H>>>,
    Path(secret): Path<String>,
    Json(update): Json<Update>,
) -> StatusCode
where
    H: UpdateHandler + Send + Sync + 'static,
{
    if secret != state.secret {
        tracing::warn!("Rejected webhook call with wrong secret");
        return StatusCode::NOT_FOUND;
    }

    tracing::debug!(update_id = update.update_id, "Received update");
    state.dispatcher.dispatch(update);
    StatusCode::OK
}

/// Registers the webhook with Telegram and serves until `shutdown` resolves,
/// then waits for in-flight runs.
pub async fn serve_webhook<H>(
    config: WebhookConfig,
    telegram: &TelegramClient,
    dispatcher: Dispatcher<H>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()>
where
    H: UpdateHandler + Send + Sync + 'static,
{
    telegram
        .set_webhook(&config.webhook_url())
        .await
        .context("Failed to register webhook")?;
    tracing::info!(public_base_url = %config.public_base_url, "Webhook registered");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Listening for updates");

    let app = router(dispatcher.clone(), config.secret);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Webhook server failed")?;

    dispatcher.shutdown().await;
    Ok(())
}
