//! Inbound transports.
//!
//! Both adapters feed the same [`Dispatcher`](crate::dispatch::Dispatcher):
//! the webhook receives updates pushed by Telegram, the poller pulls them.

pub mod polling;
pub mod webhook;

pub use polling::run_polling;
pub use webhook::{router, serve_webhook, WebhookConfig};
