use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use digest_store::PgDataStore;
use tube_digest::{
    anthropic::AnthropicClient,
    dispatch::Dispatcher,
    intake::{run_polling, serve_webhook, WebhookConfig},
    telegram::TelegramClient,
    tracing::init_tracing_subscriber,
    yt::captions::{ProxyConfig, YtCaptionClient},
    SummaryPipelineBuilder,
};

#[derive(Parser)]
#[command(name = "tube-digest", about = "Summarizes YouTube links sent to a Telegram bot")]
struct Cli {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_token: String,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_key: String,

    /// Database connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Model used for summaries
    #[arg(long, env = "SUMMARY_MODEL", default_value = "claude-sonnet-4-5")]
    model: String,

    /// Caption languages to try, most preferred first
    #[arg(
        long,
        env = "TRANSCRIPT_LANGUAGES",
        value_delimiter = ',',
        default_value = "ko,en"
    )]
    languages: Vec<String>,

    /// Outbound proxy for caption requests
    #[arg(long, env = "PROXY_URL")]
    proxy_url: Option<String>,

    #[arg(long, env = "PROXY_USERNAME", requires = "proxy_url")]
    proxy_username: Option<String>,

    #[arg(long, env = "PROXY_PASSWORD", requires = "proxy_username", hide_env_values = true)]
    proxy_password: Option<String>,

    /// Maximum pipeline runs executing at once
    #[arg(long, env = "MAX_CONCURRENT_RUNS", default_value = "8")]
    max_concurrent_runs: usize,

    /// Add a one-sentence digest to confirmations
    #[arg(long, env = "ENABLE_DIGEST")]
    digest: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Receive updates through a webhook
    Serve {
        /// Public base URL Telegram sends updates to
        #[arg(long, env = "PUBLIC_BASE_URL")]
        public_base_url: String,

        /// Secret path segment of the webhook URL
        #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
        webhook_secret: String,

        /// Address to listen on
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },
    /// Long-poll Telegram for updates
    Poll,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let proxy = cli.proxy_url.map(|url| ProxyConfig {
        url,
        username: cli.proxy_username,
        password: cli.proxy_password,
    });

    let store = PgDataStore::init(&cli.database_url).await?;
    let captions = YtCaptionClient::new(proxy.as_ref())?;
    let summarizer = AnthropicClient::new(&cli.anthropic_key).with_model(&cli.model);
    let telegram = TelegramClient::new(&cli.telegram_token);

    let pipeline = SummaryPipelineBuilder::new()
        .store(store)
        .captions(captions)
        .summarizer(summarizer)
        .messenger(telegram.clone())
        .languages(cli.languages)
        .with_digest(cli.digest)
        .build();

    let dispatcher = Dispatcher::new(pipeline, cli.max_concurrent_runs);

    match cli.command {
        Command::Serve {
            public_base_url,
            webhook_secret,
            bind,
        } => {
            let config = WebhookConfig {
                bind_addr: bind,
                public_base_url,
                secret: webhook_secret,
            };
            serve_webhook(config, &telegram, dispatcher, shutdown_signal()).await?;
        }
        Command::Poll => {
            run_polling(&telegram, dispatcher, shutdown_signal()).await?;
        }
    }

    Ok(())
}
