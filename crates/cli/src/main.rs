use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use algobuddy_core::chat::responder::Responder;
use algobuddy_core::chat::session;
use algobuddy_core::config::Settings;
use algobuddy_core::dashboard::Dashboard;
use algobuddy_core::market::coingecko::CoinGeckoClient;
use algobuddy_core::market::yahoo::YahooFinanceClient;
use algobuddy_core::market::MarketDataClient;
use algobuddy_core::views;

#[derive(Debug, Parser)]
#[command(name = "algobuddy")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask a question the way the chat page would and print the reply.
    Ask {
        /// e.g. "what's the price of aapl" or "bitcoin trend".
        question: String,
    },
    /// Fetch the watchlist and write the dashboard HTML.
    Dashboard {
        /// Output file. Prints to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let equities: Arc<dyn MarketDataClient> = Arc::new(YahooFinanceClient::from_settings(&settings)?);
    let crypto: Arc<dyn MarketDataClient> = Arc::new(CoinGeckoClient::from_settings(&settings)?);

    match args.command {
        Command::Ask { question } => {
            let responder = Responder::new(equities, crypto, settings.trend_windows);
            let transcript = session::handle_turn(&responder, &question).await;
            if let Some(reply) = transcript.messages.last() {
                println!("{}", reply.text);
            }
        }
        Command::Dashboard { out } => {
            let cards = Dashboard::new(equities, crypto).cards().await;
            tracing::info!(charts = cards.len(), "dashboard built");

            let html = match views::render_dashboard(&cards) {
                Ok(html) => html,
                Err(err) => {
                    sentry_anyhow::capture_anyhow(&err);
                    return Err(err);
                }
            };

            match out {
                Some(path) => std::fs::write(&path, html)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{html}"),
            }
        }
    }

    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
