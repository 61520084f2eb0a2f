use crate::analysis::trend::{self, TrendWindows};
use crate::chat::intent::{parse_intent, Intent};
use crate::domain::instrument::Instrument;
use crate::market::error::MarketDataError;
use crate::market::MarketDataClient;
use std::sync::Arc;

/// Days of history fetched for a trend reading.
pub const TREND_LOOKBACK_DAYS: u32 = 10;

const STOCK_NOT_AVAILABLE: &str = "Stock data not available.";
const STOCK_PRICE_ERROR: &str = "Error fetching stock data.";
const STOCK_TREND_NO_DATA: &str = "No data to analyze.";
const STOCK_TREND_ERROR: &str = "Error analyzing trend.";
const CRYPTO_PRICE_ERROR: &str = "Error fetching crypto price.";
const CRYPTO_TREND_ERROR: &str = "Error analyzing crypto trend.";

/// Turns one case-folded question into one bot reply.
///
/// Every market failure is logged and collapsed into a fixed sentence; nothing here returns
/// an error.
#[derive(Clone)]
pub struct Responder {
    equities: Arc<dyn MarketDataClient>,
    crypto: Arc<dyn MarketDataClient>,
    windows: TrendWindows,
}

impl Responder {
    pub fn new(
        equities: Arc<dyn MarketDataClient>,
        crypto: Arc<dyn MarketDataClient>,
        windows: TrendWindows,
    ) -> Self {
        Self {
            equities,
            crypto,
            windows,
        }
    }

    pub async fn reply(&self, text: &str) -> String {
        match parse_intent(text) {
            Intent::Quote(instrument) => self.quote_reply(&instrument).await,
            Intent::Trend(instrument) => self.trend_reply(&instrument).await,
            Intent::Fallback => format!("Got your question: '{text}'. Soon more insights!"),
        }
    }

    fn client_for(&self, instrument: &Instrument) -> &dyn MarketDataClient {
        if instrument.is_equity() {
            self.equities.as_ref()
        } else {
            self.crypto.as_ref()
        }
    }

    async fn quote_reply(&self, instrument: &Instrument) -> String {
        let client = self.client_for(instrument);
        match client.get_quote(instrument.identifier()).await {
            Ok(quote) if instrument.is_equity() => {
                format!("{} stock is at ${:.2}", instrument.label(), quote.price)
            }
            Ok(quote) => format!("{} is at ${}", instrument.label(), quote.price),
            Err(err) => {
                log_failure(client, instrument, "quote", &err);
                let reply = match (instrument.is_equity(), &err) {
                    (true, MarketDataError::Unavailable) => STOCK_NOT_AVAILABLE,
                    (true, MarketDataError::Transport(_)) => STOCK_PRICE_ERROR,
                    (false, _) => CRYPTO_PRICE_ERROR,
                };
                reply.to_string()
            }
        }
    }

    async fn trend_reply(&self, instrument: &Instrument) -> String {
        let client = self.client_for(instrument);
        let history = match client
            .get_history(instrument.identifier(), TREND_LOOKBACK_DAYS)
            .await
        {
            Ok(history) => history,
            Err(err) => {
                log_failure(client, instrument, "history", &err);
                return match (instrument.is_equity(), &err) {
                    (true, MarketDataError::Unavailable) => STOCK_TREND_NO_DATA,
                    (true, MarketDataError::Transport(_)) => STOCK_TREND_ERROR,
                    (false, _) => CRYPTO_TREND_ERROR,
                }
                .to_string();
            }
        };

        match trend::analyze(&history, self.windows) {
            Ok(reading) => {
                tracing::debug!(
                    instrument = %instrument,
                    short_average = reading.short_average,
                    long_average = reading.long_average,
                    verdict = reading.verdict.as_str(),
                    "trend computed"
                );
                format!("{}: {}", instrument.label(), reading.verdict)
            }
            Err(insufficient) => {
                tracing::info!(instrument = %instrument, %insufficient, "not enough history for trend");
                format!("{}: insufficient data", instrument.label())
            }
        }
    }
}

fn log_failure(
    client: &dyn MarketDataClient,
    instrument: &Instrument,
    operation: &'static str,
    err: &MarketDataError,
) {
    tracing::warn!(
        provider = client.provider_name(),
        instrument = %instrument,
        operation,
        error = %err,
        "market data call failed"
    );
}
