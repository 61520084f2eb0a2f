pub mod coingecko;
pub mod error;
pub mod yahoo;

use crate::domain::price::{PriceHistory, PriceQuote};
use error::MarketDataError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// A source of current prices and daily closing history for one asset class.
#[async_trait::async_trait]
pub trait MarketDataClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn get_quote(&self, identifier: &str) -> Result<PriceQuote, MarketDataError>;

    async fn get_history(
        &self,
        identifier: &str,
        days: u32,
    ) -> Result<PriceHistory, MarketDataError>;
}

/// Sends `req` and decodes a JSON body. A 404 means the provider has no such instrument.
pub(crate) async fn fetch_json<T>(req: reqwest::RequestBuilder) -> Result<T, MarketDataError>
where
    T: DeserializeOwned,
{
    let res = req
        .send()
        .await
        .map_err(|e| MarketDataError::transport(format!("request failed: {e}")))?;

    let status = res.status();
    if status == StatusCode::NOT_FOUND {
        return Err(MarketDataError::Unavailable);
    }

    let text = res
        .text()
        .await
        .map_err(|e| MarketDataError::transport(format!("failed to read response: {e}")))?;

    if !status.is_success() {
        return Err(MarketDataError::transport(format!("HTTP {status}: {text}")));
    }

    serde_json::from_str::<T>(&text)
        .map_err(|e| MarketDataError::transport(format!("unexpected response shape: {e}")))
}
