//! CoinGecko client for USD spot prices and market-chart history.
//!
//! Endpoints used:
//! - `/simple/price` for the current price
//! - `/coins/{id}/market_chart` for historical prices

use crate::config::Settings;
use crate::domain::price::{PriceHistory, PricePoint, PriceQuote};
use crate::market::error::MarketDataError;
use crate::market::{fetch_json, MarketDataClient};
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const VS_CURRENCY: &str = "usd";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            headers.insert(
                API_KEY_HEADER,
                HeaderValue::from_str(key).context("COINGECKO_API_KEY is not a valid header value")?,
            );
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("failed to build coingecko http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.coingecko_base_url,
            settings.coingecko_api_key.as_deref(),
            settings.http_timeout,
        )
    }
}

/// `{"bitcoin": {"usd": 67000.0}}`
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[unix_millis, price]` pairs.
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

#[async_trait::async_trait]
impl MarketDataClient for CoinGeckoClient {
    fn provider_name(&self) -> &'static str {
        "coingecko"
    }

    #[instrument(name = "CoinGeckoPriceFetch", skip(self))]
    async fn get_quote(&self, identifier: &str) -> Result<PriceQuote, MarketDataError> {
        let url = format!("{}/simple/price", self.base_url);
        debug!(%url, "requesting simple price");

        let req = self
            .http
            .get(&url)
            .query(&[("ids", identifier), ("vs_currencies", VS_CURRENCY)]);
        let resp: SimplePriceResponse = fetch_json(req).await?;

        let price = resp
            .get(identifier)
            .and_then(|prices| prices.get(VS_CURRENCY))
            .copied()
            .ok_or(MarketDataError::Unavailable)?;

        Ok(PriceQuote {
            identifier: identifier.to_string(),
            price,
        })
    }

    #[instrument(name = "CoinGeckoChartFetch", skip(self))]
    async fn get_history(
        &self,
        identifier: &str,
        days: u32,
    ) -> Result<PriceHistory, MarketDataError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, identifier);
        debug!(%url, "requesting market chart");

        let days = days.to_string();
        let req = self
            .http
            .get(&url)
            .query(&[("vs_currency", VS_CURRENCY), ("days", days.as_str())]);
        let resp: MarketChartResponse = fetch_json(req).await?;

        let points: Vec<PricePoint> = resp
            .prices
            .into_iter()
            .filter_map(|(millis, close)| {
                let timestamp = Utc.timestamp_millis_opt(millis as i64).single()?;
                Some(PricePoint { timestamp, close })
            })
            .collect();

        if points.is_empty() {
            return Err(MarketDataError::Unavailable);
        }
        Ok(PriceHistory::new(points))
    }
}
