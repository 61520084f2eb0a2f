use crate::config::Settings;
use crate::domain::price::{PriceHistory, PricePoint, PriceQuote};
use crate::market::error::MarketDataError;
use crate::market::{fetch_json, MarketDataClient};
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = "algobuddy/0.1";

/// Equities client for the Yahoo Finance chart API.
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("failed to build yahoo http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.yahoo_base_url, settings.http_timeout)
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }

    #[instrument(name = "YahooChartFetch", skip(self))]
    async fn fetch_chart(&self, symbol: &str, range: &str) -> Result<ChartItem, MarketDataError> {
        let url = self.chart_url(symbol);
        debug!(%url, "requesting chart");

        let req = self
            .http
            .get(&url)
            .query(&[("interval", "1d"), ("range", range)]);
        let resp: ChartResponse = fetch_json(req).await?;

        resp.chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or(MarketDataError::Unavailable)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartItem>>,
}

#[derive(Debug, Deserialize)]
struct ChartItem {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBars>,
}

#[derive(Debug, Deserialize)]
struct QuoteBars {
    close: Option<Vec<Option<f64>>>,
}

impl ChartItem {
    /// Daily bars with a close. Yahoo pads halted sessions with nulls.
    fn history(&self) -> PriceHistory {
        let closes = self
            .indicators
            .as_ref()
            .and_then(|inds| inds.quote.first())
            .and_then(|q| q.close.as_deref())
            .unwrap_or_default();
        let timestamps = self.timestamp.as_deref().unwrap_or_default();

        let points = timestamps
            .iter()
            .zip(closes)
            .filter_map(|(ts, close)| {
                let close = (*close)?;
                let timestamp = Utc.timestamp_opt(*ts, 0).single()?;
                Some(PricePoint { timestamp, close })
            })
            .collect();

        PriceHistory::new(points)
    }
}

#[async_trait::async_trait]
impl MarketDataClient for YahooFinanceClient {
    fn provider_name(&self) -> &'static str {
        "yahoo_finance"
    }

    async fn get_quote(&self, identifier: &str) -> Result<PriceQuote, MarketDataError> {
        let item = self.fetch_chart(identifier, "1d").await?;

        let price = item
            .history()
            .points()
            .last()
            .map(|p| p.close)
            .or(item.meta.regular_market_price)
            .ok_or(MarketDataError::Unavailable)?;

        Ok(PriceQuote {
            identifier: identifier.to_string(),
            price,
        })
    }

    async fn get_history(
        &self,
        identifier: &str,
        days: u32,
    ) -> Result<PriceHistory, MarketDataError> {
        let range = format!("{days}d");
        let history = self.fetch_chart(identifier, &range).await?.history();
        if history.is_empty() {
            return Err(MarketDataError::Unavailable);
        }
        Ok(history)
    }
}
