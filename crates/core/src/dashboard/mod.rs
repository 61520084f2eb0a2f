pub mod chart;

use crate::domain::instrument::Instrument;
use crate::domain::price::PriceHistory;
use crate::market::MarketDataClient;
use std::sync::Arc;

pub const HISTORY_DAYS: u32 = 30;

const WATCHLIST_EQUITIES: [&str; 3] = ["AAPL", "TSLA", "MSFT"];
const WATCHLIST_CRYPTO: [&str; 3] = ["bitcoin", "ethereum", "dogecoin"];

/// Equities first, then crypto; charts appear in this order.
pub fn default_watchlist() -> Vec<Instrument> {
    WATCHLIST_EQUITIES
        .iter()
        .map(|s| Instrument::equity(s))
        .chain(WATCHLIST_CRYPTO.iter().map(|c| Instrument::crypto(c)))
        .collect()
}

/// Data behind one chart, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub instrument: Instrument,
    pub title: String,
    pub history: PriceHistory,
}

impl ChartSeries {
    pub fn new(instrument: Instrument, history: PriceHistory) -> Self {
        let title = format!("{} {}-Day Prices", instrument.label(), HISTORY_DAYS);
        Self {
            instrument,
            title,
            history,
        }
    }
}

/// A rendered chart ready to be embedded in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardCard {
    pub title: String,
    pub svg: String,
}

#[derive(Clone)]
pub struct Dashboard {
    equities: Arc<dyn MarketDataClient>,
    crypto: Arc<dyn MarketDataClient>,
    watchlist: Vec<Instrument>,
}

impl Dashboard {
    pub fn new(equities: Arc<dyn MarketDataClient>, crypto: Arc<dyn MarketDataClient>) -> Self {
        Self::with_watchlist(equities, crypto, default_watchlist())
    }

    pub fn with_watchlist(
        equities: Arc<dyn MarketDataClient>,
        crypto: Arc<dyn MarketDataClient>,
        watchlist: Vec<Instrument>,
    ) -> Self {
        Self {
            equities,
            crypto,
            watchlist,
        }
    }

    /// Fetches every watchlist instrument in turn. Instruments without data are left out.
    pub async fn collect_series(&self) -> Vec<ChartSeries> {
        let mut out = Vec::with_capacity(self.watchlist.len());
        for instrument in &self.watchlist {
            let client = if instrument.is_equity() {
                &self.equities
            } else {
                &self.crypto
            };

            match client.get_history(instrument.identifier(), HISTORY_DAYS).await {
                Ok(history) if !history.is_empty() => {
                    out.push(ChartSeries::new(instrument.clone(), history));
                }
                Ok(_) => {
                    tracing::info!(instrument = %instrument, "empty history; skipping chart");
                }
                Err(err) => {
                    tracing::warn!(
                        provider = client.provider_name(),
                        instrument = %instrument,
                        error = %err,
                        "dashboard history unavailable; skipping chart"
                    );
                }
            }
        }
        out
    }

    pub async fn cards(&self) -> Vec<DashboardCard> {
        render_cards(&self.collect_series().await)
    }
}

/// Draws each series; a chart that fails to draw is dropped like a missing one.
pub fn render_cards(series: &[ChartSeries]) -> Vec<DashboardCard> {
    series
        .iter()
        .filter_map(|s| {
            match chart::render_line_chart_svg(s, (chart::CHART_WIDTH, chart::CHART_HEIGHT)) {
                Ok(svg) => Some(DashboardCard {
                    title: s.title.clone(),
                    svg,
                }),
                Err(err) => {
                    tracing::warn!(title = %s.title, error = %err, "chart render failed; skipping");
                    None
                }
            }
        })
        .collect()
}
