use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use algobuddy_core::chat::responder::Responder;
use algobuddy_core::chat::session::{self, ChatTranscript};
use algobuddy_core::config::Settings;
use algobuddy_core::dashboard::Dashboard;
use algobuddy_core::market::MarketDataClient;
use algobuddy_core::views;

#[derive(Clone)]
pub struct AppState {
    responder: Responder,
    dashboard: Dashboard,
}

impl AppState {
    pub fn new(
        equities: Arc<dyn MarketDataClient>,
        crypto: Arc<dyn MarketDataClient>,
        settings: &Settings,
    ) -> Self {
        Self {
            responder: Responder::new(equities.clone(), crypto.clone(), settings.trend_windows),
            dashboard: Dashboard::new(equities, crypto),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    user_input: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(chat_page).post(chat_submit))
        .route("/dashboard", get(dashboard))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn chat_page() -> Result<Html<String>, StatusCode> {
    views::render_chat_page(&ChatTranscript::empty())
        .map(Html)
        .map_err(render_failed)
}

async fn chat_submit(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<Html<String>, StatusCode> {
    let transcript = session::handle_turn(&state.responder, &form.user_input).await;
    views::render_chat_page(&transcript)
        .map(Html)
        .map_err(render_failed)
}

async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let cards = state.dashboard.cards().await;
    tracing::info!(charts = cards.len(), "dashboard rendered");
    views::render_dashboard(&cards)
        .map(Html)
        .map_err(render_failed)
}

fn render_failed(err: anyhow::Error) -> StatusCode {
    sentry_anyhow::capture_anyhow(&err);
    tracing::error!(error = %err, "page render failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use algobuddy_core::domain::price::{PriceHistory, PricePoint, PriceQuote};
    use algobuddy_core::market::error::MarketDataError;
    use std::time::{Duration, UNIX_EPOCH};

    /// Serves a fixed quote and a rising ten-day history for every identifier.
    struct FixedClient {
        price: f64,
    }

    #[async_trait::async_trait]
    impl MarketDataClient for FixedClient {
        fn provider_name(&self) -> &'static str {
            "fixed"
        }

        async fn get_quote(&self, identifier: &str) -> Result<PriceQuote, MarketDataError> {
            Ok(PriceQuote {
                identifier: identifier.to_string(),
                price: self.price,
            })
        }

        async fn get_history(
            &self,
            _identifier: &str,
            days: u32,
        ) -> Result<PriceHistory, MarketDataError> {
            let start = UNIX_EPOCH + Duration::from_secs(1_767_225_600);
            Ok(PriceHistory::new(
                (0..days)
                    .map(|i| PricePoint {
                        timestamp: (start + Duration::from_secs(86_400 * u64::from(i))).into(),
                        close: self.price + f64::from(i),
                    })
                    .collect(),
            ))
        }
    }

    struct DownClient;

    #[async_trait::async_trait]
    impl MarketDataClient for DownClient {
        fn provider_name(&self) -> &'static str {
            "down"
        }

        async fn get_quote(&self, _identifier: &str) -> Result<PriceQuote, MarketDataError> {
            Err(MarketDataError::transport("connection refused"))
        }

        async fn get_history(
            &self,
            _identifier: &str,
            _days: u32,
        ) -> Result<PriceHistory, MarketDataError> {
            Err(MarketDataError::transport("connection refused"))
        }
    }

    fn settings() -> Settings {
        Settings::from_lookup(|_| None).unwrap()
    }

    fn state_with(equities: Arc<dyn MarketDataClient>, crypto: Arc<dyn MarketDataClient>) -> AppState {
        AppState::new(equities, crypto, &settings())
    }

    async fn submit(state: AppState, input: &str) -> String {
        let Html(body) = chat_submit(
            State(state),
            Form(ChatForm {
                user_input: input.to_string(),
            }),
        )
        .await
        .unwrap();
        body
    }

    #[tokio::test]
    async fn get_renders_empty_chat() {
        let Html(body) = chat_page().await.unwrap();
        assert!(body.contains("R_AlgoBuddy"));
        assert!(!body.contains(r#"class="message"#));
    }

    #[tokio::test]
    async fn post_price_question() {
        let state = state_with(Arc::new(FixedClient { price: 189.5 }), Arc::new(DownClient));
        let body = submit(state, "What's the price of AAPL").await;
        assert!(body.contains(r#"<div class="message user">what&#x27;s the price of aapl</div>"#));
        assert!(body.contains(r#"<div class="message bot">AAPL stock is at $189.50</div>"#));
    }

    #[tokio::test]
    async fn post_crypto_trend_question() {
        let state = state_with(Arc::new(DownClient), Arc::new(FixedClient { price: 10.0 }));
        let body = submit(state, "bitcoin trend please").await;
        assert!(body.contains("Bitcoin: upward 📈"));
    }

    #[tokio::test]
    async fn upstream_failure_is_still_a_page() {
        let state = state_with(Arc::new(DownClient), Arc::new(DownClient));
        assert!(submit(state.clone(), "tsla price").await.contains("Error fetching stock data."));
        assert!(submit(state, "ethereum trend").await.contains("Error analyzing crypto trend."));
    }

    #[tokio::test]
    async fn fallback_reply() {
        let state = state_with(Arc::new(DownClient), Arc::new(DownClient));
        let body = submit(state, "hello there").await;
        assert!(body.contains("Got your question: &#x27;hello there&#x27;. Soon more insights!"));
    }

    #[tokio::test]
    async fn dashboard_with_no_data_has_no_charts() {
        let state = state_with(Arc::new(DownClient), Arc::new(DownClient));
        let Html(first) = dashboard(State(state.clone())).await.unwrap();
        let Html(second) = dashboard(State(state)).await.unwrap();

        assert!(first.contains("R_AlgoBuddy Dashboard"));
        assert!(first.contains("Back to Chat"));
        assert!(!first.contains("<svg"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn dashboard_renders_one_chart_per_instrument() {
        let state = state_with(
            Arc::new(FixedClient { price: 100.0 }),
            Arc::new(FixedClient { price: 2.0 }),
        );
        let Html(body) = dashboard(State(state)).await.unwrap();
        assert_eq!(body.matches(r#"<div class="dashboard-card""#).count(), 6);
        for title in ["AAPL", "TSLA", "MSFT", "Bitcoin", "Ethereum", "Dogecoin"] {
            assert!(body.contains(&format!("{title} 30-Day Prices")), "missing {title}");
        }
    }
}
