use std::fmt;

/// Why a market data call produced nothing usable.
///
/// The chat collapses both kinds into one user-facing message; the split exists so
/// callers can log transport detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    /// The provider answered but had no data for the instrument.
    Unavailable,
    /// Network failure, non-success status, or a payload we could not parse.
    Transport(String),
}

impl MarketDataError {
    pub fn transport(detail: impl Into<String>) -> Self {
        MarketDataError::Transport(detail.into())
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, MarketDataError::Unavailable)
    }
}

impl fmt::Display for MarketDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketDataError::Unavailable => f.write_str("market data unavailable"),
            MarketDataError::Transport(detail) => write!(f, "market data transport error: {detail}"),
        }
    }
}

impl std::error::Error for MarketDataError {}
