use std::fmt;

/// Equity tickers the chat understands, in match priority order.
pub const EQUITY_VOCABULARY: [&str; 4] = ["aapl", "amzn", "tsla", "goog"];

/// CoinGecko coin ids the chat understands, in match priority order.
pub const CRYPTO_VOCABULARY: [&str; 3] = ["bitcoin", "ethereum", "dogecoin"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instrument {
    /// Upper-case ticker symbol, e.g. `AAPL`.
    Equity(String),
    /// Lower-case coin id, e.g. `bitcoin`.
    Crypto(String),
}

impl Instrument {
    pub fn equity(symbol: &str) -> Self {
        Instrument::Equity(symbol.to_uppercase())
    }

    pub fn crypto(coin: &str) -> Self {
        Instrument::Crypto(coin.to_lowercase())
    }

    /// Identifier sent to the upstream provider.
    pub fn identifier(&self) -> &str {
        match self {
            Instrument::Equity(symbol) => symbol,
            Instrument::Crypto(coin) => coin,
        }
    }

    pub fn is_equity(&self) -> bool {
        matches!(self, Instrument::Equity(_))
    }

    /// Human-facing name: tickers as-is, coin ids capitalized.
    pub fn label(&self) -> String {
        match self {
            Instrument::Equity(symbol) => symbol.clone(),
            Instrument::Crypto(coin) => capitalize(coin),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
