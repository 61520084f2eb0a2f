use crate::domain::instrument::{Instrument, CRYPTO_VOCABULARY, EQUITY_VOCABULARY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Quote(Instrument),
    Trend(Instrument),
    Fallback,
}

/// Classifies already case-folded input.
///
/// Matching is plain substring containment: "price" beats "trend", equities are checked
/// before crypto, and within each list the first entry found wins.
pub fn parse_intent(text: &str) -> Intent {
    let instrument = if text.contains("price") || text.contains("trend") {
        detect_instrument(text)
    } else {
        None
    };

    match instrument {
        Some(instrument) if text.contains("price") => Intent::Quote(instrument),
        Some(instrument) => Intent::Trend(instrument),
        None => Intent::Fallback,
    }
}

pub fn detect_instrument(text: &str) -> Option<Instrument> {
    if let Some(symbol) = EQUITY_VOCABULARY.iter().find(|s| text.contains(*s)) {
        return Some(Instrument::equity(symbol));
    }
    CRYPTO_VOCABULARY
        .iter()
        .find(|c| text.contains(*c))
        .map(|coin| Instrument::crypto(coin))
}
