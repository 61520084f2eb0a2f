use crate::domain::price::PriceHistory;
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SHORT_WINDOW: usize = 5;
pub const DEFAULT_LONG_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendVerdict {
    Upward,
    Downward,
    Neutral,
}

impl TrendVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendVerdict::Upward => "upward",
            TrendVerdict::Downward => "downward",
            TrendVerdict::Neutral => "neutral",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            TrendVerdict::Upward => "📈",
            TrendVerdict::Downward => "📉",
            TrendVerdict::Neutral => "➖",
        }
    }
}

impl fmt::Display for TrendVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_str(), self.emoji())
    }
}

/// Moving-average window sizes. Always `0 < short <= long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindows {
    pub short: usize,
    pub long: usize,
}

impl TrendWindows {
    pub fn new(short: usize, long: usize) -> anyhow::Result<Self> {
        ensure!(short > 0, "short trend window must be positive");
        ensure!(
            short <= long,
            "short trend window ({short}) must not exceed long window ({long})"
        );
        Ok(Self { short, long })
    }
}

impl Default for TrendWindows {
    fn default() -> Self {
        Self {
            short: DEFAULT_SHORT_WINDOW,
            long: DEFAULT_LONG_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientData {
    pub required: usize,
    pub available: usize,
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "insufficient data: need {} closes, have {}",
            self.required, self.available
        )
    }
}

impl std::error::Error for InsufficientData {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendReading {
    pub short_average: f64,
    pub long_average: f64,
    pub verdict: TrendVerdict,
}

/// Mean of the last `window` values, or `None` if there are fewer than `window`.
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

pub fn classify(short_average: f64, long_average: f64) -> TrendVerdict {
    if short_average > long_average {
        TrendVerdict::Upward
    } else if short_average < long_average {
        TrendVerdict::Downward
    } else {
        TrendVerdict::Neutral
    }
}

pub fn analyze(history: &PriceHistory, windows: TrendWindows) -> Result<TrendReading, InsufficientData> {
    let closes: Vec<f64> = history.closes().collect();
    let insufficient = InsufficientData {
        required: windows.long,
        available: closes.len(),
    };

    let long_average = trailing_mean(&closes, windows.long).ok_or(insufficient)?;
    let short_average = trailing_mean(&closes, windows.short).ok_or(insufficient)?;

    Ok(TrendReading {
        short_average,
        long_average,
        verdict: classify(short_average, long_average),
    })
}
