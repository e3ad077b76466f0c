//! OHLCV bar and timeframe primitives.

use chrono::NaiveDate;

/// Bar aggregation interval served by a bar source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Weekly,
    Daily,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Weekly => "weekly",
            Timeframe::Daily => "daily",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed price bar. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcvBar {
    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
