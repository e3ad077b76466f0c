//! Open position and closed trade records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single live position. Size is currency-per-point exposure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub size: f64,
    pub stop_loss: f64,
}

impl Position {
    /// True when the bar's low trades through the protective stop.
    pub fn hit_stop(&self, low: f64) -> bool {
        low <= self.stop_loss
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.size
    }

    /// Halve the exposure. Explicit partial-close hook; the backtest
    /// driver never invokes it.
    pub fn reduce(&mut self) {
        self.size /= 2.0;
    }
}

/// A completed round trip. Appended to history, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub size: f64,
    pub pnl: f64,
}

impl ClosedTrade {
    pub fn is_profitable(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn duration_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

impl std::fmt::Display for ClosedTrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} | entry {:.1} exit {:.1} | size {:.2}/pt | pnl {:+.2}",
            self.entry_date, self.exit_date, self.entry_price, self.exit_price, self.size, self.pnl
        )
    }
}
