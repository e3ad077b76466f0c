#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use trendgate::domain::error::TrendgateError;
pub use trendgate::domain::ohlcv::{OhlcvBar, Timeframe};
use trendgate::domain::series::{BarSeries, EmaPeriods};
use trendgate::domain::state::StrategyState;
use trendgate::domain::strategy::{BacktestParams, StrategyParams};
use trendgate::ports::data_port::BarSourcePort;
use trendgate::ports::notify_port::NotifyPort;
use trendgate::ports::state_port::StatePort;

pub struct MockBarSource {
    pub data: HashMap<Timeframe, Vec<OhlcvBar>>,
    pub error: Option<String>,
}

impl MockBarSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, timeframe: Timeframe, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(timeframe, bars);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl BarSourcePort for MockBarSource {
    fn fetch_bars(
        &self,
        _symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<OhlcvBar>, TrendgateError> {
        if let Some(reason) = &self.error {
            return Err(TrendgateError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(&timeframe).cloned().unwrap_or_default())
    }

    fn data_range(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendgateError> {
        let bars = self.fetch_bars(symbol, timeframe)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}

/// Notifier that records messages, or fails on demand.
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl NotifyPort for RecordingNotifier {
    fn send(&self, message: &str) -> Result<(), TrendgateError> {
        if self.fail {
            return Err(TrendgateError::Notify {
                reason: "channel unavailable".into(),
            });
        }
        self.sent.borrow_mut().push(message.to_string());
        Ok(())
    }
}

/// In-memory state port for driver tests.
pub struct MemoryStatePort {
    pub stored: RefCell<Option<StrategyState>>,
}

impl MemoryStatePort {
    pub fn new() -> Self {
        Self {
            stored: RefCell::new(None),
        }
    }
}

impl StatePort for MemoryStatePort {
    fn load(&self) -> Result<StrategyState, TrendgateError> {
        Ok(self.stored.borrow().clone().unwrap_or_default())
    }

    fn save(&self, state: &StrategyState) -> Result<(), TrendgateError> {
        *self.stored.borrow_mut() = Some(state.clone());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn start_date() -> NaiveDate {
    date(2024, 1, 1)
}

pub fn make_bar(date: NaiveDate, close: f64) -> OhlcvBar {
    OhlcvBar {
        date,
        open: close,
        high: close + 2.0,
        low: close - 2.0,
        close,
    }
}

/// Daily-spaced bars from a list of closes (range 4 points each).
pub fn daily_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(start_date() + Duration::days(i as i64), c))
        .collect()
}

/// Weekly-spaced bars from a list of closes.
pub fn weekly_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(start_date() + Duration::days(i as i64 * 7), c))
        .collect()
}

/// Short EMA periods so fixtures stay small.
pub fn test_periods() -> EmaPeriods {
    EmaPeriods {
        short: 2,
        medium: 3,
        long: 4,
    }
}

pub fn make_series(bars: Vec<OhlcvBar>) -> BarSeries {
    BarSeries::from_bars(bars, test_periods()).unwrap()
}

pub fn make_strategy() -> StrategyParams {
    StrategyParams {
        symbol: "US100".into(),
        ema_periods: test_periods(),
        consecutive_bars: 2,
        big_move_threshold: 1_000.0,
        stop_buffer: 5.0,
    }
}

pub fn make_params() -> BacktestParams {
    BacktestParams {
        account_value: 10_000.0,
        max_risk_percent: 0.02,
        volatility_window: 2,
        stop_multiplier: 2.0,
    }
}

/// A rising close sequence long enough to clear the warm-up and the
/// three-weekly-bar minimum for the consecutive check.
pub fn rising_closes(count: usize) -> Vec<f64> {
    (0..count).map(|i| 100.0 + i as f64 * 2.0).collect()
}
