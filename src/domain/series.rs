//! Bar series with precomputed EMA columns and prefix snapshot views.

use chrono::NaiveDate;

use super::error::TrendgateError;
use super::indicator;
use super::ohlcv::OhlcvBar;

/// EMA periods used throughout the strategy: short for the weekly trend
/// filter, medium for entries/exits, long for the protective stop anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmaPeriods {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl Default for EmaPeriods {
    fn default() -> Self {
        EmaPeriods {
            short: 8,
            medium: 50,
            long: 100,
        }
    }
}

/// Selects one of the three EMA columns of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmaKind {
    Short,
    Medium,
    Long,
}

/// Ordered bars for one timeframe plus their EMA columns.
#[derive(Debug, Clone)]
pub struct BarSeries {
    bars: Vec<OhlcvBar>,
    ema_short: Vec<f64>,
    ema_medium: Vec<f64>,
    ema_long: Vec<f64>,
}

impl BarSeries {
    /// Build a series from bars in strictly ascending date order.
    /// Rejects unsorted or duplicate dates and zero EMA periods.
    pub fn from_bars(bars: Vec<OhlcvBar>, periods: EmaPeriods) -> Result<Self, TrendgateError> {
        if periods.short == 0 || periods.medium == 0 || periods.long == 0 {
            return Err(TrendgateError::Data {
                reason: "EMA periods must be at least 1".into(),
            });
        }
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(TrendgateError::Data {
                    reason: format!("bars out of order or duplicated at {}", pair[1].date),
                });
            }
        }

        let ema_short = indicator::ema(&bars, periods.short);
        let ema_medium = indicator::ema(&bars, periods.medium);
        let ema_long = indicator::ema(&bars, periods.long);

        Ok(BarSeries {
            bars,
            ema_short,
            ema_medium,
            ema_long,
        })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    /// View of the first `len` bars (clamped to the series length).
    pub fn snapshot(&self, len: usize) -> SeriesSnapshot<'_> {
        let len = len.min(self.bars.len());
        SeriesSnapshot {
            bars: &self.bars[..len],
            ema_short: &self.ema_short[..len],
            ema_medium: &self.ema_medium[..len],
            ema_long: &self.ema_long[..len],
        }
    }

    pub fn full(&self) -> SeriesSnapshot<'_> {
        self.snapshot(self.bars.len())
    }

    /// Number of bars dated on or before `date`.
    pub fn bars_through(&self, date: NaiveDate) -> usize {
        self.bars.partition_point(|b| b.date <= date)
    }
}

/// Borrowed prefix of a [`BarSeries`]. Every bar in a snapshot is a
/// completed close; callers must not append a still-forming bar before
/// handing the snapshot to the decision engine.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSnapshot<'a> {
    bars: &'a [OhlcvBar],
    ema_short: &'a [f64],
    ema_medium: &'a [f64],
    ema_long: &'a [f64],
}

impl SeriesSnapshot<'_> {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        self.bars
    }

    pub fn latest(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn ema(&self, kind: EmaKind) -> &[f64] {
        match kind {
            EmaKind::Short => self.ema_short,
            EmaKind::Medium => self.ema_medium,
            EmaKind::Long => self.ema_long,
        }
    }

    pub fn latest_ema(&self, kind: EmaKind) -> Option<f64> {
        self.ema(kind).last().copied()
    }

    /// True when the `count` most recent closes are all strictly above
    /// their EMA, inclusive of the snapshot's latest bar. False when the
    /// snapshot holds fewer than `count` bars or `count` is zero.
    pub fn closes_above(&self, kind: EmaKind, count: usize) -> bool {
        self.check_consecutive(kind, count, |close, ema| close > ema)
    }

    /// Mirror of [`closes_above`](Self::closes_above) for closes below.
    pub fn closes_below(&self, kind: EmaKind, count: usize) -> bool {
        self.check_consecutive(kind, count, |close, ema| close < ema)
    }

    fn check_consecutive(&self, kind: EmaKind, count: usize, cmp: fn(f64, f64) -> bool) -> bool {
        if count == 0 || self.bars.len() < count {
            return false;
        }
        let start = self.bars.len() - count;
        let emas = self.ema(kind);
        self.bars[start..]
            .iter()
            .zip(&emas[start..])
            .all(|(bar, ema)| cmp(bar.close, *ema))
    }

    /// Rolling mean bar range over the last `window` bars.
    pub fn average_range(&self, window: usize) -> Option<f64> {
        indicator::average_range(self.bars, window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_periods() -> EmaPeriods {
        EmaPeriods {
            short: 2,
            medium: 3,
            long: 4,
        }
    }

    fn make_bar(day: u32, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 5.0,
            low: close - 5.0,
            close,
        }
    }

    fn rising_series() -> BarSeries {
        let bars = (1..=8).map(|i| make_bar(i, 100.0 + i as f64 * 10.0)).collect();
        BarSeries::from_bars(bars, test_periods()).unwrap()
    }

    #[test]
    fn rejects_unsorted_bars() {
        let bars = vec![make_bar(2, 100.0), make_bar(1, 101.0)];
        let err = BarSeries::from_bars(bars, test_periods()).unwrap_err();
        assert!(matches!(err, TrendgateError::Data { .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let bars = vec![make_bar(1, 100.0), make_bar(1, 101.0)];
        assert!(BarSeries::from_bars(bars, test_periods()).is_err());
    }

    #[test]
    fn rejects_zero_period() {
        let bars = vec![make_bar(1, 100.0)];
        let periods = EmaPeriods {
            short: 0,
            medium: 3,
            long: 4,
        };
        assert!(BarSeries::from_bars(bars, periods).is_err());
    }

    #[test]
    fn snapshot_is_a_prefix() {
        let series = rising_series();
        let snap = series.snapshot(3);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.latest_close(), Some(130.0));
        assert_eq!(snap.ema(EmaKind::Short).len(), 3);
    }

    #[test]
    fn snapshot_clamps_to_length() {
        let series = rising_series();
        assert_eq!(series.snapshot(100).len(), series.len());
    }

    #[test]
    fn empty_snapshot_has_no_latest() {
        let series = rising_series();
        let snap = series.snapshot(0);
        assert!(snap.is_empty());
        assert!(snap.latest_close().is_none());
        assert!(snap.latest_ema(EmaKind::Medium).is_none());
    }

    #[test]
    fn bars_through_counts_inclusive() {
        let series = rising_series();
        assert_eq!(series.bars_through(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()), 3);
        assert_eq!(series.bars_through(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()), 0);
        assert_eq!(series.bars_through(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()), 8);
    }

    #[test]
    fn closes_above_on_rising_series() {
        let series = rising_series();
        let snap = series.full();
        // EMAs lag a rising series, so recent closes sit above them
        assert!(snap.closes_above(EmaKind::Short, 2));
        assert!(snap.closes_above(EmaKind::Medium, 2));
        assert!(!snap.closes_below(EmaKind::Short, 2));
    }

    #[test]
    fn closes_below_on_falling_series() {
        let bars = (1..=8).map(|i| make_bar(i, 200.0 - i as f64 * 10.0)).collect();
        let series = BarSeries::from_bars(bars, test_periods()).unwrap();
        let snap = series.full();
        assert!(snap.closes_below(EmaKind::Short, 2));
        assert!(!snap.closes_above(EmaKind::Short, 2));
    }

    #[test]
    fn consecutive_check_needs_enough_bars() {
        let series = rising_series();
        let snap = series.snapshot(1);
        assert!(!snap.closes_above(EmaKind::Short, 2));
        assert!(!snap.closes_above(EmaKind::Short, 0));
    }

    #[test]
    fn consecutive_check_includes_latest_bar() {
        // rising closes, then one close pulled under its EMA: the run is broken
        let mut bars: Vec<OhlcvBar> = (1..=7).map(|i| make_bar(i, 100.0 + i as f64 * 10.0)).collect();
        bars.push(make_bar(8, 50.0));
        let series = BarSeries::from_bars(bars, test_periods()).unwrap();
        assert!(!series.full().closes_above(EmaKind::Short, 2));
        // but the two bars before the break still qualify
        assert!(series.snapshot(7).closes_above(EmaKind::Short, 2));
    }

    #[test]
    fn average_range_delegates_to_window() {
        let series = rising_series();
        let snap = series.full();
        // every fixture bar has range 10
        assert_eq!(snap.average_range(4), Some(10.0));
        assert_eq!(series.snapshot(2).average_range(4), None);
    }
}
