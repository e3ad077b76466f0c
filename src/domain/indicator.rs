//! Rolling indicators over bar sequences.
//!
//! EMA recurrence: EMA[t] = EMA[t-1] + k * (close[t] - EMA[t-1]) with
//! k = 2/(period+1), seeded EMA[0] = close[0]. Every bar therefore has a
//! defined value; callers gate on bar count, not per-point validity.

use crate::domain::ohlcv::OhlcvBar;

pub fn ema(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    if period == 0 || bars.is_empty() {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(bars.len());
    let mut prev = bars[0].close;
    values.push(prev);

    for bar in &bars[1..] {
        prev += k * (bar.close - prev);
        values.push(prev);
    }

    values
}

/// Mean bar range (high - low) over the last `window` bars.
/// None when the sequence is shorter than the window.
pub fn average_range(bars: &[OhlcvBar], window: usize) -> Option<f64> {
    if window == 0 || bars.len() < window {
        return None;
    }
    let sum: f64 = bars[bars.len() - window..].iter().map(|b| b.range()).sum();
    Some(sum / window as f64)
}
