//! Decision engine: entry, exit, re-entry, and sizing rules.
//!
//! All functions are pure and total over their snapshots. A snapshot too
//! short for a check yields `false` (or `None`) rather than an error;
//! that is the normal warm-up boundary, not a failure.
//!
//! Consecutive checks use the N most recent bars of the snapshot,
//! inclusive of the latest one. Snapshots carry only completed closes.

use super::error::TrendgateError;
use super::series::{EmaKind, SeriesSnapshot};

/// Entry rule: weekly close above the weekly medium EMA, the last
/// `consecutive_bars` weekly closes above the weekly short EMA, and the
/// daily close above both the daily medium and long EMAs.
pub fn should_open(
    weekly: &SeriesSnapshot<'_>,
    daily: &SeriesSnapshot<'_>,
    consecutive_bars: usize,
) -> bool {
    let (Some(weekly_close), Some(weekly_ema)) =
        (weekly.latest_close(), weekly.latest_ema(EmaKind::Medium))
    else {
        return false;
    };
    let (Some(daily_close), Some(daily_medium), Some(daily_long)) = (
        daily.latest_close(),
        daily.latest_ema(EmaKind::Medium),
        daily.latest_ema(EmaKind::Long),
    ) else {
        return false;
    };

    let weekly_ok =
        weekly_close > weekly_ema && weekly.closes_above(EmaKind::Short, consecutive_bars);
    let daily_ok = daily_close > daily_medium && daily_close > daily_long;

    weekly_ok && daily_ok
}

/// Exit rule: daily close below the daily medium EMA.
pub fn should_close(daily: &SeriesSnapshot<'_>) -> bool {
    match (daily.latest_close(), daily.latest_ema(EmaKind::Medium)) {
        (Some(close), Some(ema)) => close < ema,
        _ => false,
    }
}

/// Hard protective stop level: daily long EMA minus a fixed buffer.
/// Independent of the close-based exit rule.
pub fn stop_loss(daily: &SeriesSnapshot<'_>, buffer: f64) -> Option<f64> {
    daily.latest_ema(EmaKind::Long).map(|ema| ema - buffer)
}

/// Naive sizing: currency-per-point exposure of the whole account.
/// Zero when the entry price is not positive.
pub fn position_size(account_value: f64, entry_price: f64) -> f64 {
    if entry_price <= 0.0 {
        0.0
    } else {
        account_value / entry_price
    }
}

/// Risk-based sizing: risk a fixed fraction of the account over the stop
/// distance. Fails when the stop sits exactly at the entry price.
pub fn risk_position_size(
    account_value: f64,
    max_risk_percent: f64,
    entry_price: f64,
    stop_loss: f64,
) -> Result<f64, TrendgateError> {
    let stop_distance = (entry_price - stop_loss).abs();
    if stop_distance == 0.0 {
        return Err(TrendgateError::InvalidInput {
            reason: "stop loss cannot equal entry price".into(),
        });
    }
    Ok(account_value * max_risk_percent / stop_distance)
}

/// Re-entry rule inside an active window: the last `consecutive_bars`
/// daily closes above the daily medium EMA, the weekly closes not all
/// below the weekly short EMA, and no big-move lockout latched.
pub fn can_reenter(
    weekly: &SeriesSnapshot<'_>,
    daily: &SeriesSnapshot<'_>,
    big_move_done: bool,
    consecutive_bars: usize,
) -> bool {
    if big_move_done {
        return false;
    }
    let daily_ok = daily.closes_above(EmaKind::Medium, consecutive_bars);
    let weekly_blocked = weekly.closes_below(EmaKind::Short, consecutive_bars);
    daily_ok && !weekly_blocked
}
