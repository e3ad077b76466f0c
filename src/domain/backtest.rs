//! Deterministic bar-by-bar replay of the strategy, and the single-step
//! live evaluation that shares its transition rules.

use chrono::NaiveDate;

use super::series::{BarSeries, EmaKind, SeriesSnapshot};
use super::signal;
use super::state::{StrategyState, TradeEvent};
use super::strategy::{BacktestParams, StrategyParams};

/// Emitted transition marker. Reporting only; decision logic never reads
/// the signal log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Entry,
    Exit,
    WindowStart,
    WindowEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub date: NaiveDate,
    pub kind: SignalKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub state: StrategyState,
    pub signals: Vec<Signal>,
    pub final_balance: f64,
}

/// Daily bars consumed before the first evaluation.
pub fn warmup_bars(strategy: &StrategyParams) -> usize {
    strategy.ema_periods.long.max(strategy.consecutive_bars)
}

/// Replay the strategy over historical bars in chronological order.
///
/// Same bars and parameters always produce the same trade history,
/// signal log, and final balance: there is no randomness, no wall clock,
/// and no ordering input beyond the bar sequence itself.
pub fn run_backtest(
    weekly: &BarSeries,
    daily: &BarSeries,
    strategy: &StrategyParams,
    params: &BacktestParams,
) -> BacktestResult {
    let mut state = StrategyState::default();
    let mut signals = Vec::new();
    let mut balance = params.account_value;

    for i in warmup_bars(strategy)..daily.len() {
        let daily_snap = daily.snapshot(i + 1);
        let weekly_snap = weekly.snapshot(weekly.bars_through(daily.bars()[i].date));
        step(
            &mut state,
            &mut balance,
            &mut signals,
            &weekly_snap,
            &daily_snap,
            strategy,
            params,
        );
    }

    BacktestResult {
        state,
        signals,
        final_balance: balance,
    }
}

/// One FLAT/IN_POSITION transition over the latest bar of `daily_snap`.
/// A bar that cannot be evaluated (undefined volatility, degenerate stop
/// distance) produces no signal rather than an error.
fn step(
    state: &mut StrategyState,
    balance: &mut f64,
    signals: &mut Vec<Signal>,
    weekly_snap: &SeriesSnapshot<'_>,
    daily_snap: &SeriesSnapshot<'_>,
    strategy: &StrategyParams,
    params: &BacktestParams,
) -> Option<TradeEvent> {
    let bar = daily_snap.latest()?;

    if !state.is_flat() {
        // hard stop is checked before the close-based exit rule
        let stopped = state.position.as_ref().is_some_and(|p| p.hit_stop(bar.low));
        if !stopped && !signal::should_close(daily_snap) {
            return None;
        }
        let event = state.close(bar.date, bar.close, strategy.big_move_threshold)?;
        if let TradeEvent::Closed { pnl, .. } = &event {
            *balance += *pnl;
        }
        signals.push(Signal {
            date: bar.date,
            kind: SignalKind::Exit,
        });
        return Some(event);
    }

    // a sustained weekly breakdown ends the re-entry window
    if state.window_active && weekly_snap.closes_below(EmaKind::Short, strategy.consecutive_bars) {
        state.end_window();
        signals.push(Signal {
            date: bar.date,
            kind: SignalKind::WindowEnd,
        });
    }

    if !signal::should_open(weekly_snap, daily_snap, strategy.consecutive_bars) {
        return None;
    }

    // a second entry inside an active window must also pass the re-entry rule
    let reentry = state.window_active && state.first_entry_price.is_some();
    if reentry
        && !signal::can_reenter(
            weekly_snap,
            daily_snap,
            state.big_move_done,
            strategy.consecutive_bars,
        )
    {
        return None;
    }

    // stop distance from recent weekly volatility
    let volatility = weekly_snap.average_range(params.volatility_window)?;
    let entry_price = bar.close;
    let stop = entry_price - volatility * params.stop_multiplier;
    let size =
        signal::risk_position_size(*balance, params.max_risk_percent, entry_price, stop).ok()?;

    if !state.window_active {
        state.reset_window();
        signals.push(Signal {
            date: bar.date,
            kind: SignalKind::WindowStart,
        });
    }

    let event = state.open(bar.date, entry_price, size, stop).ok()?;
    signals.push(Signal {
        date: bar.date,
        kind: SignalKind::Entry,
    });
    Some(event)
}

/// One live evaluation over the latest completed bar. Re-running on a
/// day already recorded in the state is a no-op, which makes a scheduled
/// once-per-day invocation idempotent.
///
/// Live entries anchor the protective stop on the slow daily EMA
/// (`signal::stop_loss`) instead of the replay's volatility stop.
pub fn evaluate_latest(
    weekly: &BarSeries,
    daily: &BarSeries,
    state: &mut StrategyState,
    strategy: &StrategyParams,
    params: &BacktestParams,
) -> Option<TradeEvent> {
    if daily.len() <= warmup_bars(strategy) {
        return None;
    }
    let bar = daily.bars().last()?;
    if already_recorded(state, bar.date) {
        return None;
    }

    let daily_snap = daily.full();
    let weekly_snap = weekly.snapshot(weekly.bars_through(bar.date));

    if !state.is_flat() {
        let stopped = state.position.as_ref().is_some_and(|p| p.hit_stop(bar.low));
        if stopped || signal::should_close(&daily_snap) {
            return state.close(bar.date, bar.close, strategy.big_move_threshold);
        }
        return None;
    }

    if state.window_active && weekly_snap.closes_below(EmaKind::Short, strategy.consecutive_bars) {
        state.end_window();
    }

    if !signal::should_open(&weekly_snap, &daily_snap, strategy.consecutive_bars) {
        return None;
    }
    let reentry = state.window_active && state.first_entry_price.is_some();
    if reentry
        && !signal::can_reenter(
            &weekly_snap,
            &daily_snap,
            state.big_move_done,
            strategy.consecutive_bars,
        )
    {
        return None;
    }

    let stop = signal::stop_loss(&daily_snap, strategy.stop_buffer)?;
    let size =
        signal::risk_position_size(params.account_value, params.max_risk_percent, bar.close, stop)
            .ok()?;

    if !state.window_active {
        state.reset_window();
    }
    state.open(bar.date, bar.close, size, stop).ok()
}

fn already_recorded(state: &StrategyState, date: NaiveDate) -> bool {
    state
        .position
        .as_ref()
        .is_some_and(|p| p.entry_date == date)
        || state.history.last().is_some_and(|t| t.exit_date == date)
}
