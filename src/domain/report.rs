//! Plain-text summaries: console output and notification payloads.

use std::fmt::Write as _;

use super::backtest::{BacktestResult, SignalKind};
use super::metrics::Metrics;
use super::ohlcv::OhlcvBar;
use super::state::TradeEvent;

/// Full replay report: one line per closed trade, then aggregate
/// statistics. This string is also the notification payload contract.
pub fn backtest_summary(result: &BacktestResult, account_value: f64) -> String {
    let mut out = String::new();

    for trade in &result.state.history {
        let _ = writeln!(out, "{trade}");
    }
    if result.state.history.is_empty() {
        out.push_str("No trades taken.\n");
    }

    let metrics = Metrics::compute(&result.state.history);
    let windows_started = count_signals(result, SignalKind::WindowStart);
    let windows_ended = count_signals(result, SignalKind::WindowEnd);

    let _ = writeln!(
        out,
        "\nTrades: {} ({} won, {} lost, {:.1}% win rate)",
        metrics.total_trades,
        metrics.trades_won,
        metrics.trades_lost,
        metrics.win_rate * 100.0,
    );
    let _ = writeln!(out, "Total PnL: {:+.2}", metrics.total_pnl);
    let _ = writeln!(
        out,
        "Windows: {} started, {} ended",
        windows_started, windows_ended,
    );
    let _ = writeln!(
        out,
        "Final balance: {:.2} (started {:.2})",
        result.final_balance, account_value,
    );

    out
}

/// Daily runner message: the latest completed bar plus the action taken.
pub fn daily_summary(symbol: &str, bar: &OhlcvBar, event: Option<&TradeEvent>) -> String {
    let action = match event {
        Some(TradeEvent::Opened {
            price,
            size,
            stop_loss,
            ..
        }) => format!("opened {size:.2}/pt at {price:.1} (stop {stop_loss:.1})"),
        Some(TradeEvent::Closed { price, pnl, .. }) => {
            format!("closed at {price:.1} (pnl {pnl:+.2})")
        }
        None => "no change".to_string(),
    };

    format!(
        "{symbol} daily summary ({date})\n\
         Open : {open:.1}\n\
         High : {high:.1}\n\
         Low  : {low:.1}\n\
         Close: {close:.1}\n\
         Action: {action}",
        date = bar.date,
        open = bar.open,
        high = bar.high,
        low = bar.low,
        close = bar.close,
    )
}

fn count_signals(result: &BacktestResult, kind: SignalKind) -> usize {
    result.signals.iter().filter(|s| s.kind == kind).count()
}
