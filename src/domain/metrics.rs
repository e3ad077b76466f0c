//! Trade-log statistics.

use super::position::ClosedTrade;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_trade_duration: f64,
}

impl Metrics {
    pub fn compute(trades: &[ClosedTrade]) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut total_pnl = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_duration_days = 0i64;

        for trade in trades {
            total_pnl += trade.pnl;
            if trade.pnl > 0.0 {
                trades_won += 1;
                if trade.pnl > largest_win {
                    largest_win = trade.pnl;
                }
            } else if trade.pnl < 0.0 {
                trades_lost += 1;
                if trade.pnl.abs() > largest_loss {
                    largest_loss = trade.pnl.abs();
                }
            }
            total_duration_days += trade.duration_days();
        }

        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };
        let avg_trade_duration = if total_trades > 0 {
            total_duration_days as f64 / total_trades as f64
        } else {
            0.0
        };

        Metrics {
            total_trades,
            trades_won,
            trades_lost,
            win_rate,
            total_pnl,
            largest_win,
            largest_loss,
            avg_trade_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn trade(entry_day: u32, exit_day: u32, pnl: f64) -> ClosedTrade {
        ClosedTrade {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, entry_day).unwrap(),
            entry_price: 15_000.0,
            exit_date: NaiveDate::from_ymd_opt(2024, 1, exit_day).unwrap(),
            exit_price: 15_000.0 + pnl,
            size: 1.0,
            pnl,
        }
    }

    #[test]
    fn empty_log_yields_zeroes() {
        let m = Metrics::compute(&[]);
        assert_eq!(m.total_trades, 0);
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.total_pnl, 0.0);
        assert_eq!(m.avg_trade_duration, 0.0);
    }

    #[test]
    fn mixed_log_statistics() {
        let trades = vec![
            trade(1, 5, 300.0),
            trade(6, 8, -100.0),
            trade(10, 20, 500.0),
            trade(21, 22, 0.0),
        ];
        let m = Metrics::compute(&trades);

        assert_eq!(m.total_trades, 4);
        assert_eq!(m.trades_won, 2);
        assert_eq!(m.trades_lost, 1);
        assert_relative_eq!(m.win_rate, 0.5);
        assert_relative_eq!(m.total_pnl, 700.0);
        assert_relative_eq!(m.largest_win, 500.0);
        assert_relative_eq!(m.largest_loss, 100.0);
        // durations: 4 + 2 + 10 + 1 = 17 days over 4 trades
        assert_relative_eq!(m.avg_trade_duration, 17.0 / 4.0);
    }
}
