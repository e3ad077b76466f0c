//! Strategy and backtest parameter sets.

use super::series::EmaPeriods;

/// Rule-set parameters shared by the backtest and the live runner.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub symbol: String,
    pub ema_periods: EmaPeriods,
    pub consecutive_bars: usize,
    pub big_move_threshold: f64,
    pub stop_buffer: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            symbol: String::new(),
            ema_periods: EmaPeriods::default(),
            consecutive_bars: 2,
            big_move_threshold: 1_000.0,
            stop_buffer: 5.0,
        }
    }
}

/// Account and sizing parameters for a replay or live evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    pub account_value: f64,
    pub max_risk_percent: f64,
    pub volatility_window: usize,
    pub stop_multiplier: f64,
}

impl Default for BacktestParams {
    fn default() -> Self {
        BacktestParams {
            account_value: 10_000.0,
            max_risk_percent: 0.02,
            volatility_window: 4,
            stop_multiplier: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_defaults() {
        let params = StrategyParams::default();
        assert_eq!(params.ema_periods.short, 8);
        assert_eq!(params.ema_periods.medium, 50);
        assert_eq!(params.ema_periods.long, 100);
        assert_eq!(params.consecutive_bars, 2);
        assert_eq!(params.big_move_threshold, 1_000.0);
        assert_eq!(params.stop_buffer, 5.0);
    }

    #[test]
    fn backtest_defaults() {
        let params = BacktestParams::default();
        assert_eq!(params.account_value, 10_000.0);
        assert_eq!(params.max_risk_percent, 0.02);
        assert_eq!(params.volatility_window, 4);
        assert_eq!(params.stop_multiplier, 2.0);
    }
}
