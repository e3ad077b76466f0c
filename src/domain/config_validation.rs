//! Configuration validation.
//!
//! Validates every config field before a backtest or live run.

use crate::domain::error::TrendgateError;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    validate_symbol(config)?;
    validate_ema_periods(config)?;
    validate_consecutive_bars(config)?;
    validate_big_move_threshold(config)?;
    validate_stop_buffer(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    validate_account_value(config)?;
    validate_max_risk_percent(config)?;
    validate_volatility_window(config)?;
    validate_stop_multiplier(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TrendgateError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    match config.get_string("strategy", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TrendgateError::ConfigMissing {
            section: "strategy".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_ema_periods(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    let short = config.get_int("strategy", "ema_short", 8);
    let medium = config.get_int("strategy", "ema_medium", 50);
    let long = config.get_int("strategy", "ema_long", 100);

    for (key, value) in [("ema_short", short), ("ema_medium", medium), ("ema_long", long)] {
        if value < 1 {
            return Err(TrendgateError::ConfigInvalid {
                section: "strategy".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be at least 1"),
            });
        }
    }

    if !(short < medium && medium < long) {
        return Err(TrendgateError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "ema_short".to_string(),
            reason: "EMA periods must be strictly increasing (short < medium < long)".to_string(),
        });
    }
    Ok(())
}

fn validate_consecutive_bars(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    let value = config.get_int("strategy", "consecutive_bars", 2);
    if value < 1 {
        return Err(TrendgateError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "consecutive_bars".to_string(),
            reason: "consecutive_bars must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_big_move_threshold(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    let value = config.get_double("strategy", "big_move_threshold", 1_000.0);
    if value <= 0.0 {
        return Err(TrendgateError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "big_move_threshold".to_string(),
            reason: "big_move_threshold must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_stop_buffer(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    let value = config.get_double("strategy", "stop_buffer", 5.0);
    if value < 0.0 {
        return Err(TrendgateError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "stop_buffer".to_string(),
            reason: "stop_buffer must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_account_value(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    let value = config.get_double("backtest", "account_value", 10_000.0);
    if value <= 0.0 {
        return Err(TrendgateError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "account_value".to_string(),
            reason: "account_value must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_max_risk_percent(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    let value = config.get_double("backtest", "max_risk_percent", 0.02);
    if value <= 0.0 || value > 1.0 {
        return Err(TrendgateError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "max_risk_percent".to_string(),
            reason: "max_risk_percent must be in (0, 1]".to_string(),
        });
    }
    Ok(())
}

fn validate_volatility_window(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    let value = config.get_int("backtest", "volatility_window", 4);
    if value < 1 {
        return Err(TrendgateError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "volatility_window".to_string(),
            reason: "volatility_window must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_stop_multiplier(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    let value = config.get_double("backtest", "stop_multiplier", 2.0);
    if value <= 0.0 {
        return Err(TrendgateError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "stop_multiplier".to_string(),
            reason: "stop_multiplier must be positive".to_string(),
        });
    }
    Ok(())
}
