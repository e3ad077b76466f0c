//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_notify_adapter::ConsoleNotifier;
use crate::adapters::csv_adapter::CsvBarSource;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_state_adapter::JsonStateAdapter;
use crate::domain::backtest;
use crate::domain::config_validation::{
    validate_backtest_config, validate_data_config, validate_strategy_config,
};
use crate::domain::error::TrendgateError;
use crate::domain::ohlcv::Timeframe;
use crate::domain::report;
use crate::domain::series::{BarSeries, EmaPeriods};
use crate::domain::strategy::{BacktestParams, StrategyParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::BarSourcePort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::state_port::StatePort;

#[derive(Parser, Debug)]
#[command(name = "trendgate", about = "EMA breakout swing-trading evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay the strategy over historical bars
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Also write the plain-text report to this file
        #[arg(short, long)]
        report: Option<PathBuf>,
        /// Write the final strategy state to this file
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
    /// Evaluate the latest completed bar and update persisted state
    Run {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the available data range per timeframe
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            report,
            state,
        } => run_backtest_cmd(&config, report.as_ref(), state.as_ref()),
        Command::Run { config } => run_live(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_strategy_params(config: &dyn ConfigPort) -> Result<StrategyParams, TrendgateError> {
    let symbol =
        config
            .get_string("strategy", "symbol")
            .ok_or_else(|| TrendgateError::ConfigMissing {
                section: "strategy".into(),
                key: "symbol".into(),
            })?;

    Ok(StrategyParams {
        symbol,
        ema_periods: EmaPeriods {
            short: config.get_int("strategy", "ema_short", 8) as usize,
            medium: config.get_int("strategy", "ema_medium", 50) as usize,
            long: config.get_int("strategy", "ema_long", 100) as usize,
        },
        consecutive_bars: config.get_int("strategy", "consecutive_bars", 2) as usize,
        big_move_threshold: config.get_double("strategy", "big_move_threshold", 1_000.0),
        stop_buffer: config.get_double("strategy", "stop_buffer", 5.0),
    })
}

pub fn build_backtest_params(config: &dyn ConfigPort) -> BacktestParams {
    BacktestParams {
        account_value: config.get_double("backtest", "account_value", 10_000.0),
        max_risk_percent: config.get_double("backtest", "max_risk_percent", 0.02),
        volatility_window: config.get_int("backtest", "volatility_window", 4) as usize,
        stop_multiplier: config.get_double("backtest", "stop_multiplier", 2.0),
    }
}

fn validate_all(config: &dyn ConfigPort) -> Result<(), TrendgateError> {
    validate_strategy_config(config)?;
    validate_backtest_config(config)?;
    validate_data_config(config)?;
    Ok(())
}

fn load_series(
    source: &dyn BarSourcePort,
    symbol: &str,
    timeframe: Timeframe,
    periods: EmaPeriods,
) -> Result<BarSeries, TrendgateError> {
    let bars = source.fetch_bars(symbol, timeframe)?;
    BarSeries::from_bars(bars, periods)
}

struct LoadedMarket {
    strategy: StrategyParams,
    params: BacktestParams,
    weekly: BarSeries,
    daily: BarSeries,
}

/// Shared staging for backtest and live runs: validate config, build
/// parameters, load both timeframes, and enforce the warm-up minimum.
fn load_market(adapter: &FileConfigAdapter) -> Result<LoadedMarket, TrendgateError> {
    validate_all(adapter)?;

    let strategy = build_strategy_params(adapter)?;
    let params = build_backtest_params(adapter);

    let data_dir = adapter
        .get_string("data", "dir")
        .ok_or_else(|| TrendgateError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    let source = CsvBarSource::new(PathBuf::from(data_dir));

    eprintln!("Loading {} bars...", strategy.symbol);
    let weekly = load_series(&source, &strategy.symbol, Timeframe::Weekly, strategy.ema_periods)?;
    let daily = load_series(&source, &strategy.symbol, Timeframe::Daily, strategy.ema_periods)?;

    let minimum = backtest::warmup_bars(&strategy) + 1;
    if daily.len() < minimum {
        return Err(TrendgateError::InsufficientData {
            bars: daily.len(),
            minimum,
        });
    }

    Ok(LoadedMarket {
        strategy,
        params,
        weekly,
        daily,
    })
}

fn run_backtest_cmd(
    config_path: &PathBuf,
    report_path: Option<&PathBuf>,
    state_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let market = match load_market(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Replaying {} daily bars ({} weekly) for {}",
        market.daily.len(),
        market.weekly.len(),
        market.strategy.symbol,
    );

    let result = backtest::run_backtest(
        &market.weekly,
        &market.daily,
        &market.strategy,
        &market.params,
    );
    let summary = report::backtest_summary(&result, market.params.account_value);
    println!("{summary}");

    if let Some(path) = report_path {
        if let Err(e) = fs::write(path, &summary) {
            eprintln!("error: failed to write report {}: {}", path.display(), e);
            return ExitCode::from(1);
        }
        eprintln!("Report written to {}", path.display());
    }

    if let Some(path) = state_path {
        let state_adapter = JsonStateAdapter::new(path.clone());
        if let Err(e) = state_adapter.save(&result.state) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Final state written to {}", path.display());
    }

    eprintln!(
        "Backtest complete: {} trades, final balance {:.2}",
        result.state.history.len(),
        result.final_balance,
    );
    ExitCode::SUCCESS
}

fn run_live(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let market = match load_market(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let state_file = adapter
        .get_string("state", "file")
        .unwrap_or_else(|| "trade_state.json".to_string());
    let state_adapter = JsonStateAdapter::new(PathBuf::from(state_file));

    let mut state = match state_adapter.load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let event = backtest::evaluate_latest(
        &market.weekly,
        &market.daily,
        &mut state,
        &market.strategy,
        &market.params,
    );

    // persist before notifying: an undelivered message must not undo a
    // recorded transition
    if let Err(e) = state_adapter.save(&state) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("State saved to {}", state_adapter.path().display());

    // the warm-up check in load_market guarantees at least one daily bar
    let latest = &market.daily.bars()[market.daily.len() - 1];
    let message = report::daily_summary(&market.strategy.symbol, latest, event.as_ref());
    if let Err(e) = ConsoleNotifier.send(&message) {
        eprintln!("warning: notification failed: {e}");
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_all(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy = match build_strategy_params(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let params = build_backtest_params(&adapter);

    eprintln!("\nStrategy:");
    eprintln!("  symbol:             {}", strategy.symbol);
    eprintln!(
        "  EMA periods:        {}/{}/{}",
        strategy.ema_periods.short, strategy.ema_periods.medium, strategy.ema_periods.long,
    );
    eprintln!("  consecutive bars:   {}", strategy.consecutive_bars);
    eprintln!("  big-move threshold: {}", strategy.big_move_threshold);
    eprintln!("  stop buffer:        {}", strategy.stop_buffer);
    eprintln!("\nAccount:");
    eprintln!("  value:              {:.2}", params.account_value);
    eprintln!("  max risk:           {:.1}%", params.max_risk_percent * 100.0);
    eprintln!("  volatility window:  {}", params.volatility_window);
    eprintln!("  stop multiplier:    {}", params.stop_multiplier);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbol = match adapter.get_string("strategy", "symbol") {
        Some(s) => s,
        None => {
            eprintln!("error: missing config key [strategy] symbol");
            return ExitCode::from(2);
        }
    };
    let data_dir = match adapter.get_string("data", "dir") {
        Some(d) => d,
        None => {
            eprintln!("error: missing config key [data] dir");
            return ExitCode::from(2);
        }
    };

    let source = CsvBarSource::new(PathBuf::from(data_dir));
    for timeframe in [Timeframe::Weekly, Timeframe::Daily] {
        match source.data_range(&symbol, timeframe) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{symbol} {timeframe}: {count} bars, {min_date} to {max_date}");
            }
            Ok(None) => {
                eprintln!("{symbol} {timeframe}: no data found");
            }
            Err(e) => {
                eprintln!("error querying {symbol} {timeframe}: {e}");
            }
        }
    }
    ExitCode::SUCCESS
}
