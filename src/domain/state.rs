//! Strategy state machine: one open position, trade history, window flags.
//!
//! `big_move_done` and `weekly_block` only carry meaning while no
//! position is open. The window anchor (`first_entry_price`) is set by
//! the first entry of a window and cleared when a new window starts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::TrendgateError;
use super::position::{ClosedTrade, Position};

/// Outcome of a completed transition, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeEvent {
    Opened {
        date: NaiveDate,
        price: f64,
        size: f64,
        stop_loss: f64,
    },
    Closed {
        date: NaiveDate,
        price: f64,
        pnl: f64,
    },
}

/// The single mutable root of the strategy. Persists as a flat JSON
/// record through [`StatePort`](crate::ports::state_port::StatePort).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyState {
    pub position: Option<Position>,
    pub history: Vec<ClosedTrade>,
    pub first_entry_price: Option<f64>,
    pub big_move_done: bool,
    pub window_active: bool,
    pub weekly_block: bool,
}

impl StrategyState {
    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    /// Open a position. The first entry of a window anchors
    /// `first_entry_price`. Opening over an existing position is an
    /// explicit `InvalidTransition`, not a silent no-op.
    pub fn open(
        &mut self,
        date: NaiveDate,
        price: f64,
        size: f64,
        stop_loss: f64,
    ) -> Result<TradeEvent, TrendgateError> {
        if self.position.is_some() {
            return Err(TrendgateError::InvalidTransition {
                reason: format!("cannot open on {date}: a position is already open"),
            });
        }

        if self.first_entry_price.is_none() {
            self.first_entry_price = Some(price);
        }
        self.position = Some(Position {
            entry_date: date,
            entry_price: price,
            size,
            stop_loss,
        });

        Ok(TradeEvent::Opened {
            date,
            price,
            size,
            stop_loss,
        })
    }

    /// Close the open position at `price`. Returns `None` when flat.
    /// Latches the big-move lockout once the move from the window anchor
    /// reaches `big_move_threshold`; the latch holds until
    /// [`reset_window`](Self::reset_window).
    pub fn close(
        &mut self,
        date: NaiveDate,
        price: f64,
        big_move_threshold: f64,
    ) -> Option<TradeEvent> {
        let position = self.position.take()?;
        let pnl = (price - position.entry_price) * position.size;

        self.history.push(ClosedTrade {
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_date: date,
            exit_price: price,
            size: position.size,
            pnl,
        });

        if let Some(anchor) = self.first_entry_price {
            if price - anchor >= big_move_threshold {
                self.big_move_done = true;
            }
        }

        Some(TradeEvent::Closed { date, price, pnl })
    }

    /// Start a fresh re-entry window on a new qualifying setup.
    pub fn reset_window(&mut self) {
        self.first_entry_price = None;
        self.big_move_done = false;
        self.window_active = true;
        self.weekly_block = false;
    }

    /// End the window after a sustained weekly breakdown.
    pub fn end_window(&mut self) {
        self.window_active = false;
        self.weekly_block = true;
    }
}
