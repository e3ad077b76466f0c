//! Strategy-state persistence port trait.
//!
//! Single-writer contract: one logical strategy instance owns one state
//! record; two concurrent read-modify-write cycles over the same record
//! must be prevented by whatever schedules the runs.

use crate::domain::error::TrendgateError;
use crate::domain::state::StrategyState;

pub trait StatePort {
    /// Load the persisted state, or the documented default (flat, empty
    /// history, all flags false) when no usable prior record exists.
    fn load(&self) -> Result<StrategyState, TrendgateError>;

    fn save(&self, state: &StrategyState) -> Result<(), TrendgateError>;
}
