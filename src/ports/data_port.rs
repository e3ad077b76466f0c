//! Bar retrieval port trait.

use chrono::NaiveDate;

use crate::domain::error::TrendgateError;
use crate::domain::ohlcv::{OhlcvBar, Timeframe};

pub trait BarSourcePort {
    /// Completed bars for one timeframe of the instrument, ordered by
    /// date. Only completed bars may be returned; a still-forming bar
    /// would distort the consecutive-close checks downstream.
    fn fetch_bars(&self, symbol: &str, timeframe: Timeframe)
    -> Result<Vec<OhlcvBar>, TrendgateError>;

    fn data_range(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendgateError>;
}
