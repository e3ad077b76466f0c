//! CSV file bar source.
//!
//! One file per timeframe, named `{symbol}_{timeframe}.csv`, with a
//! header row and columns `date,open,high,low,close` (dates YYYY-MM-DD).

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::TrendgateError;
use crate::domain::ohlcv::{OhlcvBar, Timeframe};
use crate::ports::data_port::BarSourcePort;

pub struct CsvBarSource {
    base_path: PathBuf,
}

impl CsvBarSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol, timeframe.as_str()))
    }
}

fn price_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, TrendgateError> {
    record
        .get(index)
        .ok_or_else(|| TrendgateError::Data {
            reason: format!("missing {name} column"),
        })?
        .trim()
        .parse()
        .map_err(|e| TrendgateError::Data {
            reason: format!("invalid {name} value: {e}"),
        })
}

impl BarSourcePort for CsvBarSource {
    fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<OhlcvBar>, TrendgateError> {
        let path = self.csv_path(symbol, timeframe);
        let content = fs::read_to_string(&path).map_err(|e| TrendgateError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TrendgateError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| TrendgateError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                TrendgateError::Data {
                    reason: format!("invalid date {date_str:?}: {e}"),
                }
            })?;

            bars.push(OhlcvBar {
                date,
                open: price_field(&record, 1, "open")?,
                high: price_field(&record, 2, "high")?,
                low: price_field(&record, 3, "low")?,
                close: price_field(&record, 4, "close")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn data_range(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendgateError> {
        let bars = self.fetch_bars(symbol, timeframe)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
