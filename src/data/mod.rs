pub mod bar;
pub mod loader;

pub use bar::{Bar, BarError};
pub use loader::{load_csv, parse_timestamp};

use crate::error::BacktestError;

//fails fast on the first invalid, duplicate, or out-of-order bar
pub fn validate_series(bars: &[Bar]) -> Result<(), BacktestError> {
    for (index, bar) in bars.iter().enumerate() {
        bar.validate()
            .map_err(|e| BacktestError::data(index, bar.timestamp, e.to_string()))?;

        if index > 0 {
            let prev = &bars[index - 1];
            if bar.timestamp == prev.timestamp {
                return Err(BacktestError::data(index, bar.timestamp, "duplicate timestamp"));
            }
            if bar.timestamp < prev.timestamp {
                return Err(BacktestError::data(
                    index,
                    bar.timestamp,
                    format!("timestamp precedes previous bar ({})", prev.timestamp),
                ));
            }
        }
    }
    Ok(())
}
