use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarError {
    #[error("Invalid OHLC values: high ({high}) < low ({low})")]
    InvalidHighLow { high: f64, low: f64 },
    #[error("Invalid OHLC values: close ({close}) outside high-low range [{low}, {high}]")]
    InvalidClose { close: f64, high: f64, low: f64 },
    #[error("Invalid OHLC values: open ({open}) outside high-low range [{low}, {high}]")]
    InvalidOpen { open: f64, high: f64, low: f64 },
    #[error("Negative volume: {0}")]
    NegativeVolume(f64),
    #[error("Non-finite value in field {0}")]
    NonFinite(&'static str),
}

//represents a single ohlcv bar of market data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    //creates a new Bar with validation
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, BarError> {
        let bar = Bar::new_unchecked(timestamp, open, high, low, close, volume);
        bar.validate()?;
        Ok(bar)
    }

    //creates a Bar without validation
    pub fn new_unchecked(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    //checks the ohlcv fields for internal consistency
    pub fn validate(&self) -> Result<(), BarError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(BarError::NonFinite(name));
            }
        }

        //validate high >= low
        if self.high < self.low {
            return Err(BarError::InvalidHighLow {
                high: self.high,
                low: self.low,
            });
        }

        //validate close within [low, high]
        if self.close < self.low || self.close > self.high {
            return Err(BarError::InvalidClose {
                close: self.close,
                high: self.high,
                low: self.low,
            });
        }

        //validate open within [low, high]
        if self.open < self.low || self.open > self.high {
            return Err(BarError::InvalidOpen {
                open: self.open,
                high: self.high,
                low: self.low,
            });
        }

        //validate non-negative volume
        if self.volume < 0.0 {
            return Err(BarError::NegativeVolume(self.volume));
        }

        Ok(())
    }
}
