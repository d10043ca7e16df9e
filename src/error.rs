use crate::engine::execution::OrderSide;
use crate::portfolio::LedgerError;
use chrono::{DateTime, Utc};
use thiserror::Error;

//fatal errors that abort a backtest session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Data error at bar {index} ({timestamp}): {reason}")]
    Data {
        index: usize,
        timestamp: DateTime<Utc>,
        reason: String,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Bar series is empty")]
    EmptySeries,
    //the ledger refused a fill the state machine produced
    #[error("Ledger out of sync at bar {index} ({timestamp}): {source}")]
    Ledger {
        index: usize,
        timestamp: DateTime<Utc>,
        source: LedgerError,
    },
}

impl BacktestError {
    pub fn data(index: usize, timestamp: DateTime<Utc>, reason: impl Into<String>) -> Self {
        BacktestError::Data {
            index,
            timestamp,
            reason: reason.into(),
        }
    }
}

//order requests that the state machine refuses
//all are absorbed by the replay engine and only logged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Insufficient funds: cash {cash:.2} cannot size a position at close {close:.2}")]
    InsufficientFunds { cash: f64, close: f64 },
    #[error("Order conflict: order {pending} is still pending")]
    OrderConflict { pending: u64 },
    #[error("Invalid transition: {side:?} request while {state}")]
    InvalidTransition {
        state: &'static str,
        side: OrderSide,
    },
}
