use crate::engine::execution::{Fill, OrderSide};
use crate::metrics::{EquityCurve, EquityPoint};
use crate::portfolio::position::Position;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Cannot open a position while one is already open")]
    PositionAlreadyOpen,
    #[error("Cannot close: no open position")]
    NoOpenPosition,
    #[error("Close fill of {fill} does not match position of {open}")]
    QuantityMismatch { fill: u32, open: u32 },
}

//cash, the open position, and the equity curve of a session
#[derive(Debug, Clone)]
pub struct Account {
    //initial account balance
    pub initial_balance: f64,

    //current cash
    pub cash: f64,

    //cash + mark-to-market of the open position, as of the last mark
    pub equity: f64,

    position: Option<Position>,

    //complete trade log
    trade_log: Vec<Fill>,

    equity_curve: EquityCurve,
}

impl Account {
    //creates a new account with initial balance
    pub fn new(initial_balance: f64) -> Self {
        Account {
            initial_balance,
            cash: initial_balance,
            equity: initial_balance,
            position: None,
            trade_log: Vec::new(),
            equity_curve: EquityCurve::new(initial_balance),
        }
    }

    //applies a fill and returns the realized pnl (zero for entries)
    //buys debit quantity * price, closes credit quantity * price
    pub fn process_fill(&mut self, fill: Fill) -> Result<f64, LedgerError> {
        let realized = match fill.side {
            OrderSide::Buy => {
                if self.position.is_some() {
                    return Err(LedgerError::PositionAlreadyOpen);
                }
                self.cash -= fill.notional_value();
                self.position = Some(Position::new(fill.quantity, fill.price, fill.timestamp));
                0.0
            }
            OrderSide::Close => {
                let position = self.position.ok_or(LedgerError::NoOpenPosition)?;
                if position.quantity != fill.quantity {
                    return Err(LedgerError::QuantityMismatch {
                        fill: fill.quantity,
                        open: position.quantity,
                    });
                }
                self.cash += fill.notional_value();
                self.position = None;
                position.unrealized_pnl(fill.price)
            }
        };

        //log the fill
        self.trade_log.push(fill);
        Ok(realized)
    }

    //equity at a given close without recording it
    pub fn equity_at(&self, close: f64) -> f64 {
        self.cash + self.position.map_or(0.0, |p| p.market_value(close))
    }

    //marks the account to the bar close and appends one equity point
    pub fn mark_to_market(&mut self, timestamp: DateTime<Utc>, close: f64) -> &EquityPoint {
        self.equity = self.equity_at(close);
        self.equity_curve.push(timestamp, self.equity)
    }

    //returns the open position, or none if flat
    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    pub fn trade_log(&self) -> &[Fill] {
        &self.trade_log
    }

    pub fn equity_curve(&self) -> &EquityCurve {
        &self.equity_curve
    }

    //final equity minus starting cash
    pub fn pnl(&self) -> f64 {
        self.equity - self.initial_balance
    }

    pub(crate) fn into_parts(self) -> (Vec<Fill>, EquityCurve, Option<Position>) {
        (self.trade_log, self.equity_curve, self.position)
    }
}
