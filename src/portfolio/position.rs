use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//the single open long position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub quantity: u32,
    pub entry_price: f64,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    pub fn new(quantity: u32, entry_price: f64, opened_at: DateTime<Utc>) -> Self {
        Position {
            quantity,
            entry_price,
            opened_at,
        }
    }

    //mark-to-market value at a given price
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    //calculates unrealized pnl at a given price
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.quantity as f64
    }
}
