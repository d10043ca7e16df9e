use crate::config::SwingConfig;
use crate::error::OrderError;

//risk-based sizing: risk budget divided by the per-share stop distance
#[derive(Debug, Clone, Copy)]
pub struct PositionSizer {
    risk_per_trade: f64,
    stop_loss_pct: f64,
}

impl PositionSizer {
    pub fn new(risk_per_trade: f64, stop_loss_pct: f64) -> Self {
        PositionSizer {
            risk_per_trade,
            stop_loss_pct,
        }
    }

    pub fn from_config(config: &SwingConfig) -> Self {
        Self::new(config.risk_per_trade, config.stop_loss_pct)
    }

    //quantity = floor((cash * risk_per_trade) / (close * stop_loss_pct))
    pub fn size(&self, cash: f64, close: f64) -> Result<u32, OrderError> {
        let insufficient = OrderError::InsufficientFunds { cash, close };
        if cash <= 0.0 || close <= 0.0 {
            return Err(insufficient);
        }

        let risk_amt = cash * self.risk_per_trade;
        let stop_loss_amt = close * self.stop_loss_pct;
        let qty = (risk_amt / stop_loss_amt).floor();

        if !qty.is_finite() || qty < 1.0 {
            return Err(insufficient);
        }

        //float-to-int casts saturate
        Ok(qty as u32)
    }
}
