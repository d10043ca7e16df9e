//a Rust-based single-asset swing-trading backtesting core

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod portfolio;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{FillModel, SwingConfig};
    pub use crate::data::{load_csv, validate_series, Bar, BarError};
    pub use crate::engine::{
        run_backtest, run_sweep, BacktestEngine, BacktestResult, ExecutionEngine, Fill, Order,
        OrderSide, OrderStatus, TradeState,
    };
    pub use crate::error::{BacktestError, OrderError};
    pub use crate::indicators::{
        Bands, BollingerBands, Cross, Crossover, Rsi, Sma, StreamingIndicator,
    };
    pub use crate::metrics::{sharpe_ratio, EquityCurve, EquityPoint, SummaryMetrics};
    pub use crate::portfolio::{Account, Position};
    pub use crate::strategy::{
        ExitReason, IndicatorSnapshot, PositionSizer, SignalEvaluator, SwingIndicators,
    };
}
