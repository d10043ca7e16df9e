pub mod backtest;
pub mod execution;

pub use backtest::{run_backtest, run_sweep, BacktestEngine, BacktestResult};
pub use execution::{
    ExecutionEngine, Fill, Order, OrderSide, OrderStatus, Resolution, TradeState,
};
