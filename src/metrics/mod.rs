pub mod summary;
pub mod timeseries;

pub use summary::{sharpe_ratio, SummaryMetrics};
pub use timeseries::{calculate_returns, max_drawdown, EquityCurve, EquityPoint};
