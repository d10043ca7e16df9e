use crate::config::SwingConfig;
use crate::engine::execution::{Fill, OrderSide};
use crate::metrics::timeseries::{calculate_returns, max_drawdown, EquityPoint};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary metrics for a backtest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub initial_cash: f64,
    pub final_equity: f64,
    //final equity minus initial cash, open position marked at the last close
    pub pnl: f64,
    pub total_return_pct: f64,
    pub max_drawdown: f64,
    //annualized; None when undefined
    pub sharpe_ratio: Option<f64>,
    pub num_trades: usize,
    pub num_winning_trades: usize,
    pub num_losing_trades: usize,
    pub win_rate: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl SummaryMetrics {
    //calculate summary metrics from equity curve and trade log
    pub fn from_backtest(
        equity_curve: &[EquityPoint],
        trades: &[Fill],
        config: &SwingConfig,
    ) -> Self {
        let initial_cash = config.starting_cash;
        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(initial_cash);

        let pnl = final_equity - initial_cash;

        let equity_values: Vec<f64> = equity_curve.iter().map(|p| p.equity).collect();
        let returns = calculate_returns(&equity_values);
        let sharpe = sharpe_ratio(
            &returns,
            config.annualization_factor,
            config.risk_free_rate,
        );

        let round_trips = round_trip_pnls(trades);
        let num_winning = round_trips.iter().filter(|&&p| p > 0.0).count();
        let num_losing = round_trips.iter().filter(|&&p| p < 0.0).count();
        let win_rate = if round_trips.is_empty() {
            0.0
        } else {
            num_winning as f64 / round_trips.len() as f64
        };

        SummaryMetrics {
            initial_cash,
            final_equity,
            pnl,
            total_return_pct: pnl / initial_cash * 100.0,
            max_drawdown: max_drawdown(equity_curve),
            sharpe_ratio: sharpe,
            num_trades: round_trips.len(),
            num_winning_trades: num_winning,
            num_losing_trades: num_losing,
            win_rate,
            largest_win: round_trips.iter().fold(0.0f64, |a, &b| a.max(b)),
            largest_loss: round_trips.iter().fold(0.0f64, |a, &b| a.min(b)),
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let sharpe = match self.sharpe_ratio {
            Some(s) => format!("{:.3}", s),
            None => "undefined".to_string(),
        };

        let rows = [
            ("Initial Cash", format!("${:.2}", self.initial_cash)),
            ("Final Equity", format!("${:.2}", self.final_equity)),
            (
                "PnL",
                format!("${:.2} ({:.2}%)", self.pnl, self.total_return_pct),
            ),
            ("Max Drawdown", format!("{:.2}%", self.max_drawdown * 100.0)),
            ("Sharpe Ratio (Annualized)", sharpe),
            ("Number of Trades", format!("{}", self.num_trades)),
            ("Win Rate", format!("{:.2}%", self.win_rate * 100.0)),
            ("Largest Win", format!("${:.2}", self.largest_win)),
            ("Largest Loss", format!("${:.2}", self.largest_loss)),
        ];

        let mut table = Table::new();
        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));
        for (name, value) in rows {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }
        table.printstd();
    }
}

//pairs each buy with the close that follows it
//a trailing unmatched buy is an open position and is not counted
fn round_trip_pnls(trades: &[Fill]) -> Vec<f64> {
    let mut round_trips = Vec::new();
    let mut open: Option<&Fill> = None;

    for trade in trades {
        match (trade.side, open) {
            (OrderSide::Buy, _) => open = Some(trade),
            (OrderSide::Close, Some(entry)) => {
                round_trips.push((trade.price - entry.price) * trade.quantity as f64);
                open = None;
            }
            (OrderSide::Close, None) => {}
        }
    }

    round_trips
}

//annualized sharpe ratio of per-bar returns over their population std dev
//None with fewer than two returns or zero variance
pub fn sharpe_ratio(
    returns: &[f64],
    annualization_factor: f64,
    risk_free_rate: f64,
) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }

    let per_bar_rf = risk_free_rate / annualization_factor;
    let excess: Vec<f64> = returns.iter().map(|r| r - per_bar_rf).collect();

    let mean = excess.as_slice().mean();
    let std_dev = excess.as_slice().population_std_dev();

    if !std_dev.is_finite() || std_dev < f64::EPSILON {
        return None;
    }

    Some((mean / std_dev) * annualization_factor.sqrt())
}
