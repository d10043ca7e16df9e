use crate::config::SwingConfig;
use crate::data::{validate_series, Bar};
use crate::engine::execution::{
    ExecutionEngine, Fill, OrderSide, OrderStatus, Resolution, TradeState,
};
use crate::error::{BacktestError, OrderError};
use crate::metrics::{EquityPoint, SummaryMetrics};
use crate::portfolio::{Account, Position};
use crate::strategy::{
    ExitReason, IndicatorSnapshot, PositionSizer, SignalEvaluator, SwingIndicators,
};
use rayon::prelude::*;
use serde::Serialize;

//result of a backtest
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub summary: SummaryMetrics,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Fill>,
    //position still open when the bars ran out, reported unrealized
    pub open_position: Option<Position>,
    pub rejected_orders: usize,
    pub canceled_orders: usize,
}

//replays a bar series through indicators, signals, orders, and the ledger
pub struct BacktestEngine {
    config: SwingConfig,
    bars: Vec<Bar>,
    indicators: SwingIndicators,
    evaluator: SignalEvaluator,
    sizer: PositionSizer,
    execution: ExecutionEngine,
    account: Account,
    //entries refused by the sizer before an order existed
    unsized_entries: usize,
    cursor: usize,
}

impl BacktestEngine {
    //validates the configuration and the series before any bar is processed
    pub fn new(config: SwingConfig, bars: Vec<Bar>) -> Result<Self, BacktestError> {
        config.validate()?;
        if bars.is_empty() {
            return Err(BacktestError::EmptySeries);
        }
        validate_series(&bars)?;

        Ok(BacktestEngine {
            indicators: SwingIndicators::new(&config),
            evaluator: SignalEvaluator::new(&config),
            sizer: PositionSizer::from_config(&config),
            execution: ExecutionEngine::new(config.fill_model),
            account: Account::new(config.starting_cash),
            unsized_entries: 0,
            cursor: 0,
            config,
            bars,
        })
    }

    //runs the backtest to the end of the series
    pub fn run(mut self) -> Result<BacktestResult, BacktestError> {
        if let Some(first) = self.bars.first() {
            tracing::info!(
                timestamp = %first.timestamp,
                bars = self.bars.len(),
                starting_cash = self.config.starting_cash,
                "Starting backtest"
            );
        }

        while self.step()?.is_some() {}

        Ok(self.finish())
    }

    //processes the next bar, returning its equity point, or None when exhausted
    pub fn step(&mut self) -> Result<Option<EquityPoint>, BacktestError> {
        let index = self.cursor;
        let Some(bar) = self.bars.get(index).cloned() else {
            return Ok(None);
        };
        self.cursor += 1;

        //(a) indicators
        let snapshot = self.indicators.update(&bar);

        //(b) resolve the in-flight order at this bar
        self.resolve_pending(index, &bar)?;

        //(c) evaluate entry or exit on the post-fill state
        match snapshot {
            Some(snap) => self.evaluate(index, &bar, &snap),
            None => tracing::trace!(
                timestamp = %bar.timestamp,
                bar = index,
                "Indicators warming up"
            ),
        }

        //(d) ledger snapshot
        Ok(Some(*self.account.mark_to_market(bar.timestamp, bar.close)))
    }

    fn resolve_pending(&mut self, index: usize, bar: &Bar) -> Result<(), BacktestError> {
        match self.execution.resolve(index, bar, self.account.cash) {
            Some(Resolution::Filled(fill)) => {
                match fill.side {
                    OrderSide::Buy => tracing::info!(
                        timestamp = %bar.timestamp,
                        price = fill.price,
                        quantity = fill.quantity,
                        "BUY EXECUTED, {:.2}",
                        fill.price
                    ),
                    OrderSide::Close => tracing::info!(
                        timestamp = %bar.timestamp,
                        price = fill.price,
                        quantity = fill.quantity,
                        reason = ?fill.reason,
                        "SELL EXECUTED, {:.2}",
                        fill.price
                    ),
                }
                if let Err(source) = self.account.process_fill(fill) {
                    tracing::error!(timestamp = %bar.timestamp, "Ledger refused fill: {}", source);
                    return Err(BacktestError::Ledger {
                        index,
                        timestamp: bar.timestamp,
                        source,
                    });
                }
            }
            Some(Resolution::Rejected(order)) => {
                tracing::warn!(
                    timestamp = %bar.timestamp,
                    order_id = order.id,
                    quantity = order.quantity,
                    cash = self.account.cash,
                    "Order Canceled/Margin/Rejected"
                );
            }
            None => {}
        }
        Ok(())
    }

    fn evaluate(&mut self, index: usize, bar: &Bar, snap: &IndicatorSnapshot) {
        let state = self.execution.state().clone();
        let request = match state {
            TradeState::Idle => self.request_entry(index, bar, snap),
            TradeState::PositionOpen => self.request_exit(index, bar, snap),
            TradeState::PendingEntry(order) | TradeState::PendingExit(order) => {
                Err(OrderError::OrderConflict { pending: order.id })
            }
        };

        match request {
            Ok(_) => {}
            Err(e @ OrderError::InsufficientFunds { .. }) => {
                self.unsized_entries += 1;
                tracing::warn!(timestamp = %bar.timestamp, "Entry rejected: {}", e);
            }
            Err(e) => {
                tracing::warn!(timestamp = %bar.timestamp, "Request ignored: {}", e);
            }
        }
    }

    fn request_entry(
        &mut self,
        index: usize,
        bar: &Bar,
        snap: &IndicatorSnapshot,
    ) -> Result<(), OrderError> {
        let score = self.evaluator.score(snap);
        tracing::debug!(timestamp = %bar.timestamp, score, rsi = snap.rsi, "Entry score");

        let Some(signal) = self.evaluator.entry(snap) else {
            return Ok(());
        };

        let quantity = self.sizer.size(self.account.cash, bar.close)?;
        self.execution.submit_entry(quantity, index, bar)?;
        tracing::info!(
            timestamp = %bar.timestamp,
            score = signal.score,
            quantity,
            "BUY CREATE {:.2}",
            bar.close
        );
        Ok(())
    }

    fn request_exit(
        &mut self,
        index: usize,
        bar: &Bar,
        snap: &IndicatorSnapshot,
    ) -> Result<(), OrderError> {
        let Some(position) = self.account.position().copied() else {
            return Ok(());
        };

        let Some(reason) = self.evaluator.exit(snap, position.entry_price) else {
            return Ok(());
        };

        self.execution
            .submit_exit(position.quantity, reason, index, bar)?;
        match reason {
            ExitReason::StopLoss => tracing::info!(
                timestamp = %bar.timestamp,
                entry_price = position.entry_price,
                "STOP LOSS CREATE {:.2}",
                bar.close
            ),
            ExitReason::SignalReversal => tracing::info!(
                timestamp = %bar.timestamp,
                "CLOSE CREATE {:.2}",
                bar.close
            ),
        }
        Ok(())
    }

    //cancels any order left in flight and builds the result
    fn finish(mut self) -> BacktestResult {
        let last = self.bars.last().map(|b| b.timestamp).unwrap_or_default();
        if let Some(order) = self.execution.cancel_pending() {
            tracing::warn!(
                timestamp = %last,
                order_id = order.id,
                side = ?order.side,
                "Order Canceled/Margin/Rejected: bars exhausted"
            );
        }

        let rejected_orders =
            self.execution.count_with_status(OrderStatus::Rejected) + self.unsized_entries;
        let canceled_orders = self.execution.count_with_status(OrderStatus::Canceled);

        let (trades, equity_curve, open_position) = self.account.into_parts();
        let equity_curve = equity_curve.into_points();

        let summary = SummaryMetrics::from_backtest(&equity_curve, &trades, &self.config);

        tracing::info!(
            timestamp = %last,
            final_equity = summary.final_equity,
            pnl = summary.pnl,
            sharpe = ?summary.sharpe_ratio,
            "Backtest finished"
        );

        BacktestResult {
            summary,
            equity_curve,
            trades,
            open_position,
            rejected_orders,
            canceled_orders,
        }
    }

    //returns a reference to the account
    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn execution(&self) -> &ExecutionEngine {
        &self.execution
    }
}

//validates and replays one session
pub fn run_backtest(config: SwingConfig, bars: Vec<Bar>) -> Result<BacktestResult, BacktestError> {
    BacktestEngine::new(config, bars)?.run()
}

//runs independent sessions in parallel, one per configuration, in input order
pub fn run_sweep(
    bars: &[Bar],
    configs: &[SwingConfig],
) -> Vec<Result<BacktestResult, BacktestError>> {
    configs
        .par_iter()
        .map(|config| run_backtest(config.clone(), bars.to_vec()))
        .collect()
}
