use crate::config::FillModel;
use crate::data::Bar;
use crate::error::OrderError;
use crate::strategy::ExitReason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//order side: open the long position or close it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Filled,
    Rejected,
    Canceled,
}

//a market order; status is only ever written by the execution engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub side: OrderSide,
    pub quantity: u32,
    pub status: OrderStatus,
    //bar that produced the request
    pub created_at: DateTime<Utc>,
    pub created_bar: usize,
    //close of the triggering bar
    pub reference_price: f64,
    pub fill_price: Option<f64>,
    pub reason: Option<ExitReason>,
}

//represents a filled order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub id: u64,
    pub order_id: u64,
    pub bar_index: usize,
    pub timestamp: DateTime<Utc>,
    pub side: OrderSide,
    pub price: f64,
    pub quantity: u32,
    pub reason: Option<ExitReason>,
}

impl Fill {
    //returns the notional value of the fill
    pub fn notional_value(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

//order/position phase of the session
#[derive(Debug, Clone, PartialEq)]
pub enum TradeState {
    Idle,
    PendingEntry(Order),
    PositionOpen,
    PendingExit(Order),
}

impl TradeState {
    pub fn pending(&self) -> Option<&Order> {
        match self {
            TradeState::PendingEntry(order) | TradeState::PendingExit(order) => Some(order),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TradeState::Idle => "Idle",
            TradeState::PendingEntry(_) => "PendingEntry",
            TradeState::PositionOpen => "PositionOpen",
            TradeState::PendingExit(_) => "PendingExit",
        }
    }
}

//outcome of resolving the pending order against a bar
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Filled(Fill),
    Rejected(Order),
}

//single in-flight order state machine
//Idle -> PendingEntry -> PositionOpen -> PendingExit -> Idle
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    next_order_id: u64,
    next_fill_id: u64,
    fill_model: FillModel,
    state: TradeState,
    //orders that reached a terminal status, in resolution order
    history: Vec<Order>,
}

impl ExecutionEngine {
    pub fn new(fill_model: FillModel) -> Self {
        ExecutionEngine {
            next_order_id: 1,
            next_fill_id: 1,
            fill_model,
            state: TradeState::Idle,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &TradeState {
        &self.state
    }

    pub fn pending_order(&self) -> Option<&Order> {
        self.state.pending()
    }

    pub fn count_with_status(&self, status: OrderStatus) -> usize {
        self.history.iter().filter(|o| o.status == status).count()
    }

    fn conflict_check(&self) -> Result<(), OrderError> {
        match self.state.pending() {
            Some(order) => Err(OrderError::OrderConflict { pending: order.id }),
            None => Ok(()),
        }
    }

    fn new_order(
        &mut self,
        side: OrderSide,
        quantity: u32,
        bar_index: usize,
        bar: &Bar,
        reason: Option<ExitReason>,
    ) -> Order {
        let order = Order {
            id: self.next_order_id,
            side,
            quantity,
            status: OrderStatus::Pending,
            created_at: bar.timestamp,
            created_bar: bar_index,
            reference_price: bar.close,
            fill_price: None,
            reason,
        };
        self.next_order_id += 1;
        order
    }

    //creates a pending buy; only legal from Idle
    pub fn submit_entry(
        &mut self,
        quantity: u32,
        bar_index: usize,
        bar: &Bar,
    ) -> Result<u64, OrderError> {
        self.conflict_check()?;
        if self.state != TradeState::Idle {
            return Err(OrderError::InvalidTransition {
                state: self.state.name(),
                side: OrderSide::Buy,
            });
        }

        let order = self.new_order(OrderSide::Buy, quantity, bar_index, bar, None);
        let id = order.id;
        self.state = TradeState::PendingEntry(order);
        Ok(id)
    }

    //creates a pending close for the whole position; only legal from PositionOpen
    pub fn submit_exit(
        &mut self,
        quantity: u32,
        reason: ExitReason,
        bar_index: usize,
        bar: &Bar,
    ) -> Result<u64, OrderError> {
        self.conflict_check()?;
        if self.state != TradeState::PositionOpen {
            return Err(OrderError::InvalidTransition {
                state: self.state.name(),
                side: OrderSide::Close,
            });
        }

        let order = self.new_order(OrderSide::Close, quantity, bar_index, bar, Some(reason));
        let id = order.id;
        self.state = TradeState::PendingExit(order);
        Ok(id)
    }

    //resolves the pending order as a market order on this bar
    //a buy whose notional exceeds available cash is rejected
    pub fn resolve(&mut self, bar_index: usize, bar: &Bar, cash: f64) -> Option<Resolution> {
        let state = std::mem::replace(&mut self.state, TradeState::Idle);

        let (mut order, filled_state) = match state {
            TradeState::PendingEntry(order) => (order, TradeState::PositionOpen),
            TradeState::PendingExit(order) => (order, TradeState::Idle),
            other => {
                self.state = other;
                return None;
            }
        };

        let price = match self.fill_model {
            FillModel::SignalClose => order.reference_price,
            FillModel::NextClose => bar.close,
        };

        if order.side == OrderSide::Buy && price * order.quantity as f64 > cash {
            order.status = OrderStatus::Rejected;
            self.state = TradeState::Idle;
            self.history.push(order.clone());
            return Some(Resolution::Rejected(order));
        }

        order.status = OrderStatus::Filled;
        order.fill_price = Some(price);

        let fill = Fill {
            id: self.next_fill_id,
            order_id: order.id,
            bar_index,
            timestamp: bar.timestamp,
            side: order.side,
            price,
            quantity: order.quantity,
            reason: order.reason,
        };
        self.next_fill_id += 1;

        self.state = filled_state;
        self.history.push(order);
        Some(Resolution::Filled(fill))
    }

    //cancels the pending order, returning to the pre-order state
    pub fn cancel_pending(&mut self) -> Option<Order> {
        let state = std::mem::replace(&mut self.state, TradeState::Idle);

        let (mut order, previous) = match state {
            TradeState::PendingEntry(order) => (order, TradeState::Idle),
            TradeState::PendingExit(order) => (order, TradeState::PositionOpen),
            other => {
                self.state = other;
                return None;
            }
        };

        order.status = OrderStatus::Canceled;
        self.state = previous;
        self.history.push(order.clone());
        Some(order)
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new(FillModel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn bar(i: i64, close: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + Duration::days(i);
        Bar::new_unchecked(ts, close, close, close, close, 1000.0)
    }

    #[test]
    fn full_lifecycle() {
        let mut engine = ExecutionEngine::new(FillModel::SignalClose);
        assert_eq!(engine.state(), &TradeState::Idle);

        engine.submit_entry(10, 0, &bar(0, 100.0)).unwrap();
        assert!(matches!(engine.state(), TradeState::PendingEntry(_)));

        let fill = match engine.resolve(1, &bar(1, 105.0), 10000.0) {
            Some(Resolution::Filled(fill)) => fill,
            other => panic!("expected fill, got {:?}", other),
        };
        assert_eq!(fill.price, 100.0);
        assert_eq!(fill.bar_index, 1);
        assert_eq!(engine.state(), &TradeState::PositionOpen);

        engine
            .submit_exit(10, ExitReason::StopLoss, 2, &bar(2, 96.0))
            .unwrap();
        let fill = match engine.resolve(3, &bar(3, 95.0), 0.0) {
            Some(Resolution::Filled(fill)) => fill,
            other => panic!("expected fill, got {:?}", other),
        };
        assert_eq!(fill.side, OrderSide::Close);
        assert_eq!(fill.reason, Some(ExitReason::StopLoss));
        assert_eq!(engine.state(), &TradeState::Idle);
        assert_eq!(engine.count_with_status(OrderStatus::Filled), 2);
    }

    #[test]
    fn second_request_while_pending_is_a_conflict() {
        let mut engine = ExecutionEngine::default();
        let id = engine.submit_entry(10, 0, &bar(0, 100.0)).unwrap();

        let err = engine.submit_entry(5, 0, &bar(0, 100.0)).unwrap_err();
        assert_eq!(err, OrderError::OrderConflict { pending: id });

        let err = engine
            .submit_exit(10, ExitReason::SignalReversal, 0, &bar(0, 100.0))
            .unwrap_err();
        assert_eq!(err, OrderError::OrderConflict { pending: id });
        assert_eq!(engine.pending_order().map(|o| o.quantity), Some(10));
    }

    #[test]
    fn illegal_transitions_are_refused() {
        let mut engine = ExecutionEngine::default();
        assert!(matches!(
            engine.submit_exit(10, ExitReason::SignalReversal, 0, &bar(0, 100.0)),
            Err(OrderError::InvalidTransition { .. })
        ));

        engine.submit_entry(10, 0, &bar(0, 100.0)).unwrap();
        engine.resolve(1, &bar(1, 100.0), 10000.0);
        assert!(matches!(
            engine.submit_entry(10, 1, &bar(1, 100.0)),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn next_close_model_fills_at_resolving_bar() {
        let mut engine = ExecutionEngine::new(FillModel::NextClose);
        engine.submit_entry(10, 0, &bar(0, 100.0)).unwrap();
        match engine.resolve(1, &bar(1, 103.0), 10000.0) {
            Some(Resolution::Filled(fill)) => assert_eq!(fill.price, 103.0),
            other => panic!("expected fill, got {:?}", other),
        }
    }

    #[test]
    fn unaffordable_buy_is_rejected_back_to_idle() {
        let mut engine = ExecutionEngine::default();
        engine.submit_entry(200, 0, &bar(0, 100.0)).unwrap();
        match engine.resolve(1, &bar(1, 100.0), 10000.0) {
            Some(Resolution::Rejected(order)) => assert_eq!(order.status, OrderStatus::Rejected),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(engine.state(), &TradeState::Idle);
    }

    #[test]
    fn cancel_restores_previous_state() {
        let mut engine = ExecutionEngine::default();
        engine.submit_entry(10, 0, &bar(0, 100.0)).unwrap();
        engine.resolve(1, &bar(1, 100.0), 10000.0);
        engine
            .submit_exit(10, ExitReason::SignalReversal, 1, &bar(1, 100.0))
            .unwrap();

        let canceled = engine.cancel_pending().unwrap();
        assert_eq!(canceled.status, OrderStatus::Canceled);
        assert_eq!(engine.state(), &TradeState::PositionOpen);
        assert!(engine.cancel_pending().is_none());
    }

    #[test]
    fn resolve_without_pending_is_a_no_op() {
        let mut engine = ExecutionEngine::default();
        assert!(engine.resolve(0, &bar(0, 100.0), 10000.0).is_none());
        assert_eq!(engine.state(), &TradeState::Idle);
    }
}
