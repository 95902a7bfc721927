//! Managed trade: single owner of one trade's ladder progression.
//!
//! Each `(Trade, TmState)` pair must be evaluated by exactly one execution
//! context, in price order. `ManagedTrade` takes `&mut self` for every
//! evaluation, so sharing one across threads requires the caller to wrap it
//! in a mutex or hand it to a single task.

use rust_decimal::Decimal;
use tracing::info;
use tradeguard_domain::{is_stop_hit, Action, TmParams, TmState, Trade};

use crate::error::EngineResult;
use crate::evaluator::{evaluate_trade_management, Evaluation};

/// One open trade under management
#[derive(Debug, Clone)]
pub struct ManagedTrade {
    trade: Trade,
    state: TmState,
    params: TmParams,
}

impl ManagedTrade {
    /// Start managing a freshly opened trade.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Domain` if the trade's risk setup or the params
    /// are invalid.
    pub fn new(trade: Trade, params: TmParams) -> EngineResult<Self> {
        Self::resume(trade, TmState::new(), params)
    }

    /// Resume management from a previously persisted state.
    ///
    /// # Errors
    ///
    /// Same as [`ManagedTrade::new`].
    pub fn resume(trade: Trade, state: TmState, params: TmParams) -> EngineResult<Self> {
        trade.validate()?;
        params.validate()?;

        Ok(Self {
            trade,
            state,
            params,
        })
    }

    /// Evaluate a price tick and apply the result.
    ///
    /// Returns the actions the caller must execute (partial close, stop
    /// updates) in rule order.
    pub fn on_price(&mut self, price: Decimal) -> Vec<Action> {
        let evaluation = self.preview(price);

        for action in &evaluation.actions {
            info!(
                trade_id = %self.trade.id(),
                symbol = %self.trade.symbol(),
                reason = %action.reason(),
                profit_r = %action.profit_r(),
                old_stop = ?action.old_stop(),
                new_stop = ?action.new_stop(),
                close_pct = ?action.close_pct(),
                "Trade management action"
            );
        }

        evaluation.apply(&mut self.trade, &mut self.state)
    }

    /// Evaluate a price tick without applying it.
    pub fn preview(&self, price: Decimal) -> Evaluation {
        evaluate_trade_management(&self.trade, &self.state, price, &self.params)
    }

    /// Whether `price` has reached the stop currently protecting the trade.
    pub fn is_stopped_out(&self, price: Decimal) -> bool {
        is_stop_hit(self.trade.side(), price, self.trade.effective_stop())
    }

    /// Live stop, falling back to the initial stop.
    pub fn effective_stop(&self) -> Decimal {
        self.trade.effective_stop()
    }

    /// The managed trade.
    pub fn trade(&self) -> &Trade {
        &self.trade
    }

    /// Current ladder state.
    pub fn state(&self) -> &TmState {
        &self.state
    }

    /// Ladder parameters.
    pub fn params(&self) -> &TmParams {
        &self.params
    }

    /// Release the trade and state, e.g. for persistence.
    pub fn into_parts(self) -> (Trade, TmState) {
        (self.trade, self.state)
    }
}

// =============================================================================
// Tests
// =============================================================================
