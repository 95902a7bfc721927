//! Exchange-facing requests derived from management actions.
//!
//! The evaluator only decides; whoever owns the broker connection executes.
//! `ManagementOrder` is the request shape that executor consumes:
//!
//! ```text
//! tp1_partial                  → ReducePosition (exit side, size × close_pct)
//! be / be_plus / runner_trail  → UpdateStop (new stop price)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradeguard_domain::{Action, ActionReason, OrderSide, Symbol, Trade};

/// A request to change the live position at the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManagementOrder {
    /// Close part of the position
    ReducePosition {
        /// Trading symbol
        symbol: Symbol,
        /// Order side that reduces the position
        side: OrderSide,
        /// Quantity to close
        quantity: Decimal,
        /// Fraction of the position being closed
        close_pct: Decimal,
        /// Rule that requested the reduction
        reason: ActionReason,
    },

    /// Move the protective stop
    UpdateStop {
        /// Trading symbol
        symbol: Symbol,
        /// New stop trigger price
        stop_price: Decimal,
        /// Rule that moved the stop
        reason: ActionReason,
    },
}

impl ManagementOrder {
    /// Translate one action for `trade`.
    ///
    /// Returns `None` for an action missing the field its reason needs
    /// (e.g. a deserialized `tp1_partial` without `close_pct`), or when the
    /// reduce quantity overflows.
    pub fn from_action(trade: &Trade, action: &Action) -> Option<Self> {
        match action.reason() {
            ActionReason::Tp1Partial => {
                let close_pct = action.close_pct()?;
                Some(Self::ReducePosition {
                    symbol: trade.symbol().clone(),
                    side: trade.side().exit_action(),
                    quantity: trade.size().checked_mul(close_pct)?,
                    close_pct,
                    reason: action.reason(),
                })
            },
            ActionReason::Be | ActionReason::BePlus | ActionReason::RunnerTrail => {
                Some(Self::UpdateStop {
                    symbol: trade.symbol().clone(),
                    stop_price: action.new_stop()?,
                    reason: action.reason(),
                })
            },
        }
    }

    /// Symbol this request targets
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::ReducePosition { symbol, .. } | Self::UpdateStop { symbol, .. } => symbol,
        }
    }
}

/// Translate a batch of actions, preserving order.
///
/// Within one evaluation several stop moves may be emitted; all are returned
/// so the executor can replay them or keep only the last.
pub fn orders_for(trade: &Trade, actions: &[Action]) -> Vec<ManagementOrder> {
    actions
        .iter()
        .filter_map(|action| ManagementOrder::from_action(trade, action))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
