//! Management Actions
//!
//! Actions are immutable instructions emitted by the evaluator. They are
//! transient outputs: executing them against a broker and persisting them is
//! the caller's job.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ladder rule produced an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionReason {
    /// First partial close at TP1
    Tp1Partial,
    /// Stop moved to breakeven (plus offset)
    Be,
    /// Stop moved to breakeven-plus, runner mode enabled
    BePlus,
    /// Runner stop tightened to a new trail level
    RunnerTrail,
}

impl ActionReason {
    /// Stable snake_case name, as used in serialized actions
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionReason::Tp1Partial => "tp1_partial",
            ActionReason::Be => "be",
            ActionReason::BePlus => "be_plus",
            ActionReason::RunnerTrail => "runner_trail",
        }
    }

    /// Whether this action moves the stop
    pub fn moves_stop(&self) -> bool {
        !matches!(self, ActionReason::Tp1Partial)
    }
}

impl fmt::Display for ActionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instruction emitted for one price snapshot
///
/// `close_pct` is present only for [`ActionReason::Tp1Partial`]; `new_stop`
/// is present only for stop moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    reason: ActionReason,
    profit_r: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    old_stop: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_stop: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    close_pct: Option<Decimal>,
}

impl Action {
    /// Partial close of `close_pct` of the remaining position
    pub fn tp1_partial(profit_r: Decimal, old_stop: Option<Decimal>, close_pct: Decimal) -> Self {
        Self {
            reason: ActionReason::Tp1Partial,
            profit_r,
            old_stop,
            new_stop: None,
            close_pct: Some(close_pct),
        }
    }

    /// Stop move from `old_stop` to `new_stop`
    ///
    /// `reason` must be a stop-moving reason (see [`ActionReason::moves_stop`]).
    /// Use [`Action::tp1_partial`] for partial closes.
    ///
    /// # Panics
    ///
    /// In debug builds, if `reason` is [`ActionReason::Tp1Partial`].
    pub fn stop_move(
        reason: ActionReason,
        profit_r: Decimal,
        old_stop: Option<Decimal>,
        new_stop: Decimal,
    ) -> Self {
        debug_assert!(reason.moves_stop(), "{} does not move the stop", reason);
        Self {
            reason,
            profit_r,
            old_stop,
            new_stop: Some(new_stop),
            close_pct: None,
        }
    }

    /// Rule that produced this action
    pub fn reason(&self) -> ActionReason {
        self.reason
    }

    /// Profit in R at evaluation time
    pub fn profit_r(&self) -> Decimal {
        self.profit_r
    }

    /// Stop in effect before this action
    pub fn old_stop(&self) -> Option<Decimal> {
        self.old_stop
    }

    /// Stop set by this action
    pub fn new_stop(&self) -> Option<Decimal> {
        self.new_stop
    }

    /// Fraction of the position to close
    pub fn close_pct(&self) -> Option<Decimal> {
        self.close_pct
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}R", self.reason, self.profit_r)?;
        if let Some(pct) = self.close_pct {
            write!(f, " close {}", pct)?;
        }
        if let Some(new_stop) = self.new_stop {
            match self.old_stop {
                Some(old) => write!(f, " stop {} -> {}", old, new_stop)?,
                None => write!(f, " stop -> {}", new_stop)?,
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
