//! Trade Management Ladder: configuration and progression state
//!
//! `TmParams` is read-only configuration describing the R thresholds of the
//! ladder. `TmState` records how far up the ladder a trade has progressed.
//!
//! # Ladder
//!
//! ```text
//! +tp1_r                  close tp1_close_pct, stop -> entry + be_offset_r
//! +be_plus_r              stop -> entry + be_plus_stop_r, enter runner mode
//! +runner_trail_start_r   trail: every runner_trail_step_r, lock
//!                         runner_trail_lock_r behind the reached level
//! ```

use crate::value_objects::DomainError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// TmParams
// =============================================================================

/// Thresholds and offsets controlling the management ladder
///
/// All values are in multiples of R except `tp1_close_pct`, which is a
/// fraction (0.5 = 50%) of the remaining position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmParams {
    /// Profit (R) triggering the first partial close and breakeven
    pub tp1_r: Decimal,
    /// Fraction of size closed at TP1
    pub tp1_close_pct: Decimal,
    /// Breakeven stop offset from entry (R)
    pub be_offset_r: Decimal,
    /// Profit (R) triggering breakeven-plus
    pub be_plus_r: Decimal,
    /// Breakeven-plus stop offset from entry (R)
    pub be_plus_stop_r: Decimal,
    /// Profit (R) at which runner trailing begins
    pub runner_trail_start_r: Decimal,
    /// R increment between successive trail tightenings
    pub runner_trail_step_r: Decimal,
    /// R locked behind the most recently reached trail level
    pub runner_trail_lock_r: Decimal,
}

impl TmParams {
    /// Validate parameter ranges
    ///
    /// The evaluator does not require validated params; this is for callers
    /// that load params from configuration.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidParams` if:
    /// - `tp1_r` <= 0 or `be_plus_r` <= 0
    /// - `tp1_close_pct` not in (0, 1]
    /// - `runner_trail_step_r` <= 0
    /// - `runner_trail_start_r` < 0 or `runner_trail_lock_r` < 0
    ///
    /// # Examples
    /// ```
    /// # use tradeguard_domain::TmParams;
    /// # use rust_decimal_macros::dec;
    /// assert!(TmParams::default().validate().is_ok());
    ///
    /// let params = TmParams { runner_trail_step_r: dec!(0), ..TmParams::default() };
    /// assert!(params.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.tp1_r <= Decimal::ZERO {
            return Err(DomainError::InvalidParams("tp1_r must be positive".to_string()));
        }

        if self.tp1_close_pct <= Decimal::ZERO || self.tp1_close_pct > Decimal::ONE {
            return Err(DomainError::InvalidParams(format!(
                "tp1_close_pct must be in (0, 1], got {}",
                self.tp1_close_pct
            )));
        }

        if self.be_plus_r <= Decimal::ZERO {
            return Err(DomainError::InvalidParams("be_plus_r must be positive".to_string()));
        }

        if self.runner_trail_start_r < Decimal::ZERO {
            return Err(DomainError::InvalidParams(
                "runner_trail_start_r cannot be negative".to_string(),
            ));
        }

        if self.runner_trail_step_r <= Decimal::ZERO {
            return Err(DomainError::InvalidParams(
                "runner_trail_step_r must be positive".to_string(),
            ));
        }

        if self.runner_trail_lock_r < Decimal::ZERO {
            return Err(DomainError::InvalidParams(
                "runner_trail_lock_r cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TmParams {
    fn default() -> Self {
        Self {
            tp1_r: dec!(1.0),
            tp1_close_pct: dec!(0.5),
            be_offset_r: dec!(0.05),
            be_plus_r: dec!(1.5),
            be_plus_stop_r: dec!(0.3),
            runner_trail_start_r: dec!(2.0),
            runner_trail_step_r: dec!(0.5),
            runner_trail_lock_r: dec!(1.0),
        }
    }
}

impl fmt::Display for TmParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TmParams {{ tp1: {}R close {}, be: +{}R, be+: {}R -> +{}R, trail: from {}R step {}R lock {}R }}",
            self.tp1_r,
            self.tp1_close_pct,
            self.be_offset_r,
            self.be_plus_r,
            self.be_plus_stop_r,
            self.runner_trail_start_r,
            self.runner_trail_step_r,
            self.runner_trail_lock_r
        )
    }
}

// =============================================================================
// TmState
// =============================================================================

/// Per-trade progression through the ladder
///
/// # Invariants
/// - Flags only transition false → true
/// - `runner_mode` is set together with `did_be_plus`
/// - `last_trail_level_r` never decreases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmState {
    did_tp1: bool,
    did_be: bool,
    did_be_plus: bool,
    runner_mode: bool,
    last_trail_level_r: Decimal,
}

impl TmState {
    /// Fresh state for a newly opened trade
    pub fn new() -> Self {
        Self::default()
    }

    /// TP1 partial close has fired
    pub fn did_tp1(&self) -> bool {
        self.did_tp1
    }

    /// Breakeven stop has fired
    pub fn did_be(&self) -> bool {
        self.did_be
    }

    /// Breakeven-plus stop has fired
    pub fn did_be_plus(&self) -> bool {
        self.did_be_plus
    }

    /// Runner trailing is enabled
    pub fn runner_mode(&self) -> bool {
        self.runner_mode
    }

    /// Highest R level at which the trail has been tightened
    pub fn last_trail_level_r(&self) -> Decimal {
        self.last_trail_level_r
    }

    /// Record the TP1 partial close
    pub fn mark_tp1(&mut self) {
        self.did_tp1 = true;
    }

    /// Record the breakeven stop move
    pub fn mark_be(&mut self) {
        self.did_be = true;
    }

    /// Record the breakeven-plus stop move and enter runner mode
    pub fn mark_be_plus(&mut self) {
        self.did_be_plus = true;
        self.runner_mode = true;
    }

    /// Advance the trail level
    ///
    /// Returns `false` (and leaves the level untouched) if `level_r` is not
    /// strictly above the current level.
    pub fn advance_trail(&mut self, level_r: Decimal) -> bool {
        if level_r > self.last_trail_level_r {
            self.last_trail_level_r = level_r;
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
