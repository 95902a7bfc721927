//! Trade Management Evaluator
//!
//! Applies the four ladder rules to one price snapshot, in fixed order:
//!
//! 1. **TP1 partial** — `profit_r >= tp1_r`, once
//! 2. **Breakeven** — after TP1, `profit_r >= tp1_r`, once
//! 3. **Breakeven-plus** — `profit_r >= be_plus_r`, once; enables runner mode
//! 4. **Runner trail** — in runner mode, `profit_r >= runner_trail_start_r`,
//!    each time a new step boundary is crossed
//!
//! Profit is always measured against the initial stop so R stays a stable
//! unit for the whole life of the trade. Several rules may fire in a single
//! call when price gaps past multiple thresholds; each later rule sees the
//! stop written by the earlier one.
//!
//! The evaluator takes immutable snapshots and returns the next state and
//! stop inside an [`Evaluation`]. Use [`Evaluation::apply`] to write them
//! back onto mutable records.

use rust_decimal::Decimal;
use tracing::{debug, warn};
use tradeguard_domain::{stop_from_entry, Action, ActionReason, TmParams, TmState, Trade};

// =============================================================================
// Evaluation
// =============================================================================

/// Output of one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Actions in rule order (0 to 4 entries)
    pub actions: Vec<Action>,
    /// Ladder state after this snapshot
    pub state: TmState,
    /// Live stop after this snapshot
    pub current_stop: Option<Decimal>,
    /// Profit in R at the evaluated price (zero for degenerate risk)
    pub profit_r: Decimal,
}

impl Evaluation {
    /// No action fired
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Write the new stop and state back, returning the actions
    pub fn apply(self, trade: &mut Trade, state: &mut TmState) -> Vec<Action> {
        trade.set_current_stop(self.current_stop);
        *state = self.state;
        self.actions
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// Evaluate the management ladder for one price snapshot
///
/// Returns an empty evaluation (state and stop unchanged) when the trade's
/// initial risk is not positive. Never panics: a rule whose stop price
/// overflows `Decimal` is skipped with a warning and left unmarked.
///
/// # Examples
///
/// ```
/// # use tradeguard_domain::{ActionReason, Side, Symbol, TmParams, TmState, Trade, TradeId};
/// # use tradeguard_engine::evaluate_trade_management;
/// # use rust_decimal_macros::dec;
/// let trade = Trade::new(
///     TradeId::new("t1").unwrap(),
///     Symbol::new("TEST").unwrap(),
///     Side::Buy,
///     dec!(100),
///     dec!(90), // R = 10
///     dec!(1),
/// );
///
/// // +1R: partial close and breakeven in one call
/// let eval = evaluate_trade_management(&trade, &TmState::new(), dec!(110), &TmParams::default());
///
/// let reasons: Vec<_> = eval.actions.iter().map(|a| a.reason()).collect();
/// assert_eq!(reasons, [ActionReason::Tp1Partial, ActionReason::Be]);
/// assert_eq!(eval.current_stop, Some(dec!(100.5)));
/// assert!(eval.state.did_be());
/// ```
pub fn evaluate_trade_management(
    trade: &Trade,
    state: &TmState,
    price: Decimal,
    params: &TmParams,
) -> Evaluation {
    let mut next = *state;
    let mut current_stop = trade.current_stop();
    let mut actions = Vec::new();

    let base_stop = trade.effective_stop();
    let r_value = trade.risk_r();
    if r_value <= Decimal::ZERO {
        debug!(
            trade_id = %trade.id(),
            entry = %trade.entry(),
            initial_stop = %trade.initial_stop(),
            side = %trade.side(),
            "Degenerate risk, skipping management"
        );
        return Evaluation {
            actions,
            state: next,
            current_stop,
            profit_r: Decimal::ZERO,
        };
    }

    let pr = trade.profit_in_r(price);
    let side = trade.side();
    let entry = trade.entry();

    // TP1 partial
    if !next.did_tp1() && pr >= params.tp1_r {
        actions.push(Action::tp1_partial(pr, Some(base_stop), params.tp1_close_pct));
        next.mark_tp1();
        debug!(trade_id = %trade.id(), profit_r = %pr, close_pct = %params.tp1_close_pct, "TP1 partial");
    }

    // Breakeven (same threshold as TP1)
    if next.did_tp1() && !next.did_be() && pr >= params.tp1_r {
        match stop_from_entry(entry, r_value, side, params.be_offset_r) {
            Some(new_stop) => {
                let old_stop = current_stop.unwrap_or(trade.initial_stop());
                current_stop = Some(new_stop);
                actions.push(Action::stop_move(ActionReason::Be, pr, Some(old_stop), new_stop));
                next.mark_be();
                debug!(trade_id = %trade.id(), profit_r = %pr, %old_stop, %new_stop, "Breakeven");
            },
            None => {
                warn!(
                    trade_id = %trade.id(),
                    be_offset_r = %params.be_offset_r,
                    "Breakeven stop overflows, rule skipped"
                );
            },
        }
    }

    // Breakeven-plus (independent of TP1/BE)
    if !next.did_be_plus() && pr >= params.be_plus_r {
        match stop_from_entry(entry, r_value, side, params.be_plus_stop_r) {
            Some(new_stop) => {
                let old_stop = current_stop.unwrap_or(trade.initial_stop());
                current_stop = Some(new_stop);
                actions.push(Action::stop_move(ActionReason::BePlus, pr, Some(old_stop), new_stop));
                next.mark_be_plus();
                debug!(trade_id = %trade.id(), profit_r = %pr, %old_stop, %new_stop, "Breakeven-plus, runner mode on");
            },
            None => {
                warn!(
                    trade_id = %trade.id(),
                    be_plus_stop_r = %params.be_plus_stop_r,
                    "Breakeven-plus stop overflows, rule skipped"
                );
            },
        }
    }

    // Runner trail
    if next.runner_mode() && pr >= params.runner_trail_start_r {
        match trail_target_level(pr, params) {
            Some(target_level_r) if target_level_r > next.last_trail_level_r() => {
                let old_stop = current_stop.unwrap_or(trade.initial_stop());
                let candidate = target_level_r
                    .checked_sub(params.runner_trail_lock_r)
                    .and_then(|lock_stop_r| stop_from_entry(entry, r_value, side, lock_stop_r));

                match candidate {
                    // Only tighten
                    Some(new_stop)
                        if current_stop.map_or(true, |stop| side.is_tighter(new_stop, stop)) =>
                    {
                        current_stop = Some(new_stop);
                        actions.push(Action::stop_move(
                            ActionReason::RunnerTrail,
                            pr,
                            Some(old_stop),
                            new_stop,
                        ));
                        next.advance_trail(target_level_r);
                        debug!(
                            trade_id = %trade.id(),
                            profit_r = %pr,
                            level_r = %target_level_r,
                            %old_stop,
                            %new_stop,
                            "Runner trail"
                        );
                    },
                    Some(new_stop) => {
                        debug!(
                            trade_id = %trade.id(),
                            level_r = %target_level_r,
                            candidate = %new_stop,
                            %old_stop,
                            "Trail candidate would loosen stop, skipped"
                        );
                    },
                    None => {
                        warn!(
                            trade_id = %trade.id(),
                            level_r = %target_level_r,
                            lock_r = %params.runner_trail_lock_r,
                            "Runner trail stop overflows, step skipped"
                        );
                    },
                }
            },
            Some(_) => {},
            None => {
                warn!(
                    trade_id = %trade.id(),
                    profit_r = %pr,
                    step_r = %params.runner_trail_step_r,
                    "Runner trail level not computable (zero step or overflow), trailing skipped"
                );
            },
        }
    }

    Evaluation {
        actions,
        state: next,
        current_stop,
        profit_r: pr,
    }
}

/// Highest trail level reached, quantized to step boundaries
///
/// ```text
/// level  = profit_r - start
/// steps  = floor(level / step)
/// target = start + steps * step
/// ```
///
/// Returns `None` if the step is zero or the arithmetic overflows.
fn trail_target_level(profit_r: Decimal, params: &TmParams) -> Option<Decimal> {
    let level = profit_r.checked_sub(params.runner_trail_start_r)?;
    let steps = level.checked_div(params.runner_trail_step_r)?.floor();
    steps
        .checked_mul(params.runner_trail_step_r)?
        .checked_add(params.runner_trail_start_r)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tradeguard_domain::{Side, Symbol, TradeId};

    fn long_trade() -> Trade {
        Trade::new(
            TradeId::new("t1").unwrap(),
            Symbol::new("TEST").unwrap(),
            Side::Buy,
            dec!(100),
            dec!(90),
            dec!(1),
        )
    }

    fn short_trade() -> Trade {
        Trade::new(
            TradeId::new("s1").unwrap(),
            Symbol::new("TEST").unwrap(),
            Side::Sell,
            dec!(100),
            dec!(110),
            dec!(1),
        )
    }

    fn reasons(eval: &Evaluation) -> Vec<ActionReason> {
        eval.actions.iter().map(|a| a.reason()).collect()
    }

    // =========================================================================
    // Trail level quantization
    // =========================================================================

    #[test]
    fn test_trail_target_level_quantizes_down() {
        let params = TmParams::default();

        assert_eq!(trail_target_level(dec!(2.0), &params), Some(dec!(2.0)));
        assert_eq!(trail_target_level(dec!(2.49), &params), Some(dec!(2.0)));
        assert_eq!(trail_target_level(dec!(2.5), &params), Some(dec!(2.5)));
        assert_eq!(trail_target_level(dec!(3.74), &params), Some(dec!(3.5)));
    }

    #[test]
    fn test_trail_target_level_zero_step() {
        let params = TmParams { runner_trail_step_r: dec!(0), ..TmParams::default() };
        assert_eq!(trail_target_level(dec!(3), &params), None);
    }

    // =========================================================================
    // Individual rules
    // =========================================================================

    #[test]
    fn test_below_tp1_no_actions() {
        let eval = evaluate_trade_management(&long_trade(), &TmState::new(), dec!(109.99), &TmParams::default());

        assert!(eval.is_empty());
        assert_eq!(eval.current_stop, None);
        assert_eq!(eval.state, TmState::new());
    }

    #[test]
    fn test_tp1_and_be_fire_together() {
        let eval = evaluate_trade_management(&long_trade(), &TmState::new(), dec!(110), &TmParams::default());

        assert_eq!(reasons(&eval), [ActionReason::Tp1Partial, ActionReason::Be]);

        let tp1 = &eval.actions[0];
        assert_eq!(tp1.close_pct(), Some(dec!(0.5)));
        assert_eq!(tp1.profit_r(), dec!(1));
        assert_eq!(tp1.old_stop(), Some(dec!(90)));
        assert_eq!(tp1.new_stop(), None);

        let be = &eval.actions[1];
        assert_eq!(be.new_stop(), Some(dec!(100.5)));
        assert_eq!(be.old_stop(), Some(dec!(90)));

        assert_eq!(eval.current_stop, Some(dec!(100.5)));
        assert!(eval.state.did_tp1() && eval.state.did_be());
        assert!(!eval.state.runner_mode());
    }

    #[test]
    fn test_be_fires_when_tp1_already_done() {
        // TP1 recorded by a previous call, BE not yet
        let mut state = TmState::new();
        state.mark_tp1();

        let eval = evaluate_trade_management(&long_trade(), &state, dec!(111), &TmParams::default());

        assert_eq!(reasons(&eval), [ActionReason::Be]);
    }

    #[test]
    fn test_be_overwrites_stop_without_tighten_guard() {
        // Externally set stop above the BE level gets pulled back to BE
        let trade = long_trade().with_current_stop(dec!(102));
        let eval = evaluate_trade_management(&trade, &TmState::new(), dec!(110), &TmParams::default());

        let be = &eval.actions[1];
        assert_eq!(be.old_stop(), Some(dec!(102)));
        assert_eq!(be.new_stop(), Some(dec!(100.5)));
        assert_eq!(eval.current_stop, Some(dec!(100.5)));
    }

    #[test]
    fn test_tp1_reports_current_stop_as_old_stop() {
        let trade = long_trade().with_current_stop(dec!(95));
        let eval = evaluate_trade_management(&trade, &TmState::new(), dec!(110), &TmParams::default());

        assert_eq!(eval.actions[0].old_stop(), Some(dec!(95)));
    }

    #[test]
    fn test_be_plus_without_tp1_when_thresholds_reordered() {
        // be_plus below tp1: BE+ can fire on its own
        let params = TmParams { tp1_r: dec!(2), be_plus_r: dec!(1), ..TmParams::default() };
        let eval = evaluate_trade_management(&long_trade(), &TmState::new(), dec!(112), &params);

        assert_eq!(reasons(&eval), [ActionReason::BePlus]);
        assert!(eval.state.did_be_plus());
        assert!(eval.state.runner_mode());
        assert!(!eval.state.did_tp1());
        assert_eq!(eval.actions[0].old_stop(), Some(dec!(90)));
        assert_eq!(eval.current_stop, Some(dec!(103)));
    }

    #[test]
    fn test_trail_requires_runner_mode() {
        // Past the trail start, but BE+ threshold set out of reach
        let params = TmParams { be_plus_r: dec!(10), ..TmParams::default() };
        let eval = evaluate_trade_management(&long_trade(), &TmState::new(), dec!(130), &params);

        assert_eq!(reasons(&eval), [ActionReason::Tp1Partial, ActionReason::Be]);
        assert!(!eval.state.runner_mode());
    }

    #[test]
    fn test_trail_guard_rejects_loosening_and_keeps_level() {
        // lock_r larger than the reached level: candidate stop sits below BE+
        let params = TmParams { runner_trail_lock_r: dec!(2.5), ..TmParams::default() };
        let eval = evaluate_trade_management(&long_trade(), &TmState::new(), dec!(120), &params);

        // 2.0R: target 2.0, lock -0.5R -> 95 < 103
        assert_eq!(
            reasons(&eval),
            [ActionReason::Tp1Partial, ActionReason::Be, ActionReason::BePlus]
        );
        assert_eq!(eval.current_stop, Some(dec!(103)));
        assert_eq!(eval.state.last_trail_level_r(), Decimal::ZERO);
    }

    #[test]
    fn test_trail_no_repeat_within_same_step() {
        let params = TmParams::default();
        let first = evaluate_trade_management(&long_trade(), &TmState::new(), dec!(125), &params);
        let mut trade = long_trade();
        let mut state = TmState::new();
        first.apply(&mut trade, &mut state);

        // 2.9R still quantizes to 2.5
        let second = evaluate_trade_management(&trade, &state, dec!(129), &params);
        assert!(second.is_empty());
        assert_eq!(second.current_stop, Some(dec!(115)));
    }

    #[test]
    fn test_trail_without_current_stop_always_applies() {
        // Runner mode restored without any stop having been set
        let mut state = TmState::new();
        state.mark_tp1();
        state.mark_be();
        state.mark_be_plus();

        let eval = evaluate_trade_management(&long_trade(), &state, dec!(120), &TmParams::default());

        assert_eq!(reasons(&eval), [ActionReason::RunnerTrail]);
        let trail = &eval.actions[0];
        assert_eq!(trail.old_stop(), Some(dec!(90)));
        assert_eq!(trail.new_stop(), Some(dec!(110)));
        assert_eq!(eval.state.last_trail_level_r(), dec!(2));
    }

    #[test]
    fn test_zero_step_disables_trail_only() {
        let params = TmParams { runner_trail_step_r: dec!(0), ..TmParams::default() };
        let eval = evaluate_trade_management(&long_trade(), &TmState::new(), dec!(125), &params);

        assert_eq!(
            reasons(&eval),
            [ActionReason::Tp1Partial, ActionReason::Be, ActionReason::BePlus]
        );
    }

    #[test]
    fn test_trail_target_level_overflow() {
        let params = TmParams { runner_trail_step_r: dec!(0.0000000001), ..TmParams::default() };
        assert_eq!(trail_target_level(Decimal::MAX, &params), None);
        assert_eq!(trail_target_level(Decimal::MIN, &TmParams::default()), None);
    }

    // =========================================================================
    // Overflowing parameters
    // =========================================================================

    fn wide_trade() -> Trade {
        // R = 1000
        Trade::new(
            TradeId::new("w1").unwrap(),
            Symbol::new("TEST").unwrap(),
            Side::Buy,
            dec!(100000),
            dec!(99000),
            dec!(1),
        )
    }

    #[test]
    fn test_be_stop_overflow_skips_rule() {
        // 1e26 * R(1000) does not fit in a Decimal
        let params = TmParams { be_offset_r: dec!(100000000000000000000000000), ..TmParams::default() };
        assert!(params.validate().is_ok());

        let eval = evaluate_trade_management(&wide_trade(), &TmState::new(), dec!(101000), &params);

        assert_eq!(reasons(&eval), [ActionReason::Tp1Partial]);
        assert!(eval.state.did_tp1());
        assert!(!eval.state.did_be());
        assert_eq!(eval.current_stop, None);

        // Retried, still skipped; TP1 does not repeat
        let again = evaluate_trade_management(&wide_trade(), &eval.state, dec!(101000), &params);
        assert!(again.is_empty());
        assert!(!again.state.did_be());
    }

    #[test]
    fn test_be_plus_stop_overflow_keeps_runner_off() {
        let params = TmParams { be_plus_stop_r: dec!(100000000000000000000000000), ..TmParams::default() };
        let eval = evaluate_trade_management(&wide_trade(), &TmState::new(), dec!(103000), &params);

        assert_eq!(reasons(&eval), [ActionReason::Tp1Partial, ActionReason::Be]);
        assert!(!eval.state.did_be_plus());
        assert!(!eval.state.runner_mode());
        assert_eq!(eval.current_stop, Some(dec!(100050)));
    }

    #[test]
    fn test_trail_stop_overflow_skips_step_and_keeps_level() {
        // lock 1e28: (2 - 1e28) * R(10) does not fit
        let params = TmParams {
            runner_trail_lock_r: dec!(10000000000000000000000000000),
            ..TmParams::default()
        };
        let eval = evaluate_trade_management(&long_trade(), &TmState::new(), dec!(120), &params);

        assert_eq!(
            reasons(&eval),
            [ActionReason::Tp1Partial, ActionReason::Be, ActionReason::BePlus]
        );
        assert_eq!(eval.current_stop, Some(dec!(103)));
        assert_eq!(eval.state.last_trail_level_r(), Decimal::ZERO);
    }

    #[test]
    fn test_extreme_prices_do_not_panic() {
        let short = evaluate_trade_management(&short_trade(), &TmState::new(), Decimal::MIN, &TmParams::default());
        assert!(short.profit_r > dec!(1000000000000000000000000));
        assert_eq!(
            reasons(&short)[..3],
            [ActionReason::Tp1Partial, ActionReason::Be, ActionReason::BePlus]
        );

        let long = evaluate_trade_management(&long_trade(), &TmState::new(), Decimal::MIN, &TmParams::default());
        assert!(long.is_empty());
        assert!(long.profit_r < Decimal::ZERO);
    }

    // =========================================================================
    // Short side
    // =========================================================================

    #[test]
    fn test_short_full_ladder_in_one_call() {
        // R = 10, price 75 => +2.5R
        let eval = evaluate_trade_management(&short_trade(), &TmState::new(), dec!(75), &TmParams::default());

        assert_eq!(
            reasons(&eval),
            [
                ActionReason::Tp1Partial,
                ActionReason::Be,
                ActionReason::BePlus,
                ActionReason::RunnerTrail
            ]
        );
        assert_eq!(eval.actions[1].new_stop(), Some(dec!(99.5)));
        assert_eq!(eval.actions[2].new_stop(), Some(dec!(97)));
        assert_eq!(eval.actions[3].old_stop(), Some(dec!(97)));
        assert_eq!(eval.actions[3].new_stop(), Some(dec!(85)));
        assert_eq!(eval.current_stop, Some(dec!(85)));
    }

    #[test]
    fn test_short_trail_never_raises_stop() {
        let trade = short_trade().with_current_stop(dec!(80));
        let mut state = TmState::new();
        state.mark_tp1();
        state.mark_be();
        state.mark_be_plus();

        // +2.5R => candidate 85 is looser than 80 for a short
        let eval = evaluate_trade_management(&trade, &state, dec!(75), &TmParams::default());

        assert!(eval.is_empty());
        assert_eq!(eval.current_stop, Some(dec!(80)));
        assert_eq!(eval.state.last_trail_level_r(), Decimal::ZERO);
    }

    // =========================================================================
    // Degenerate input
    // =========================================================================

    #[test]
    fn test_degenerate_risk_returns_nothing() {
        let trade = Trade::new(
            TradeId::new("bad").unwrap(),
            Symbol::new("TEST").unwrap(),
            Side::Buy,
            dec!(100),
            dec!(110),
            dec!(1),
        );

        for price in [dec!(50), dec!(110), dec!(1000)] {
            let eval = evaluate_trade_management(&trade, &TmState::new(), price, &TmParams::default());
            assert!(eval.is_empty());
            assert_eq!(eval.profit_r, Decimal::ZERO);
            assert_eq!(eval.state, TmState::new());
            assert_eq!(eval.current_stop, None);
        }
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let trade = long_trade();
        let state = TmState::new();

        let eval = evaluate_trade_management(&trade, &state, dec!(125), &TmParams::default());

        assert_eq!(eval.actions.len(), 4);
        assert_eq!(trade.current_stop(), None);
        assert!(!state.did_tp1());
    }
}
