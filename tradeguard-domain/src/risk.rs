//! R-Multiple Risk Model (Pure Functions)
//!
//! One unit of initial risk ("1R") is the price distance between entry and
//! the original stop-loss. Every threshold of the management ladder is
//! expressed in multiples of R, so profit and stop placement are normalized
//! across instruments and position sizes.
//!
//! # Sign Conventions
//!
//! ```text
//! BUY:  R = entry - stop      profit_r = (price - entry) / R
//! SELL: R = stop - entry      profit_r = (entry - price) / R
//! ```
//!
//! A non-positive R means the stop sits on the wrong side of (or at) the
//! entry. That setup is degenerate: profit in R is reported as zero.
//!
//! # Overflow
//!
//! None of these functions panic. `risk_r` and `profit_in_r` saturate at
//! `Decimal::MAX`/`Decimal::MIN`; `stop_from_entry` returns `None` when the
//! stop price is not representable.

use crate::value_objects::Side;
use rust_decimal::Decimal;

/// Signed risk distance (1R) in price units
///
/// No clamping: a stop on the wrong side of entry yields a non-positive value.
/// Saturates instead of overflowing.
///
/// # Examples
///
/// ```
/// # use tradeguard_domain::risk::risk_r;
/// # use tradeguard_domain::Side;
/// # use rust_decimal_macros::dec;
/// assert_eq!(risk_r(dec!(100), dec!(90), Side::Buy), dec!(10));
/// assert_eq!(risk_r(dec!(100), dec!(110), Side::Sell), dec!(10));
///
/// // Wrong-side stop for a long
/// assert_eq!(risk_r(dec!(100), dec!(110), Side::Buy), dec!(-10));
/// ```
pub fn risk_r(entry: Decimal, stop: Decimal, side: Side) -> Decimal {
    match side {
        Side::Buy => entry.saturating_sub(stop),
        Side::Sell => stop.saturating_sub(entry),
    }
}

/// Unrealized profit at `price` in multiples of R
///
/// Returns `Decimal::ZERO` when R is not positive instead of dividing by
/// zero or by a negative distance. A quotient too large for `Decimal`
/// saturates toward the sign of the move, so a huge profit never reads as
/// zero.
///
/// # Examples
///
/// ```
/// # use tradeguard_domain::risk::profit_in_r;
/// # use tradeguard_domain::Side;
/// # use rust_decimal_macros::dec;
/// // entry 100, stop 90 => R = 10
/// assert_eq!(profit_in_r(dec!(100), dec!(90), Side::Buy, dec!(115)), dec!(1.5));
/// assert_eq!(profit_in_r(dec!(100), dec!(90), Side::Buy, dec!(95)), dec!(-0.5));
///
/// // Degenerate risk
/// assert_eq!(profit_in_r(dec!(100), dec!(110), Side::Buy, dec!(500)), dec!(0));
/// ```
pub fn profit_in_r(entry: Decimal, stop: Decimal, side: Side, price: Decimal) -> Decimal {
    let r = risk_r(entry, stop, side);
    if r <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let move_in_favor = match side {
        Side::Buy => price.saturating_sub(entry),
        Side::Sell => entry.saturating_sub(price),
    };

    match move_in_favor.checked_div(r) {
        Some(profit_r) => profit_r,
        None if move_in_favor.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Stop price placed `stop_r` R-units from entry in the profit direction
///
/// ```text
/// BUY:  entry + stop_r * R
/// SELL: entry - stop_r * R
/// ```
///
/// A negative `stop_r` places the stop on the losing side of entry.
/// Returns `None` if the result overflows `Decimal`.
///
/// # Examples
///
/// ```
/// # use tradeguard_domain::risk::stop_from_entry;
/// # use tradeguard_domain::Side;
/// # use rust_decimal::Decimal;
/// # use rust_decimal_macros::dec;
/// assert_eq!(stop_from_entry(dec!(100), dec!(10), Side::Buy, dec!(0.3)), Some(dec!(103)));
/// assert_eq!(stop_from_entry(dec!(100), dec!(10), Side::Sell, dec!(0.3)), Some(dec!(97)));
/// assert_eq!(stop_from_entry(dec!(100), dec!(10), Side::Buy, Decimal::MAX), None);
/// ```
pub fn stop_from_entry(
    entry: Decimal,
    r_value: Decimal,
    side: Side,
    stop_r: Decimal,
) -> Option<Decimal> {
    let offset = stop_r.checked_mul(r_value)?;
    match side {
        Side::Buy => entry.checked_add(offset),
        Side::Sell => entry.checked_sub(offset),
    }
}

/// Check if a stop is hit (position should exit)
///
/// * BUY exits when price is at or below the stop
/// * SELL exits when price is at or above the stop
///
/// # Examples
///
/// ```
/// # use tradeguard_domain::risk::is_stop_hit;
/// # use tradeguard_domain::Side;
/// # use rust_decimal_macros::dec;
/// assert!(is_stop_hit(Side::Buy, dec!(100.5), dec!(100.5)));
/// assert!(!is_stop_hit(Side::Buy, dec!(101), dec!(100.5)));
/// assert!(is_stop_hit(Side::Sell, dec!(99.6), dec!(99.5)));
/// ```
pub fn is_stop_hit(side: Side, price: Decimal, stop: Decimal) -> bool {
    match side {
        Side::Buy => price <= stop,
        Side::Sell => price >= stop,
    }
}

// =============================================================================
// Tests
// =============================================================================
