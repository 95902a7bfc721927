//! Domain Entities for Tradeguard
//!
//! A `Trade` is one open position under management. Its entry, side and
//! initial stop are fixed when the position opens; only the live stop moves.

use crate::risk::{profit_in_r, risk_r};
use crate::value_objects::{DomainError, Side, Symbol, TradeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Trade
// =============================================================================

/// Trade represents one open position governed by the management ladder
///
/// Key concepts:
/// - `initial_stop` is the sole anchor for R and never changes after creation
/// - `current_stop` is `None` until the stop is first moved
/// - `size` is informational; partial closes are executed by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    id: TradeId,
    symbol: Symbol,
    side: Side,
    entry: Decimal,
    initial_stop: Decimal,
    size: Decimal,
    current_stop: Option<Decimal>,
}

impl Trade {
    /// Create a trade without validating its risk setup
    ///
    /// A stop on the wrong side of entry is accepted here; the evaluator
    /// treats such a trade as degenerate and emits no actions.
    pub fn new(
        id: TradeId,
        symbol: Symbol,
        side: Side,
        entry: Decimal,
        initial_stop: Decimal,
        size: Decimal,
    ) -> Self {
        Self {
            id,
            symbol,
            side,
            entry,
            initial_stop,
            size,
            current_stop: None,
        }
    }

    /// Create a trade with side-aware validation
    ///
    /// # Errors
    ///
    /// * `DomainError::InvalidQuantity` if size <= 0
    /// * `DomainError::InvalidRisk` if the initial stop does not sit on the
    ///   losing side of entry (BUY: below, SELL: above)
    ///
    /// # Examples
    ///
    /// ```
    /// # use tradeguard_domain::{Trade, TradeId, Symbol, Side};
    /// # use rust_decimal_macros::dec;
    /// let ok = Trade::new_validated(
    ///     TradeId::new("t1").unwrap(),
    ///     Symbol::new("TEST").unwrap(),
    ///     Side::Buy,
    ///     dec!(100),
    ///     dec!(90),
    ///     dec!(1),
    /// );
    /// assert!(ok.is_ok());
    ///
    /// let bad = Trade::new_validated(
    ///     TradeId::new("t2").unwrap(),
    ///     Symbol::new("TEST").unwrap(),
    ///     Side::Buy,
    ///     dec!(100),
    ///     dec!(110),
    ///     dec!(1),
    /// );
    /// assert!(bad.is_err());
    /// ```
    pub fn new_validated(
        id: TradeId,
        symbol: Symbol,
        side: Side,
        entry: Decimal,
        initial_stop: Decimal,
        size: Decimal,
    ) -> Result<Self, DomainError> {
        let trade = Self::new(id, symbol, side, entry, initial_stop, size);
        trade.validate()?;
        Ok(trade)
    }

    /// Validate size and risk setup
    ///
    /// # Errors
    /// See [`Trade::new_validated`].
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.size <= Decimal::ZERO {
            return Err(DomainError::InvalidQuantity("Trade size must be positive".to_string()));
        }

        if self.risk_r() <= Decimal::ZERO {
            let msg = match self.side {
                Side::Buy => "BUY trade requires initial stop below entry",
                Side::Sell => "SELL trade requires initial stop above entry",
            };
            return Err(DomainError::InvalidRisk(format!(
                "{} (entry {}, stop {})",
                msg, self.entry, self.initial_stop
            )));
        }

        Ok(())
    }

    /// Set the live stop before management starts (e.g. restored from storage)
    pub fn with_current_stop(mut self, stop: Decimal) -> Self {
        self.current_stop = Some(stop);
        self
    }

    /// Overwrite the live stop
    pub fn set_current_stop(&mut self, stop: Option<Decimal>) {
        self.current_stop = stop;
    }

    /// Trade identifier
    pub fn id(&self) -> &TradeId {
        &self.id
    }

    /// Instrument symbol
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Trade direction
    pub fn side(&self) -> Side {
        self.side
    }

    /// Entry fill price
    pub fn entry(&self) -> Decimal {
        self.entry
    }

    /// Original stop-loss price
    pub fn initial_stop(&self) -> Decimal {
        self.initial_stop
    }

    /// Position size
    pub fn size(&self) -> Decimal {
        self.size
    }

    /// Live stop, if it has ever been moved
    pub fn current_stop(&self) -> Option<Decimal> {
        self.current_stop
    }

    /// Stop currently protecting the position
    ///
    /// Returns the live stop if set, otherwise the initial stop.
    pub fn effective_stop(&self) -> Decimal {
        self.current_stop.unwrap_or(self.initial_stop)
    }

    /// One unit of initial risk (1R) in price units
    pub fn risk_r(&self) -> Decimal {
        risk_r(self.entry, self.initial_stop, self.side)
    }

    /// Unrealized profit at `price` in multiples of the initial risk
    pub fn profit_in_r(&self, price: Decimal) -> Decimal {
        profit_in_r(self.entry, self.initial_stop, self.side, price)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trade(side: Side, entry: Decimal, stop: Decimal) -> Trade {
        Trade::new(
            TradeId::new("t1").unwrap(),
            Symbol::new("TEST").unwrap(),
            side,
            entry,
            stop,
            dec!(1),
        )
    }

    #[test]
    fn test_new_trade_has_no_current_stop() {
        let t = trade(Side::Buy, dec!(100), dec!(90));
        assert_eq!(t.current_stop(), None);
        assert_eq!(t.effective_stop(), dec!(90));
        assert_eq!(t.risk_r(), dec!(10));
    }

    #[test]
    fn test_effective_stop_prefers_current_stop() {
        let t = trade(Side::Buy, dec!(100), dec!(90)).with_current_stop(dec!(100.5));
        assert_eq!(t.effective_stop(), dec!(100.5));
        assert_eq!(t.initial_stop(), dec!(90));
    }

    #[test]
    fn test_profit_in_r_uses_initial_stop_only() {
        let mut t = trade(Side::Buy, dec!(100), dec!(90));
        t.set_current_stop(Some(dec!(103)));

        // R stays anchored to 90 even though the live stop moved
        assert_eq!(t.profit_in_r(dec!(115)), dec!(1.5));
    }

    #[test]
    fn test_validate_rejects_wrong_side_stop() {
        let long = trade(Side::Buy, dec!(100), dec!(110));
        assert!(matches!(long.validate(), Err(DomainError::InvalidRisk(_))));

        let short = trade(Side::Sell, dec!(100), dec!(90));
        assert!(matches!(short.validate(), Err(DomainError::InvalidRisk(_))));

        let flat = trade(Side::Buy, dec!(100), dec!(100));
        assert!(matches!(flat.validate(), Err(DomainError::InvalidRisk(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_size() {
        let result = Trade::new_validated(
            TradeId::new("t1").unwrap(),
            Symbol::new("TEST").unwrap(),
            Side::Buy,
            dec!(100),
            dec!(90),
            dec!(0),
        );
        assert!(matches!(result, Err(DomainError::InvalidQuantity(_))));
    }

    #[test]
    fn test_trade_serde_round_trip() -> anyhow::Result<()> {
        let t = trade(Side::Sell, dec!(100), dec!(110)).with_current_stop(dec!(99.5));

        let json = serde_json::to_string(&t)?;
        let parsed: Trade = serde_json::from_str(&json)?;

        assert_eq!(parsed, t);
        assert_eq!(parsed.side(), Side::Sell);
        Ok(())
    }

    #[test]
    fn test_trade_with_empty_identifiers_is_rejected_on_deserialize() {
        let json = |id: &str, symbol: &str| {
            format!(
                r#"{{"id":"{}","symbol":"{}","side":"buy","entry":"100","initial_stop":"90","size":"1"}}"#,
                id, symbol
            )
        };

        assert!(serde_json::from_str::<Trade>(&json("t1", "TEST")).is_ok());

        let err = serde_json::from_str::<Trade>(&json("", "TEST")).unwrap_err();
        assert!(err.to_string().contains("Invalid trade id"));

        let err = serde_json::from_str::<Trade>(&json("t1", "")).unwrap_err();
        assert!(err.to_string().contains("Invalid symbol"));
    }
}
