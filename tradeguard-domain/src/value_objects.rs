//! Value Objects for the Tradeguard Domain
//!
//! Immutable domain primitives. Identifiers are validated at construction;
//! prices are plain `Decimal` values because the rule ladder accepts any
//! price snapshot without bounds checks.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object and entity validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Symbol must be a non-empty instrument identifier
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Trade identifier must be non-empty
    #[error("Invalid trade id: {0}")]
    InvalidTradeId(String),

    /// Quantity must be positive
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Initial stop does not define a positive risk unit
    #[error("Invalid risk: {0}")]
    InvalidRisk(String),

    /// Trade management parameters are out of range
    #[error("Invalid management params: {0}")]
    InvalidParams(String),
}

// =============================================================================
// TradeId
// =============================================================================

/// Opaque identifier of one managed trade
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradeId(String);

impl TradeId {
    /// Create a new TradeId
    ///
    /// # Errors
    /// Returns `DomainError::InvalidTradeId` if the value is empty
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidTradeId("Trade id must be non-empty".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TradeId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TradeId> for String {
    fn from(value: TradeId) -> Self {
        value.0
    }
}

// =============================================================================
// Symbol
// =============================================================================

/// Symbol identifies the traded instrument (e.g., BTCUSDT, EURUSD, TEST)
///
/// The management ladder never interprets the symbol; it is carried through
/// to actions and exchange requests as-is.
///
/// # Examples
/// ```
/// # use tradeguard_domain::value_objects::Symbol;
/// let symbol = Symbol::new("BTCUSDT").unwrap();
/// assert_eq!(symbol.as_str(), "BTCUSDT");
/// assert!(Symbol::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol
    ///
    /// # Errors
    /// Returns `DomainError::InvalidSymbol` if the value is empty
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidSymbol("Symbol must be non-empty".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

// =============================================================================
// Side
// =============================================================================

/// Side represents the trade direction
///
/// Determines the sign convention of every price-distance calculation.
/// Deserializes from `"buy"`/`"sell"` as well as `"long"`/`"short"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Long position (profits when price rises)
    #[serde(alias = "long")]
    Buy,
    /// Short position (profits when price falls)
    #[serde(alias = "short")]
    Sell,
}

impl Side {
    /// Direction of favorable price movement
    ///
    /// Buy → +1, Sell → -1
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => Decimal::NEGATIVE_ONE,
        }
    }

    /// Get the entry action for this side
    ///
    /// Buy → Buy, Sell → Sell
    pub fn entry_action(&self) -> OrderSide {
        match self {
            Side::Buy => OrderSide::Buy,
            Side::Sell => OrderSide::Sell,
        }
    }

    /// Get the exit action for this side
    ///
    /// Buy → Sell, Sell → Buy
    pub fn exit_action(&self) -> OrderSide {
        match self {
            Side::Buy => OrderSide::Sell,
            Side::Sell => OrderSide::Buy,
        }
    }

    /// Whether `candidate` is strictly tighter than `current` for this side
    ///
    /// A tighter stop locks in more profit: higher for longs, lower for shorts.
    pub fn is_tighter(&self, candidate: Decimal, current: Decimal) -> bool {
        match self {
            Side::Buy => candidate > current,
            Side::Sell => candidate < current,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// OrderSide represents the direction of an order sent to an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
