//! Tradeguard Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains the trade entity, the management ladder configuration and
//! progression state, emitted actions, and the R-multiple risk model.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod actions;
pub mod entities;
pub mod management;
pub mod risk;
pub mod value_objects;

// Re-export commonly used types
pub use actions::{Action, ActionReason};
pub use entities::Trade;
pub use management::{TmParams, TmState};
pub use risk::{is_stop_hit, profit_in_r, risk_r, stop_from_entry};
pub use value_objects::{DomainError, OrderSide, Side, Symbol, TradeId};
