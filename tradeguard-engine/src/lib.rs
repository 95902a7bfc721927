//! Tradeguard Engine Layer
//!
//! Pure decision logic, deterministic, no I/O.
//! Takes a trade, its ladder state and a price snapshot → returns the
//! actions to execute together with the next state.
//!
//! # Architecture
//!
//! ```text
//! Price tick → evaluate_trade_management → Evaluation { actions, state, stop }
//!                                               ↓
//!                               ManagementOrder (reduce / update stop) → caller
//! ```
//!
//! # Components
//!
//! - **Evaluator**: the four-rule ladder (TP1, BE, BE+, runner trail)
//! - **ManagedTrade**: single owner of one trade's state, applies evaluations
//! - **Orders**: exchange-facing requests derived from actions
//! - **Config**: ladder parameters loaded from the environment

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod manager;
pub mod orders;

// Re-exports for convenience
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use evaluator::{evaluate_trade_management, Evaluation};
pub use manager::ManagedTrade;
pub use orders::{orders_for, ManagementOrder};
