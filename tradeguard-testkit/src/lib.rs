//! Test helpers for Tradeguard.
//!
//! Provides reference trades, the reference ladder and price paths shared by
//! the engine's unit, integration and property tests.

mod fixtures;

pub use fixtures::{
    long_trade, price_at_r, reference_params, short_trade, trade_with, TEST_SYMBOL,
};

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install a test tracing subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `tradeguard_engine=debug`. Output goes
/// through the test writer so it only shows for failing tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tradeguard_engine=debug"));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer())
            .with(filter)
            .try_init();
    });
}
