//! Engine configuration.
//!
//! Loads the management ladder from environment variables with defaults
//! taken from [`TmParams::default`].
//!
//! # Environment Variables
//!
//! - `TRADEGUARD_TP1_R` (default: 1.0)
//! - `TRADEGUARD_TP1_CLOSE_PCT` (default: 0.5)
//! - `TRADEGUARD_BE_OFFSET_R` (default: 0.05)
//! - `TRADEGUARD_BE_PLUS_R` (default: 1.5)
//! - `TRADEGUARD_BE_PLUS_STOP_R` (default: 0.3)
//! - `TRADEGUARD_RUNNER_TRAIL_START_R` (default: 2.0)
//! - `TRADEGUARD_RUNNER_TRAIL_STEP_R` (default: 0.5)
//! - `TRADEGUARD_RUNNER_TRAIL_LOCK_R` (default: 1.0)

use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use tracing::info;
use tradeguard_domain::TmParams;

use crate::error::{EngineError, EngineResult};

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Ladder applied to every managed trade
    pub params: TmParams,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> EngineResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// * `EngineError::Config` if a value is not a decimal number
    /// * `EngineError::Domain` if the resulting params fail validation
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TmParams::default();

        let params = TmParams {
            tp1_r: Self::load_decimal(&lookup, "TRADEGUARD_TP1_R", defaults.tp1_r)?,
            tp1_close_pct: Self::load_decimal(
                &lookup,
                "TRADEGUARD_TP1_CLOSE_PCT",
                defaults.tp1_close_pct,
            )?,
            be_offset_r: Self::load_decimal(&lookup, "TRADEGUARD_BE_OFFSET_R", defaults.be_offset_r)?,
            be_plus_r: Self::load_decimal(&lookup, "TRADEGUARD_BE_PLUS_R", defaults.be_plus_r)?,
            be_plus_stop_r: Self::load_decimal(
                &lookup,
                "TRADEGUARD_BE_PLUS_STOP_R",
                defaults.be_plus_stop_r,
            )?,
            runner_trail_start_r: Self::load_decimal(
                &lookup,
                "TRADEGUARD_RUNNER_TRAIL_START_R",
                defaults.runner_trail_start_r,
            )?,
            runner_trail_step_r: Self::load_decimal(
                &lookup,
                "TRADEGUARD_RUNNER_TRAIL_STEP_R",
                defaults.runner_trail_step_r,
            )?,
            runner_trail_lock_r: Self::load_decimal(
                &lookup,
                "TRADEGUARD_RUNNER_TRAIL_LOCK_R",
                defaults.runner_trail_lock_r,
            )?,
        };

        params.validate()?;

        info!(params = %params, "Trade management config loaded");

        Ok(Self { params })
    }

    fn load_decimal<F>(lookup: &F, key: &str, default: Decimal) -> EngineResult<Decimal>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(key) {
            Some(val) => Decimal::from_str(val.trim())
                .map_err(|_| EngineError::Config(format!("Invalid {} value: {}", key, val))),
            None => Ok(default),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
