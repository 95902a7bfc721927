//! Trade and ladder fixtures.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tradeguard_domain::{Side, Symbol, TmParams, Trade, TradeId};

/// Symbol used by every fixture trade
pub const TEST_SYMBOL: &str = "TEST";

/// Reference ladder: TP1 at 1R closing 50%, BE +0.05R, BE+ at 1.5R to
/// +0.3R, trail from 2R every 0.5R locking 1R.
pub fn reference_params() -> TmParams {
    TmParams {
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

/// Long trade: entry 100, stop 90 (R = 10), size 1
pub fn long_trade() -> Trade {
    trade_with("t1", Side::Buy, dec!(100), dec!(90))
}

/// Short trade: entry 100, stop 110 (R = 10), size 1
pub fn short_trade() -> Trade {
    trade_with("t2", Side::Sell, dec!(100), dec!(110))
}

/// Arbitrary unvalidated trade of size 1 on [`TEST_SYMBOL`]
///
/// # Panics
/// Panics if `id` is empty.
pub fn trade_with(id: &str, side: Side, entry: Decimal, initial_stop: Decimal) -> Trade {
    Trade::new(
        TradeId::new(id).expect("fixture trade id"),
        Symbol::new(TEST_SYMBOL).expect("fixture symbol"),
        side,
        entry,
        initial_stop,
        dec!(1),
    )
}

/// Price at which `trade` shows `profit_r` of open profit
pub fn price_at_r(trade: &Trade, profit_r: Decimal) -> Decimal {
    trade.entry() + trade.side().sign() * profit_r * trade.risk_r()
}
