//! Round-trip fee estimate and the profitability floor

use rust_decimal::Decimal;

use crate::types::{BorrowRates, FeeSchedule, TermStructure};

/// Rows whose profit after fees falls below this (in percent) are not reported
pub const DEFAULT_MIN_ACTUAL_PROFIT_PCT: Decimal = Decimal::from_parts(6, 0, 0, false, 2);

/// Fee fraction for opening and closing both legs.
///
/// Backwardation borrows the margin asset for the short leg, so one hour of
/// borrow interest is added on top of the taker fees.
pub fn estimate_fee(
    base: &str,
    term_structure: TermStructure,
    fees: &FeeSchedule,
    borrow_rates: &BorrowRates,
) -> Decimal {
    let mut total = Decimal::TWO * fees.spot_taker + Decimal::TWO * fees.swap_taker;

    if !term_structure.is_contango() {
        let hourly = borrow_rates
            .get(base)
            .copied()
            .filter(|rate| *rate > Decimal::ZERO)
            .unwrap_or(fees.margin_borrow_hourly);
        total += hourly;
    }

    total
}

/// Percent spread left after paying `fee_fraction`
pub fn actual_profit_pct(percent_diff: Decimal, fee_fraction: Decimal) -> Decimal {
    percent_diff - fee_fraction * Decimal::ONE_HUNDRED
}

pub fn passes_profit_floor(actual_profit_pct: Decimal, floor: Decimal) -> bool {
    actual_profit_pct >= floor
}
