//! Execution-price evaluation of a matched pair across both directions

use rust_decimal::Decimal;

use super::diff_engine::percent_diff;
use super::orderbook_pricer::weighted_price;
use super::symbol_matcher::MatchedPair;
use crate::types::{
    ArbitrageResult, OrderBook, PricingError, TermStructure, TradeSide, TradingParameters,
    WeightedPriceResult,
};

/// Prices one trade of `params.trade_size_usd` on every leg of the pair and
/// keeps the better direction.
///
/// `Ok(None)` means the pair was filtered: unknown margin price, a leg that
/// could not be filled within `max_slippage_pct`, or no profitable direction.
/// `Err` is reserved for books missing a side entirely and for prices or
/// sizes whose arithmetic does not fit a `Decimal`.
pub fn evaluate(
    pair: &MatchedPair,
    margin_book: &OrderBook,
    swap_book: &OrderBook,
    params: &TradingParameters,
) -> Result<Option<ArbitrageResult>, PricingError> {
    let reference = match pair.margin.reference_price {
        Some(price) if price > Decimal::ZERO => price,
        _ => return Ok(None),
    };
    let overflow = || PricingError::Overflow(pair.base.clone());
    let quantity = params.trade_size_usd.checked_div(reference).ok_or_else(overflow)?;

    let margin_buy = weighted_price(margin_book, TradeSide::Buy, quantity)?;
    let margin_sell = weighted_price(margin_book, TradeSide::Sell, quantity)?;
    let swap_buy = weighted_price(swap_book, TradeSide::Buy, quantity)?;
    let swap_sell = weighted_price(swap_book, TradeSide::Sell, quantity)?;

    let legs = [&margin_buy, &margin_sell, &swap_buy, &swap_sell];
    if legs.iter().any(|leg| !is_executable(leg, params.max_slippage_pct)) {
        return Ok(None);
    }

    let contango_diff = swap_sell.weighted_price - margin_buy.weighted_price;
    let contango_pct = signed_percent(contango_diff, margin_buy.weighted_price, swap_sell.weighted_price)
        .ok_or_else(overflow)?;

    let backwardation_diff = margin_sell.weighted_price - swap_buy.weighted_price;
    let backwardation_pct = signed_percent(backwardation_diff, swap_buy.weighted_price, margin_sell.weighted_price)
        .ok_or_else(overflow)?;

    let (term_structure, actual_diff, pct, margin_leg, swap_leg) =
        if contango_pct > backwardation_pct && contango_pct > Decimal::ZERO {
            (TermStructure::Contango, contango_diff, contango_pct, &margin_buy, &swap_sell)
        } else if backwardation_pct > Decimal::ZERO {
            (TermStructure::Backwardation, backwardation_diff, backwardation_pct, &margin_sell, &swap_buy)
        } else {
            return Ok(None);
        };

    Ok(Some(ArbitrageResult {
        base: pair.base.clone(),
        margin_buy: margin_buy.weighted_price,
        margin_sell: margin_sell.weighted_price,
        swap_buy: swap_buy.weighted_price,
        swap_sell: swap_sell.weighted_price,
        actual_diff,
        percent_diff: pct,
        term_structure,
        margin_liquidity: margin_leg.liquidity,
        swap_liquidity: swap_leg.liquidity,
        margin_slippage_pct: margin_leg.slippage_pct,
        swap_slippage_pct: swap_leg.slippage_pct,
    }))
}

/// Top `top_n` results at or above `min_diff_pct`, largest first, ties by base
pub fn rank(mut results: Vec<ArbitrageResult>, top_n: usize, min_diff_pct: Decimal) -> Vec<ArbitrageResult> {
    results.retain(|r| r.percent_diff >= min_diff_pct);
    results.sort_by(|a, b| {
        b.percent_diff
            .cmp(&a.percent_diff)
            .then_with(|| a.base.cmp(&b.base))
    });
    results.truncate(top_n);
    results
}

fn is_executable(leg: &WeightedPriceResult, max_slippage_pct: Decimal) -> bool {
    leg.has_enough_liquidity && leg.slippage_pct <= max_slippage_pct
}

// percent_diff is unsigned; direction selection needs the sign of the spread
fn signed_percent(diff: Decimal, low_leg: Decimal, high_leg: Decimal) -> Option<Decimal> {
    let pct = percent_diff(low_leg, high_leg)?;
    Some(if diff < Decimal::ZERO { -pct } else { pct })
}
