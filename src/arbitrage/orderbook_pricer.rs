//! Size-weighted execution price from order book depth

use rust_decimal::Decimal;

use crate::types::{OrderBook, PricingError, TradeSide, WeightedPriceResult};

/// Walks the side of `book` a taker on `side` would consume until
/// `requested_size` (base units) is filled.
///
/// A book too thin to fill the whole size reports `has_enough_liquidity =
/// false` with a zero weighted price; a partial price is never reported.
pub fn weighted_price(
    book: &OrderBook,
    side: TradeSide,
    requested_size: Decimal,
) -> Result<WeightedPriceResult, PricingError> {
    if requested_size < Decimal::ZERO {
        return Err(PricingError::InvalidSize(requested_size.to_string()));
    }

    let levels = book.levels_for(side);
    let best_price = levels
        .first()
        .map(|l| l.price)
        .ok_or_else(|| PricingError::NoLiquidity {
            inst_id: book.inst_id.clone(),
            side,
        })?;

    if requested_size.is_zero() {
        return Ok(WeightedPriceResult {
            inst_id: book.inst_id.clone(),
            side,
            requested_size,
            weighted_price: best_price,
            total_cost: Decimal::ZERO,
            liquidity: Decimal::ZERO,
            has_enough_liquidity: true,
            slippage_pct: Decimal::ZERO,
        });
    }

    let overflow = || PricingError::Overflow(book.inst_id.clone());

    let mut remaining = requested_size;
    let mut total_cost = Decimal::ZERO;

    for level in levels {
        if remaining <= Decimal::ZERO {
            break;
        }
        let filled = remaining.min(level.size);
        let notional = filled.checked_mul(level.price).ok_or_else(overflow)?;
        total_cost = total_cost.checked_add(notional).ok_or_else(overflow)?;
        remaining -= filled;
    }

    if remaining > Decimal::ZERO {
        return Ok(WeightedPriceResult {
            inst_id: book.inst_id.clone(),
            side,
            requested_size,
            weighted_price: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            liquidity: total_cost,
            has_enough_liquidity: false,
            slippage_pct: Decimal::ZERO,
        });
    }

    let weighted_price = total_cost.checked_div(requested_size).ok_or_else(overflow)?;
    // positive slippage is always the worse direction for the taker
    let price_move = match side {
        TradeSide::Buy => weighted_price - best_price,
        TradeSide::Sell => best_price - weighted_price,
    };
    let slippage_pct = price_move
        .checked_div(best_price)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(overflow)?;

    Ok(WeightedPriceResult {
        inst_id: book.inst_id.clone(),
        side,
        requested_size,
        weighted_price,
        total_cost,
        liquidity: total_cost,
        has_enough_liquidity: true,
        slippage_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderBookLevel;
    use rust_decimal_macros::dec;

    fn book(bids: &[(Decimal, Decimal)], asks: &[(Decimal, Decimal)]) -> OrderBook {
        let to_levels = |side: &[(Decimal, Decimal)]| {
            side.iter()
                .map(|&(price, size)| OrderBookLevel::new(price, size, 1))
                .collect::<Vec<_>>()
        };
        OrderBook::new("BTC-USDT", to_levels(bids), to_levels(asks), 1_700_000_000_000)
    }

    #[test]
    fn test_buy_walks_two_ask_levels() {
        let book = book(&[], &[(dec!(100), dec!(1)), (dec!(101), dec!(2))]);

        let result = weighted_price(&book, TradeSide::Buy, dec!(2)).unwrap();

        assert!(result.has_enough_liquidity);
        assert_eq!(result.total_cost, dec!(201));
        assert_eq!(result.weighted_price, dec!(100.5));
        assert_eq!(result.liquidity, dec!(201));
        assert_eq!(result.slippage_pct, dec!(0.5));
    }

    #[test]
    fn test_sell_walks_bids_with_positive_slippage() {
        let book = book(&[(dec!(100), dec!(1)), (dec!(98), dec!(1))], &[]);

        let result = weighted_price(&book, TradeSide::Sell, dec!(2)).unwrap();

        assert!(result.has_enough_liquidity);
        assert_eq!(result.weighted_price, dec!(99));
        assert_eq!(result.slippage_pct, dec!(1));
    }

    #[test]
    fn test_fill_within_best_level_has_no_slippage() {
        let book = book(&[], &[(dec!(100), dec!(10)), (dec!(150), dec!(10))]);

        let result = weighted_price(&book, TradeSide::Buy, dec!(3)).unwrap();

        assert_eq!(result.weighted_price, dec!(100));
        assert_eq!(result.total_cost, dec!(300));
        assert_eq!(result.slippage_pct, Decimal::ZERO);
    }

    #[test]
    fn test_insufficient_depth_reports_zero_price() {
        let book = book(&[], &[(dec!(100), dec!(1))]);

        let result = weighted_price(&book, TradeSide::Buy, dec!(5)).unwrap();

        assert!(!result.has_enough_liquidity);
        assert_eq!(result.weighted_price, Decimal::ZERO);
        assert_eq!(result.liquidity, dec!(100));
    }

    #[test]
    fn test_zero_size_returns_best_price() {
        let book = book(&[(dec!(99), dec!(1))], &[(dec!(101), dec!(1))]);

        let buy = weighted_price(&book, TradeSide::Buy, Decimal::ZERO).unwrap();
        assert_eq!(buy.weighted_price, dec!(101));
        assert_eq!(buy.slippage_pct, Decimal::ZERO);
        assert_eq!(buy.liquidity, Decimal::ZERO);

        let sell = weighted_price(&book, TradeSide::Sell, Decimal::ZERO).unwrap();
        assert_eq!(sell.weighted_price, dec!(99));
    }

    #[test]
    fn test_empty_side_is_an_error() {
        let book = book(&[(dec!(99), dec!(1))], &[]);

        let err = weighted_price(&book, TradeSide::Buy, dec!(1)).unwrap_err();
        assert_eq!(
            err,
            PricingError::NoLiquidity {
                inst_id: "BTC-USDT".to_string(),
                side: TradeSide::Buy,
            }
        );
        assert!(weighted_price(&book, TradeSide::Sell, dec!(1)).is_ok());
    }

    #[test]
    fn test_unrepresentable_cost_is_an_error() {
        let book = book(&[], &[(Decimal::MAX, Decimal::MAX)]);

        assert_eq!(
            weighted_price(&book, TradeSide::Buy, dec!(2)),
            Err(PricingError::Overflow("BTC-USDT".to_string()))
        );
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let book = book(&[(dec!(99), dec!(1))], &[(dec!(101), dec!(1))]);
        assert!(matches!(
            weighted_price(&book, TradeSide::Buy, dec!(-1)),
            Err(PricingError::InvalidSize(_))
        ));
    }
}
