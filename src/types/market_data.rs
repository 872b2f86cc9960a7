// src/types/market_data.rs - market data value types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::exchange::{InstrumentState, VenueType};
use super::trading::TradeSide;

/// Upstream attributes without a typed field, kept only for passthrough
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Tradable instrument on one venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub inst_id: String,
    pub venue: VenueType,
    pub base_ccy: String,
    pub quote_ccy: String,
    pub state: InstrumentState,
    /// Mark price, when the listing or a fused snapshot carried one
    pub reference_price: Option<Decimal>,
    pub leverage: Option<Decimal>,
    pub lot_size: Option<Decimal>,
    pub tick_size: Option<Decimal>,
    pub min_size: Option<Decimal>,
    pub max_size: Option<Decimal>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Attributes,
}

impl Instrument {
    /// Bare instrument with only identity fields set
    pub fn new(inst_id: &str, venue: VenueType) -> Self {
        Self {
            inst_id: inst_id.to_string(),
            venue,
            base_ccy: String::new(),
            quote_ccy: String::new(),
            state: InstrumentState::Live,
            reference_price: None,
            leverage: None,
            lot_size: None,
            tick_size: None,
            min_size: None,
            max_size: None,
            extra: Attributes::new(),
        }
    }

    pub fn with_reference_price(mut self, price: Decimal) -> Self {
        self.reference_price = Some(price);
        self
    }
}

/// Published reference (mark) price for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePrice {
    pub inst_id: String,
    pub price: Option<Decimal>,
    pub timestamp_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Attributes,
}

/// Reference prices for one venue, keyed by instrument id
pub type PriceSnapshot = HashMap<String, ReferencePrice>;

/// Per-currency hourly borrow rates
pub type BorrowRates = HashMap<String, Decimal>;

/// Single price level of an order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: Decimal,
    pub size: Decimal,
    pub orders: u32,
}

impl OrderBookLevel {
    pub fn new(price: Decimal, size: Decimal, orders: u32) -> Self {
        Self { price, size, orders }
    }

    pub fn notional(&self) -> Decimal {
        self.price * self.size
    }
}

/// Order book snapshot.
///
/// Bids are kept best (highest) first and asks best (lowest) first. Levels
/// with a non-positive price or size never make it into the book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBook {
    pub inst_id: String,
    bids: Vec<OrderBookLevel>,
    asks: Vec<OrderBookLevel>,
    pub timestamp_ms: i64,
}

impl OrderBook {
    pub fn new(
        inst_id: &str,
        bids: Vec<OrderBookLevel>,
        asks: Vec<OrderBookLevel>,
        timestamp_ms: i64,
    ) -> Self {
        let mut bids: Vec<OrderBookLevel> = bids.into_iter().filter(is_positive_level).collect();
        let mut asks: Vec<OrderBookLevel> = asks.into_iter().filter(is_positive_level).collect();

        // stable sorts keep venue order between equal prices
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));

        Self {
            inst_id: inst_id.to_string(),
            bids,
            asks,
            timestamp_ms,
        }
    }

    pub fn bids(&self) -> &[OrderBookLevel] {
        &self.bids
    }

    pub fn asks(&self) -> &[OrderBookLevel] {
        &self.asks
    }

    /// Levels a taker on `side` consumes: asks for buys, bids for sells
    pub fn levels_for(&self, side: TradeSide) -> &[OrderBookLevel] {
        match side {
            TradeSide::Buy => &self.asks,
            TradeSide::Sell => &self.bids,
        }
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

fn is_positive_level(level: &OrderBookLevel) -> bool {
    level.price > Decimal::ZERO && level.size > Decimal::ZERO
}

/// Funding data as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingQuote {
    pub inst_id: String,
    pub rate: Decimal,
    /// Unix milliseconds of the next funding event
    pub next_funding_time_ms: i64,
}

/// Funding rate together with the time left until it is charged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingSnapshot {
    pub rate: Decimal,
    pub time_to_funding_ms: i64,
}

impl FundingSnapshot {
    /// Used when the funding fetch failed
    pub fn zero() -> Self {
        Self {
            rate: Decimal::ZERO,
            time_to_funding_ms: 0,
        }
    }

    pub fn from_quote(quote: &FundingQuote, now: DateTime<Utc>) -> Self {
        Self {
            rate: quote.rate,
            time_to_funding_ms: quote.next_funding_time_ms - now.timestamp_millis(),
        }
    }

    pub fn time_to_funding(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.time_to_funding_ms)
    }
}

impl Default for FundingSnapshot {
    fn default() -> Self {
        Self::zero()
    }
}

/// Taker fees and default borrow cost, all as fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub spot_taker: Decimal,
    pub swap_taker: Decimal,
    /// Hourly borrow rate used when no per-asset rate is known
    pub margin_borrow_hourly: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            spot_taker: Decimal::new(1, 3),           // 0.1%
            swap_taker: Decimal::new(5, 4),           // 0.05%
            margin_borrow_hourly: Decimal::new(2, 4), // 0.02% per hour
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn level(price: Decimal, size: Decimal) -> OrderBookLevel {
        OrderBookLevel::new(price, size, 1)
    }

    #[test]
    fn test_order_book_sorts_sides_best_first() {
        let book = OrderBook::new(
            "BTC-USDT",
            vec![level(dec!(99), dec!(1)), level(dec!(100), dec!(2)), level(dec!(98), dec!(1))],
            vec![level(dec!(103), dec!(1)), level(dec!(101), dec!(1)), level(dec!(102), dec!(5))],
            0,
        );

        let bid_prices: Vec<Decimal> = book.bids().iter().map(|l| l.price).collect();
        let ask_prices: Vec<Decimal> = book.asks().iter().map(|l| l.price).collect();
        assert_eq!(bid_prices, vec![dec!(100), dec!(99), dec!(98)]);
        assert_eq!(ask_prices, vec![dec!(101), dec!(102), dec!(103)]);
        assert_eq!(book.best_bid(), Some(dec!(100)));
        assert_eq!(book.best_ask(), Some(dec!(101)));
    }

    #[test]
    fn test_order_book_drops_non_positive_levels() {
        let book = OrderBook::new(
            "ETH-USDT",
            vec![level(dec!(0), dec!(1)), level(dec!(10), dec!(0)), level(dec!(9), dec!(1))],
            vec![level(dec!(-1), dec!(1))],
            0,
        );

        assert_eq!(book.bids().len(), 1);
        assert!(book.asks().is_empty());
        assert!(!book.is_empty());
    }

    #[test]
    fn test_levels_for_side() {
        let book = OrderBook::new(
            "BTC-USDT",
            vec![level(dec!(99), dec!(1))],
            vec![level(dec!(101), dec!(1))],
            0,
        );
        assert_eq!(book.levels_for(TradeSide::Buy)[0].price, dec!(101));
        assert_eq!(book.levels_for(TradeSide::Sell)[0].price, dec!(99));
    }

    #[test]
    fn test_funding_snapshot_from_quote() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let quote = FundingQuote {
            inst_id: "BTC-USDT-SWAP".to_string(),
            rate: dec!(0.0001),
            next_funding_time_ms: 1_700_000_000_000 + 90 * 60 * 1000,
        };

        let snapshot = FundingSnapshot::from_quote(&quote, now);
        assert_eq!(snapshot.rate, dec!(0.0001));
        assert_eq!(snapshot.time_to_funding(), chrono::Duration::minutes(90));
        assert_eq!(FundingSnapshot::zero().time_to_funding(), chrono::Duration::zero());
    }
}
