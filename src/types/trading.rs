//! Trading-side types shared by the arbitrage engine and the report layer

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::market_data::FundingSnapshot;

/// Taker side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn to_api_string(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_api_string())
    }
}

/// Relationship between the derivative and the margin price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermStructure {
    /// Derivative above margin: buy margin, sell derivative
    Contango,
    /// Margin above derivative: sell (borrowed) margin, buy derivative
    Backwardation,
}

impl TermStructure {
    pub fn is_contango(&self) -> bool {
        matches!(self, TermStructure::Contango)
    }
}

impl fmt::Display for TermStructure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TermStructure::Contango => write!(f, "Contango"),
            TermStructure::Backwardation => write!(f, "Backwardation"),
        }
    }
}

/// Sizing and filtering inputs for execution-price evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingParameters {
    /// Notional per trade in quote currency
    pub trade_size_usd: Decimal,
    pub min_liquidity_usd: Decimal,
    /// Upper bound on per-leg slippage, in percent
    pub max_slippage_pct: Decimal,
    pub order_book_depth: usize,
}

impl Default for TradingParameters {
    fn default() -> Self {
        Self {
            trade_size_usd: Decimal::new(1000, 0),
            min_liquidity_usd: Decimal::new(10000, 0),
            max_slippage_pct: Decimal::new(5, 1),
            order_book_depth: 20,
        }
    }
}

/// Outcome of walking one side of a book for a given size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPriceResult {
    pub inst_id: String,
    pub side: TradeSide,
    pub requested_size: Decimal,
    /// Zero when the book could not fill the requested size
    pub weighted_price: Decimal,
    pub total_cost: Decimal,
    pub liquidity: Decimal,
    pub has_enough_liquidity: bool,
    pub slippage_pct: Decimal,
}

/// Reference-price divergence for one matched pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub base: String,
    pub margin_price: Decimal,
    pub swap_price: Decimal,
    /// swap - margin
    pub actual_diff: Decimal,
    pub percent_diff: Decimal,
    pub term_structure: TermStructure,
}

/// Execution-price opportunity for one matched pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageResult {
    pub base: String,
    pub margin_buy: Decimal,
    pub margin_sell: Decimal,
    pub swap_buy: Decimal,
    pub swap_sell: Decimal,
    pub actual_diff: Decimal,
    pub percent_diff: Decimal,
    pub term_structure: TermStructure,
    pub margin_liquidity: Decimal,
    pub swap_liquidity: Decimal,
    pub margin_slippage_pct: Decimal,
    pub swap_slippage_pct: Decimal,
}

impl ArbitrageResult {
    pub fn avg_slippage_pct(&self) -> Decimal {
        (self.margin_slippage_pct + self.swap_slippage_pct) / Decimal::TWO
    }
}

/// Result row produced by either scan mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Signal {
    ReferencePrice(DiffResult),
    ExecutionPrice(ArbitrageResult),
}

impl Signal {
    pub fn base(&self) -> &str {
        match self {
            Signal::ReferencePrice(d) => &d.base,
            Signal::ExecutionPrice(a) => &a.base,
        }
    }

    pub fn percent_diff(&self) -> Decimal {
        match self {
            Signal::ReferencePrice(d) => d.percent_diff,
            Signal::ExecutionPrice(a) => a.percent_diff,
        }
    }

    pub fn term_structure(&self) -> TermStructure {
        match self {
            Signal::ReferencePrice(d) => d.term_structure,
            Signal::ExecutionPrice(a) => a.term_structure,
        }
    }
}

/// Final output row: signal plus fee and funding context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub signal: Signal,
    pub funding: FundingSnapshot,
    pub fee_fraction: Decimal,
    pub actual_profit_pct: Decimal,
}
