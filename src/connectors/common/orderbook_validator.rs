//! Order book sanity checks
//! Run on every fetched book before it is priced

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::OrderBook;

/// Order book validator
#[derive(Debug, Clone, Default)]
pub struct OrderbookValidator {
    config: OrderbookValidatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderbookValidatorConfig {
    /// Spread (percent of mid) above which a warning is raised
    pub max_spread_pct: Decimal,
    /// Fewer levels than this on either side raises a warning
    pub min_levels: usize,
}

impl Default for OrderbookValidatorConfig {
    fn default() -> Self {
        Self {
            max_spread_pct: Decimal::new(5, 0),
            min_levels: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub orderbook_stats: OrderbookStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    pub error_type: ValidationErrorType,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub warning_type: ValidationWarningType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorType {
    /// Neither side has a level
    EmptyOrderbook,
    /// Best bid at or above best ask
    CrossedBook,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationWarningType {
    LargeSpread,
    FewLevels,
    OneSided,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderbookStats {
    pub bid_levels: usize,
    pub ask_levels: usize,
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub mid_price: Option<Decimal>,
    pub spread_pct: Option<Decimal>,
    /// Quote-currency value resting on each side
    pub bid_notional: Decimal,
    pub ask_notional: Decimal,
}

impl OrderbookValidator {
    pub fn new(config: OrderbookValidatorConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(OrderbookValidatorConfig::default())
    }

    pub fn validate_orderbook(&self, orderbook: &OrderBook) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let stats = Self::calculate_orderbook_stats(orderbook);

        if orderbook.is_empty() {
            errors.push(ValidationError {
                error_type: ValidationErrorType::EmptyOrderbook,
                message: format!("{}: order book is empty", orderbook.inst_id),
            });
        } else {
            self.check_levels(orderbook, &stats, &mut warnings);
            self.check_spread(orderbook, &stats, &mut errors, &mut warnings);
        }

        let is_valid = errors.is_empty();
        debug!(
            "[OrderbookValidator] {}: valid={}, errors={}, warnings={}",
            orderbook.inst_id,
            is_valid,
            errors.len(),
            warnings.len()
        );

        ValidationResult {
            is_valid,
            errors,
            warnings,
            orderbook_stats: stats,
        }
    }

    fn check_levels(&self, orderbook: &OrderBook, stats: &OrderbookStats, warnings: &mut Vec<ValidationWarning>) {
        if stats.bid_levels == 0 || stats.ask_levels == 0 {
            warnings.push(ValidationWarning {
                warning_type: ValidationWarningType::OneSided,
                message: format!(
                    "{}: one-sided book (bids={}, asks={})",
                    orderbook.inst_id, stats.bid_levels, stats.ask_levels
                ),
            });
        } else if stats.bid_levels < self.config.min_levels || stats.ask_levels < self.config.min_levels {
            warnings.push(ValidationWarning {
                warning_type: ValidationWarningType::FewLevels,
                message: format!(
                    "{}: few levels (bids={}, asks={})",
                    orderbook.inst_id, stats.bid_levels, stats.ask_levels
                ),
            });
        }
    }

    fn check_spread(
        &self,
        orderbook: &OrderBook,
        stats: &OrderbookStats,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        let (Some(bid), Some(ask)) = (stats.best_bid, stats.best_ask) else {
            return;
        };

        if bid >= ask {
            errors.push(ValidationError {
                error_type: ValidationErrorType::CrossedBook,
                message: format!("{}: best bid {} >= best ask {}", orderbook.inst_id, bid, ask),
            });
            return;
        }

        if let Some(spread_pct) = stats.spread_pct {
            if spread_pct > self.config.max_spread_pct {
                warnings.push(ValidationWarning {
                    warning_type: ValidationWarningType::LargeSpread,
                    message: format!("{}: spread {:.4}%", orderbook.inst_id, spread_pct),
                });
            }
        }
    }

    fn calculate_orderbook_stats(orderbook: &OrderBook) -> OrderbookStats {
        let best_bid = orderbook.best_bid();
        let best_ask = orderbook.best_ask();

        let mid_price = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        };

        let spread_pct = match (best_bid, best_ask, mid_price) {
            (Some(bid), Some(ask), Some(mid)) if ask > bid && mid > Decimal::ZERO => {
                Some((ask - bid) / mid * Decimal::ONE_HUNDRED)
            }
            _ => None,
        };

        OrderbookStats {
            bid_levels: orderbook.bids().len(),
            ask_levels: orderbook.asks().len(),
            best_bid,
            best_ask,
            mid_price,
            spread_pct,
            bid_notional: orderbook.bids().iter().map(|l| l.notional()).sum(),
            ask_notional: orderbook.asks().iter().map(|l| l.notional()).sum(),
        }
    }
}
