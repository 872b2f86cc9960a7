// src/connectors/traits/mod.rs - market data fetch boundary

use async_trait::async_trait;

use crate::types::*;

/// Read-only market data source used by the scanner.
///
/// Implementations parse upstream text into typed values before returning;
/// nothing past this boundary sees raw strings.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Live instruments of `venue`, optionally restricted to one quote currency
    async fn fetch_instruments(
        &self,
        venue: VenueType,
        quote_ccy: Option<&str>,
    ) -> Result<Vec<Instrument>, ConnectorError>;

    async fn fetch_reference_prices(&self, venue: VenueType) -> Result<PriceSnapshot, ConnectorError>;

    async fn fetch_order_book(&self, inst_id: &str, depth: usize) -> Result<OrderBook, ConnectorError>;

    async fn fetch_funding(&self, inst_id: &str) -> Result<FundingQuote, ConnectorError>;

    /// Taker fees; fields the venue does not report fall back to defaults
    async fn fetch_fee_schedule(&self) -> Result<FeeSchedule, ConnectorError>;

    /// Hourly borrow rates per currency (authenticated)
    async fn fetch_borrow_rates(&self) -> Result<BorrowRates, ConnectorError>;

    fn provider_name(&self) -> &str;
}
