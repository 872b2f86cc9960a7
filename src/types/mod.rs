// src/types/mod.rs - shared value types

pub mod exchange;
pub mod market_data;
pub mod trading;
pub mod errors;

pub use exchange::{InstrumentState, VenueType};
pub use market_data::{
    Attributes, BorrowRates, FeeSchedule, FundingQuote, FundingSnapshot, Instrument,
    OrderBook, OrderBookLevel, PriceSnapshot, ReferencePrice,
};
pub use trading::{
    ArbitrageResult, DiffResult, Opportunity, Signal, TermStructure, TradeSide,
    TradingParameters, WeightedPriceResult,
};
pub use errors::{AppError, ConnectorError, PricingError};
