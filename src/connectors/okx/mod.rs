//! OKX v5 REST market data provider
//!
//! Public endpoints for instruments, mark prices, books and funding; signed
//! account endpoints for trade fees and borrow rates.

pub mod config;
pub mod message_parser;
pub mod rest_api;

pub use config::OkxConfig;
pub use message_parser::OkxMessageParser;
pub use rest_api::OkxRestClient;

pub mod constants {
    pub const OKX_API_URL: &str = "https://www.okx.com";

    pub const INSTRUMENTS_PATH: &str = "/api/v5/public/instruments";
    pub const MARK_PRICE_PATH: &str = "/api/v5/public/mark-price";
    pub const ORDER_BOOK_PATH: &str = "/api/v5/market/books";
    pub const FUNDING_RATE_PATH: &str = "/api/v5/public/funding-rate";
    pub const TRADE_FEE_PATH: &str = "/api/v5/account/trade-fee";
    pub const INTEREST_RATE_PATH: &str = "/api/v5/account/interest-rate";

    pub const API_KEY_ENV: &str = "OKX_API_KEY";
    pub const API_SECRET_ENV: &str = "OKX_API_SECRET";
    pub const API_PASSPHRASE_ENV: &str = "OKX_API_PASSPHRASE";

    pub const HEADER_ACCESS_KEY: &str = "OK-ACCESS-KEY";
    pub const HEADER_ACCESS_SIGN: &str = "OK-ACCESS-SIGN";
    pub const HEADER_ACCESS_TIMESTAMP: &str = "OK-ACCESS-TIMESTAMP";
    pub const HEADER_ACCESS_PASSPHRASE: &str = "OK-ACCESS-PASSPHRASE";

    pub const DEFAULT_USER_AGENT: &str = "OKX-Instrument-Analyzer/1.0";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// `sz` upper bound accepted by the books endpoint
    pub const MAX_BOOK_DEPTH: usize = 400;

    /// Envelope `code` of a successful call
    pub const SUCCESS_CODE: &str = "0";
}
