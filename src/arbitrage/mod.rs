// src/arbitrage/mod.rs - arbitrage detection engine

pub mod symbol_matcher;
pub mod price_fuser;
pub mod diff_engine;
pub mod orderbook_pricer;
pub mod evaluator;
pub mod fees;

pub use symbol_matcher::{extract_base_symbol, DuplicatePolicy, MatchedPair, SymbolMatcher};
pub use price_fuser::fuse;
pub use diff_engine::{compute_diff, compute_diffs, percent_diff};
pub use orderbook_pricer::weighted_price;
pub use evaluator::{evaluate, rank};
pub use fees::{actual_profit_pct, estimate_fee, passes_profit_floor, DEFAULT_MIN_ACTUAL_PROFIT_PCT};
