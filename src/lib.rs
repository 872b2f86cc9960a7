// Define modules
pub mod types;
pub mod arbitrage;
pub mod connectors;
pub mod config;
pub mod scanner;
pub mod report;

// Re-export key components for easier usage
pub use types::*;
pub use config::{get_config, init_config, Config};
pub use scanner::{ScanMode, ScanOptions, ScanReport, Scanner};
pub use connectors::MarketDataProvider;
pub use connectors::okx::OkxRestClient;
