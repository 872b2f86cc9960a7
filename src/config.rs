// config.rs - Centralized configuration system

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::arbitrage::{DuplicatePolicy, DEFAULT_MIN_ACTUAL_PROFIT_PCT};
use crate::connectors::okx::{constants as okx_constants, OkxConfig};
use crate::types::{AppError, FeeSchedule, TradingParameters, VenueType};

/// Global configuration singleton
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Returns a reference to the global configuration.
/// If not yet initialized, uses the default configuration.
pub fn get_config() -> &'static Config {
    CONFIG.get().unwrap_or_else(|| &*DEFAULT_CONFIG)
}

/// Initializes configuration from the given file path.
pub async fn init_config<P: AsRef<Path>>(path: P) -> Result<(), AppError> {
    let config = Config::from_file(path).await?;
    CONFIG
        .set(config)
        .map_err(|_| AppError::ConfigError("Configuration already initialized".to_string()))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub okx: OkxSection,
    pub scan: ScanConfig,
    pub trading: TradingParameters,
    pub fees: FeesConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
    /// Upper bound on concurrent order book fetches, capped by the core count
    pub worker_threads: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OkxSection {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_passphrase: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub margin_inst_type: VenueType,
    pub swap_inst_type: VenueType,
    /// Empty string disables the quote currency filter
    pub quote_currency: String,
    pub top_n: usize,
    pub min_diff_pct: Decimal,
    pub use_order_book: bool,
    pub symbol_separator: char,
    pub duplicate_policy: DuplicatePolicy,
    /// Whole-run deadline for order book and funding fetches
    pub deadline_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeesConfig {
    pub spot_taker: Decimal,
    pub swap_taker: Decimal,
    pub margin_borrow_hourly: Decimal,
    pub min_actual_profit_pct: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub json_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
}

/// Default configuration used when no config file is provided.
pub static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(|| {
    let fees = FeeSchedule::default();
    Config {
        general: GeneralConfig {
            log_level: String::from("info"),
            worker_threads: 8,
            request_timeout_secs: okx_constants::DEFAULT_TIMEOUT_SECS,
            user_agent: okx_constants::DEFAULT_USER_AGENT.to_string(),
        },
        okx: OkxSection {
            base_url: okx_constants::OKX_API_URL.to_string(),
            api_key: None,
            api_secret: None,
            api_passphrase: None,
        },
        scan: ScanConfig {
            margin_inst_type: VenueType::Margin,
            swap_inst_type: VenueType::Swap,
            quote_currency: String::from("USDT"),
            top_n: 10,
            min_diff_pct: Decimal::new(24, 2),
            use_order_book: false,
            symbol_separator: crate::arbitrage::symbol_matcher::DEFAULT_SYMBOL_SEPARATOR,
            duplicate_policy: DuplicatePolicy::LastWins,
            deadline_secs: None,
        },
        trading: TradingParameters::default(),
        fees: FeesConfig {
            spot_taker: fees.spot_taker,
            swap_taker: fees.swap_taker,
            margin_borrow_hourly: fees.margin_borrow_hourly,
            min_actual_profit_pct: DEFAULT_MIN_ACTUAL_PROFIT_PCT,
        },
        export: ExportConfig::default(),
    }
});

impl Default for Config {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.general.clone()
    }
}

impl Default for OkxSection {
    fn default() -> Self {
        DEFAULT_CONFIG.okx.clone()
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.scan.clone()
    }
}

impl Default for FeesConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.fees.clone()
    }
}

impl Config {
    /// Returns a reference to the global configuration singleton.
    pub fn global() -> &'static OnceLock<Config> {
        &CONFIG
    }

    /// Load configuration from a file; the format follows the extension.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let file_format = path.as_ref().extension().and_then(|os| os.to_str());
        let mut file = File::open(path.as_ref())
            .await
            .map_err(|e| AppError::ConfigError(format!("Failed to open config file: {e}")))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .await
            .map_err(|e| AppError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = match file_format {
            Some("toml") => toml::from_str(&contents)
                .map_err(|e| AppError::ConfigError(format!("Failed to parse TOML config: {e}"))),
            Some("json") => serde_json::from_str(&contents)
                .map_err(|e| AppError::ConfigError(format!("Failed to parse JSON config: {e}"))),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
                .map_err(|e| AppError::ConfigError(format!("Failed to parse YAML config: {e}"))),
            _ => Err(AppError::ConfigError("Unsupported config file format".to_string())),
        }?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values no scan can run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.trading.trade_size_usd <= Decimal::ZERO {
            return Err(AppError::ConfigError("trading.trade_size_usd must be positive".to_string()));
        }
        if self.trading.order_book_depth == 0 {
            return Err(AppError::ConfigError("trading.order_book_depth must be at least 1".to_string()));
        }
        if self.general.request_timeout_secs == 0 {
            return Err(AppError::ConfigError("general.request_timeout_secs must be at least 1".to_string()));
        }
        if self.scan.margin_inst_type == self.scan.swap_inst_type {
            return Err(AppError::ConfigError(format!(
                "scan.margin_inst_type and scan.swap_inst_type are both {}",
                self.scan.margin_inst_type
            )));
        }
        Ok(())
    }

    /// Worker count actually used: configured value capped by the core count, at least one.
    pub fn effective_workers(&self) -> usize {
        num_cpus::get().min(self.general.worker_threads).max(1)
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            spot_taker: self.fees.spot_taker,
            swap_taker: self.fees.swap_taker,
            margin_borrow_hourly: self.fees.margin_borrow_hourly,
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.scan.deadline_secs.map(Duration::from_secs)
    }

    pub fn quote_filter(&self) -> Option<&str> {
        Some(self.scan.quote_currency.as_str()).filter(|q| !q.is_empty())
    }

    /// Provider settings; credentials missing here are read from the environment.
    pub fn okx_config(&self) -> OkxConfig {
        OkxConfig {
            base_url: self.okx.base_url.clone(),
            api_key: self.okx.api_key.clone(),
            api_secret: self.okx.api_secret.clone(),
            api_passphrase: self.okx.api_passphrase.clone(),
            timeout_secs: self.general.request_timeout_secs,
            user_agent: self.general.user_agent.clone(),
            fallback_fees: self.fee_schedule(),
        }
        .with_env_credentials()
    }
}
