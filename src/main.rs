// main.rs - Entry point for the margin vs swap cash-and-carry scanner

use clap::Parser;
use env_logger::Env;
use log::{error, info, LevelFilter};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use carryfury::config::{get_config, Config};
use carryfury::connectors::okx::OkxRestClient;
use carryfury::report::{print_table, save_csv, save_json};
use carryfury::scanner::{ScanOptions, Scanner};
use carryfury::types::{AppError, VenueType};

#[derive(Parser, Debug)]
#[command(version, about = "Find margin vs perpetual swap price gaps on OKX")]
struct Args {
    /// Config file (toml, json or yaml)
    #[arg(long, env = "CARRYFURY_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Margin venue instrument type
    #[arg(long)]
    margin_type: Option<VenueType>,

    /// Perpetual venue instrument type
    #[arg(long)]
    swap_type: Option<VenueType>,

    /// Quote currency filter for margin instruments; empty disables it
    #[arg(long)]
    quote: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Number of rows to keep
    #[arg(long)]
    top: Option<usize>,

    /// Minimum absolute % difference
    #[arg(long)]
    min_diff: Option<Decimal>,

    /// Price from order books instead of mark prices
    #[arg(long)]
    orderbook: bool,

    /// Notional per trade in quote currency
    #[arg(long)]
    trade_size: Option<Decimal>,

    #[arg(long)]
    min_liquidity: Option<Decimal>,

    /// Per-leg slippage cap in percent
    #[arg(long)]
    max_slippage: Option<Decimal>,

    /// Order book levels to request
    #[arg(long)]
    depth: Option<usize>,

    /// Concurrent order book and funding requests
    #[arg(long)]
    workers: Option<usize>,

    /// Overall scan deadline in seconds
    #[arg(long)]
    deadline: Option<u64>,

    /// Write the report as JSON
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Append rows to a CSV file
    #[arg(long)]
    csv_out: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(v) = self.margin_type {
            config.scan.margin_inst_type = v;
        }
        if let Some(v) = self.swap_type {
            config.scan.swap_inst_type = v;
        }
        if let Some(v) = &self.quote {
            config.scan.quote_currency = v.clone();
        }
        if let Some(v) = self.timeout {
            config.general.request_timeout_secs = v;
        }
        if let Some(v) = self.top {
            config.scan.top_n = v;
        }
        if let Some(v) = self.min_diff {
            config.scan.min_diff_pct = v;
        }
        if self.orderbook {
            config.scan.use_order_book = true;
        }
        if let Some(v) = self.trade_size {
            config.trading.trade_size_usd = v;
        }
        if let Some(v) = self.min_liquidity {
            config.trading.min_liquidity_usd = v;
        }
        if let Some(v) = self.max_slippage {
            config.trading.max_slippage_pct = v;
        }
        if let Some(v) = self.depth {
            config.trading.order_book_depth = v;
        }
        if let Some(v) = self.workers {
            config.general.worker_threads = v;
        }
        if let Some(v) = self.deadline {
            config.scan.deadline_secs = Some(v);
        }
        if let Some(v) = &self.json_out {
            config.export.json_path = Some(v.clone());
        }
        if let Some(v) = &self.csv_out {
            config.export.csv_path = Some(v.clone());
        }
        if let Some(v) = &self.log_level {
            config.general.log_level = v.clone();
        }
    }
}

async fn load_config(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match Config::from_file(path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            eprintln!("Falling back to default configuration");
            Config::default()
        }
    }
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format(|buf, record| {
            if record.level() <= log::Level::Info {
                writeln!(buf, "[{}] {}", record.level(), record.args())
            } else {
                writeln!(
                    buf,
                    "[{} {}:{}] {}",
                    record.level(),
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.args()
                )
            }
        })
        .filter_module("tokio", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .format_timestamp_millis()
        .format_module_path(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let mut config = load_config(&args.config).await;
    args.apply(&mut config);
    config.validate()?;
    Config::global()
        .set(config)
        .map_err(|_| AppError::ConfigError("Configuration already initialized".to_string()))?;
    let config = get_config();

    init_logging(&config.general.log_level);
    info!("Starting CarryFury margin vs swap scanner");

    let options = ScanOptions::from_config(config);
    if config.scan.use_order_book {
        info!(
            "Trade size: ${:.2}, Min liquidity: ${:.2}, Max slippage: {:.2}%, Order book depth: {}",
            options.trading.trade_size_usd,
            options.trading.min_liquidity_usd,
            options.trading.max_slippage_pct,
            options.trading.order_book_depth
        );
    }
    info!("Using {} workers", options.workers);

    let client = OkxRestClient::new(config.okx_config())?;
    let scanner = Scanner::new(Arc::new(client), options);

    let report = match scanner.run().await {
        Ok(report) => report,
        Err(e) => {
            error!("Scan failed: {}", e);
            return Err(e);
        }
    };

    print_table(&report, config.scan.min_diff_pct);

    if let Some(path) = &config.export.json_path {
        save_json(&report, path).await?;
    }
    if let Some(path) = &config.export.csv_path {
        save_csv(&report, path)?;
    }

    Ok(())
}
