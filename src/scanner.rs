//! One scan run, end to end.
//!
//! Fetch instruments for both venues, join them on base asset, rank pairs by
//! reference-price divergence or by executable order book prices, then
//! attach funding and fees to the top rows and apply the profit floor.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

use crate::arbitrage::{
    actual_profit_pct, compute_diffs, estimate_fee, evaluate, fuse, passes_profit_floor, rank,
    DuplicatePolicy, MatchedPair, SymbolMatcher,
};
use crate::config::Config;
use crate::connectors::common::OrderbookValidator;
use crate::connectors::MarketDataProvider;
use crate::types::*;

/// How pairs are priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Mark price against mark price
    ReferencePrice,
    /// Size-weighted prices walked from both order books
    ExecutionPrice,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanMode::ReferencePrice => write!(f, "reference price"),
            ScanMode::ExecutionPrice => write!(f, "execution price"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub margin_venue: VenueType,
    pub swap_venue: VenueType,
    pub quote_ccy: Option<String>,
    pub top_n: usize,
    pub min_diff_pct: Decimal,
    pub mode: ScanMode,
    pub trading: TradingParameters,
    pub min_actual_profit_pct: Decimal,
    /// Used when the fee schedule misses the deadline
    pub fallback_fees: FeeSchedule,
    /// Concurrent order book / funding fetches
    pub workers: usize,
    pub deadline: Option<Duration>,
    pub symbol_separator: char,
    pub duplicate_policy: DuplicatePolicy,
}

impl ScanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            margin_venue: config.scan.margin_inst_type,
            swap_venue: config.scan.swap_inst_type,
            quote_ccy: config.quote_filter().map(str::to_string),
            top_n: config.scan.top_n,
            min_diff_pct: config.scan.min_diff_pct,
            mode: if config.scan.use_order_book {
                ScanMode::ExecutionPrice
            } else {
                ScanMode::ReferencePrice
            },
            trading: config.trading,
            min_actual_profit_pct: config.fees.min_actual_profit_pct,
            fallback_fees: config.fee_schedule(),
            workers: config.effective_workers(),
            deadline: config.deadline(),
            symbol_separator: config.scan.symbol_separator,
            duplicate_policy: config.scan.duplicate_policy,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub mode: ScanMode,
    pub generated_at: DateTime<Utc>,
    pub margin_instruments: usize,
    pub swap_instruments: usize,
    pub matched_pairs: usize,
    /// Ranked rows before the profit floor
    pub candidates: usize,
    pub opportunities: Vec<Opportunity>,
    pub trading: TradingParameters,
    pub fees: FeeSchedule,
}

pub struct Scanner {
    provider: Arc<dyn MarketDataProvider>,
    options: ScanOptions,
    validator: OrderbookValidator,
}

impl Scanner {
    pub fn new(provider: Arc<dyn MarketDataProvider>, options: ScanOptions) -> Self {
        Self {
            provider,
            options,
            validator: OrderbookValidator::with_default_config(),
        }
    }

    pub async fn run(&self) -> Result<ScanReport, AppError> {
        let opts = &self.options;
        let deadline = opts.deadline.map(|d| Instant::now() + d);
        info!(
            "Scanning {} vs {} on {} ({} mode)",
            opts.margin_venue,
            opts.swap_venue,
            self.provider.provider_name(),
            opts.mode
        );

        // derivative listings leave quoteCcy empty, so they are never quote-filtered
        let swap_quote = if opts.swap_venue.is_derivative() {
            None
        } else {
            opts.quote_ccy.as_deref()
        };
        let (margin, swap) = within_deadline(deadline, "instrument listings", async {
            tokio::try_join!(
                self.provider.fetch_instruments(opts.margin_venue, opts.quote_ccy.as_deref()),
                self.provider.fetch_instruments(opts.swap_venue, swap_quote),
            )
        })
        .await?;
        info!("Fetched {} {} and {} {} instruments", margin.len(), opts.margin_venue, swap.len(), opts.swap_venue);

        let matcher = SymbolMatcher::new(opts.symbol_separator, opts.duplicate_policy);

        let (matched_pairs, signals) = match opts.mode {
            ScanMode::ReferencePrice => {
                let (margin_prices, swap_prices) = within_deadline(deadline, "reference prices", async {
                    tokio::try_join!(
                        self.provider.fetch_reference_prices(opts.margin_venue),
                        self.provider.fetch_reference_prices(opts.swap_venue),
                    )
                })
                .await?;
                let pairs = matcher.match_pairs(&fuse(&margin, &margin_prices), &fuse(&swap, &swap_prices));
                let signals: Vec<Signal> = compute_diffs(&pairs, opts.top_n, opts.min_diff_pct)
                    .into_iter()
                    .map(Signal::ReferencePrice)
                    .collect();
                (pairs, signals)
            }
            ScanMode::ExecutionPrice => {
                // margin listings carry no mark price; the quantity per trade needs one
                let margin_prices = within_deadline(
                    deadline,
                    "reference prices",
                    self.provider.fetch_reference_prices(opts.margin_venue),
                )
                .await?;
                let pairs = matcher.match_pairs(&fuse(&margin, &margin_prices), &swap);
                let results = self.evaluate_pairs(&pairs, deadline).await;
                let signals: Vec<Signal> = rank(results, opts.top_n, opts.min_diff_pct)
                    .into_iter()
                    .map(Signal::ExecutionPrice)
                    .collect();
                (pairs, signals)
            }
        };
        info!("{} matched pairs, {} ranked candidates", matched_pairs.len(), signals.len());

        let fees = self.fee_schedule(deadline).await?;
        let borrow_rates = self.borrow_rates(deadline).await;

        let swap_ids: HashMap<&str, &str> = matched_pairs
            .iter()
            .map(|p| (p.base.as_str(), p.swap.inst_id.as_str()))
            .collect();
        let funding = self.funding_for(&signals, &swap_ids, deadline).await;

        let candidates = signals.len();
        let opportunities: Vec<Opportunity> = signals
            .into_iter()
            .filter_map(|signal| {
                let fee_fraction = estimate_fee(signal.base(), signal.term_structure(), &fees, &borrow_rates);
                let profit = actual_profit_pct(signal.percent_diff(), fee_fraction);
                if !passes_profit_floor(profit, opts.min_actual_profit_pct) {
                    debug!("{}: {:.4}% after fees is below the floor", signal.base(), profit);
                    return None;
                }
                let funding = funding.get(signal.base()).copied().unwrap_or_default();
                Some(Opportunity {
                    signal,
                    funding,
                    fee_fraction,
                    actual_profit_pct: profit,
                })
            })
            .collect();
        info!("{} of {} candidates clear the profit floor", opportunities.len(), candidates);

        Ok(ScanReport {
            mode: opts.mode,
            generated_at: Utc::now(),
            margin_instruments: margin.len(),
            swap_instruments: swap.len(),
            matched_pairs: matched_pairs.len(),
            candidates,
            opportunities,
            trading: opts.trading,
            fees,
        })
    }

    async fn evaluate_pairs(&self, pairs: &[MatchedPair], deadline: Option<Instant>) -> Vec<ArbitrageResult> {
        let workers = self.options.workers.max(1);
        debug!("Pricing {} pairs with {} workers", pairs.len(), workers);

        stream::iter(pairs)
            .map(|pair| self.evaluate_pair(pair, deadline))
            .buffer_unordered(workers)
            .filter_map(|result| async move { result })
            .collect()
            .await
    }

    async fn evaluate_pair(&self, pair: &MatchedPair, deadline: Option<Instant>) -> Option<ArbitrageResult> {
        let depth = self.options.trading.order_book_depth;
        let books = within_deadline(deadline, &pair.base, async {
            tokio::try_join!(
                self.provider.fetch_order_book(&pair.margin.inst_id, depth),
                self.provider.fetch_order_book(&pair.swap.inst_id, depth),
            )
        })
        .await;

        let (margin_book, swap_book) = match books {
            Ok(books) => books,
            Err(e) => {
                warn!("Skipping {}: order book fetch failed: {}", pair.base, e);
                return None;
            }
        };

        for book in [&margin_book, &swap_book] {
            let validation = self.validator.validate_orderbook(book);
            for warning in &validation.warnings {
                debug!("{}", warning.message);
            }
            if let Some(error) = validation.errors.first() {
                warn!("Skipping {}: {}", pair.base, error.message);
                return None;
            }
        }

        match evaluate(pair, &margin_book, &swap_book, &self.options.trading) {
            Ok(result) => result,
            Err(e) => {
                warn!("Skipping {}: {}", pair.base, e);
                None
            }
        }
    }

    async fn fee_schedule(&self, deadline: Option<Instant>) -> Result<FeeSchedule, ConnectorError> {
        match within_deadline(deadline, "fee schedule", self.provider.fetch_fee_schedule()).await {
            Err(ConnectorError::TimeoutError(msg)) => {
                warn!("Using configured fees: {}", msg);
                Ok(self.options.fallback_fees)
            }
            other => other,
        }
    }

    async fn borrow_rates(&self, deadline: Option<Instant>) -> BorrowRates {
        match within_deadline(deadline, "borrow rates", self.provider.fetch_borrow_rates()).await {
            Ok(rates) => rates,
            Err(ConnectorError::InvalidCredentials(msg)) => {
                info!("No API credentials, using the default borrow rate ({})", msg);
                BorrowRates::new()
            }
            Err(e) => {
                warn!("Borrow rates unavailable, using the default rate: {}", e);
                BorrowRates::new()
            }
        }
    }

    /// Funding per base asset for the given rows; failures degrade to zero funding
    async fn funding_for(
        &self,
        signals: &[Signal],
        swap_ids: &HashMap<&str, &str>,
        deadline: Option<Instant>,
    ) -> HashMap<String, FundingSnapshot> {
        let requests: Vec<(String, String)> = signals
            .iter()
            .filter_map(|s| swap_ids.get(s.base()).map(|id| (s.base().to_string(), id.to_string())))
            .collect();

        stream::iter(requests)
            .map(|(base, inst_id)| async move {
                let quote = within_deadline(deadline, &inst_id, self.provider.fetch_funding(&inst_id)).await;
                let snapshot = match quote {
                    Ok(quote) => FundingSnapshot::from_quote(&quote, Utc::now()),
                    Err(e) => {
                        warn!("Funding for {} unavailable: {}", inst_id, e);
                        FundingSnapshot::zero()
                    }
                };
                (base, snapshot)
            })
            .buffer_unordered(self.options.workers.max(1))
            .collect()
            .await
    }
}

async fn within_deadline<T, F>(deadline: Option<Instant>, what: &str, fut: F) -> Result<T, ConnectorError>
where
    F: Future<Output = Result<T, ConnectorError>>,
{
    match deadline {
        Some(at) => timeout_at(at, fut)
            .await
            .map_err(|_| ConnectorError::TimeoutError(format!("{} missed the scan deadline", what)))?,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockProvider {
        margin: Vec<Instrument>,
        swap: Vec<Instrument>,
        margin_prices: PriceSnapshot,
        swap_prices: PriceSnapshot,
        books: HashMap<String, OrderBook>,
        slow_books: HashSet<String>,
        funding: HashMap<String, FundingQuote>,
        borrow_rates: BorrowRates,
        fail_instruments: bool,
        slow_instruments: bool,
        fail_reference_prices: Option<VenueType>,
        fail_borrow_rates: bool,
        slow_fees: bool,
        quote_filters: Mutex<Vec<(VenueType, Option<String>)>>,
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn fetch_instruments(
            &self,
            venue: VenueType,
            quote_ccy: Option<&str>,
        ) -> Result<Vec<Instrument>, ConnectorError> {
            self.quote_filters
                .lock()
                .unwrap()
                .push((venue, quote_ccy.map(str::to_string)));
            if self.slow_instruments {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if self.fail_instruments {
                return Err(ConnectorError::NetworkError("instruments down".to_string()));
            }
            Ok(match venue {
                VenueType::Margin => self.margin.clone(),
                _ => self.swap.clone(),
            })
        }

        async fn fetch_reference_prices(&self, venue: VenueType) -> Result<PriceSnapshot, ConnectorError> {
            if self.fail_reference_prices == Some(venue) {
                return Err(ConnectorError::ApiError {
                    code: "50001".to_string(),
                    msg: "service temporarily unavailable".to_string(),
                });
            }
            Ok(match venue {
                VenueType::Margin => self.margin_prices.clone(),
                _ => self.swap_prices.clone(),
            })
        }

        async fn fetch_order_book(&self, inst_id: &str, _depth: usize) -> Result<OrderBook, ConnectorError> {
            if self.slow_books.contains(inst_id) {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            self.books
                .get(inst_id)
                .cloned()
                .ok_or_else(|| ConnectorError::ApiError {
                    code: "51001".to_string(),
                    msg: format!("{} not found", inst_id),
                })
        }

        async fn fetch_funding(&self, inst_id: &str) -> Result<FundingQuote, ConnectorError> {
            self.funding
                .get(inst_id)
                .cloned()
                .ok_or_else(|| ConnectorError::InvalidResponse("empty funding rate data".to_string()))
        }

        async fn fetch_fee_schedule(&self) -> Result<FeeSchedule, ConnectorError> {
            if self.slow_fees {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(FeeSchedule::default())
        }

        async fn fetch_borrow_rates(&self) -> Result<BorrowRates, ConnectorError> {
            if self.fail_borrow_rates {
                return Err(ConnectorError::InvalidCredentials("no key".to_string()));
            }
            Ok(self.borrow_rates.clone())
        }

        fn provider_name(&self) -> &str {
            "mock"
        }
    }

    fn price(inst_id: &str, px: Option<Decimal>) -> (String, ReferencePrice) {
        (
            inst_id.to_string(),
            ReferencePrice {
                inst_id: inst_id.to_string(),
                price: px,
                timestamp_ms: None,
                extra: Default::default(),
            },
        )
    }

    fn book(inst_id: &str, bid: Decimal, ask: Decimal) -> (String, OrderBook) {
        (
            inst_id.to_string(),
            OrderBook::new(
                inst_id,
                vec![OrderBookLevel::new(bid, dec!(50), 1)],
                vec![OrderBookLevel::new(ask, dec!(50), 1)],
                0,
            ),
        )
    }

    fn listing(bases: &[&str], venue: VenueType) -> Vec<Instrument> {
        bases
            .iter()
            .map(|b| match venue {
                VenueType::Margin => Instrument::new(&format!("{}-USDT", b), venue),
                _ => Instrument::new(&format!("{}-USDT-SWAP", b), venue),
            })
            .collect()
    }

    fn reference_provider() -> MockProvider {
        MockProvider {
            margin: listing(&["BTC", "ETH", "SOL", "XRP", "ADA"], VenueType::Margin),
            swap: listing(&["BTC", "ETH", "SOL", "XRP"], VenueType::Swap),
            margin_prices: vec![
                price("BTC-USDT", Some(dec!(100))),
                price("ETH-USDT", Some(dec!(100))),
                price("SOL-USDT", Some(dec!(102))),
                price("XRP-USDT", None),
                price("ADA-USDT", Some(dec!(1))),
            ]
            .into_iter()
            .collect(),
            swap_prices: vec![
                price("BTC-USDT-SWAP", Some(dec!(101))),
                price("ETH-USDT-SWAP", Some(dec!(100.3))),
                price("SOL-USDT-SWAP", Some(dec!(100))),
                price("XRP-USDT-SWAP", Some(dec!(0.5))),
            ]
            .into_iter()
            .collect(),
            funding: vec![(
                "BTC-USDT-SWAP".to_string(),
                FundingQuote {
                    inst_id: "BTC-USDT-SWAP".to_string(),
                    rate: dec!(0.0001),
                    next_funding_time_ms: Utc::now().timestamp_millis() + 3_600_000,
                },
            )]
            .into_iter()
            .collect(),
            borrow_rates: vec![("SOL".to_string(), dec!(0.001))].into_iter().collect(),
            ..MockProvider::default()
        }
    }

    fn scanner(provider: MockProvider, options: ScanOptions) -> Scanner {
        Scanner::new(Arc::new(provider), options)
    }

    #[tokio::test]
    async fn test_reference_scan_ranks_enriches_and_filters() {
        let _ = env_logger::builder().is_test(true).try_init();
        let report = scanner(reference_provider(), ScanOptions::default()).run().await.unwrap();

        assert_eq!(report.mode, ScanMode::ReferencePrice);
        assert_eq!(report.margin_instruments, 5);
        assert_eq!(report.matched_pairs, 4);
        // XRP has no margin price, ETH clears min diff but not the profit floor
        assert_eq!(report.candidates, 3);

        let bases: Vec<&str> = report.opportunities.iter().map(|o| o.signal.base()).collect();
        assert_eq!(bases, vec!["SOL", "BTC"]);

        let sol = &report.opportunities[0];
        assert_eq!(sol.signal.term_structure(), TermStructure::Backwardation);
        assert_eq!(sol.fee_fraction, dec!(0.004));
        assert_eq!(sol.funding, FundingSnapshot::zero());

        let btc = &report.opportunities[1];
        assert_eq!(btc.fee_fraction, dec!(0.003));
        assert_eq!(btc.actual_profit_pct, btc.signal.percent_diff() - dec!(0.3));
        assert_eq!(btc.funding.rate, dec!(0.0001));
        assert!(btc.funding.time_to_funding_ms > 0);
    }

    #[tokio::test]
    async fn test_top_n_applies_before_profit_floor() {
        let options = ScanOptions {
            top_n: 1,
            ..ScanOptions::default()
        };
        let report = scanner(reference_provider(), options).run().await.unwrap();

        assert_eq!(report.candidates, 1);
        assert_eq!(report.opportunities.len(), 1);
        assert_eq!(report.opportunities[0].signal.base(), "SOL");
    }

    #[tokio::test]
    async fn test_borrow_rate_failure_falls_back_to_default() {
        let provider = MockProvider {
            fail_borrow_rates: true,
            ..reference_provider()
        };
        let report = scanner(provider, ScanOptions::default()).run().await.unwrap();

        let sol = &report.opportunities[0];
        assert_eq!(sol.signal.base(), "SOL");
        assert_eq!(sol.fee_fraction, dec!(0.0032));
    }

    #[tokio::test]
    async fn test_instrument_failure_is_fatal() {
        let provider = MockProvider {
            fail_instruments: true,
            ..reference_provider()
        };
        let result = scanner(provider, ScanOptions::default()).run().await;
        assert!(matches!(result, Err(AppError::Connector(ConnectorError::NetworkError(_)))));
    }

    #[tokio::test]
    async fn test_reference_price_failure_on_either_venue_is_fatal() {
        for venue in [VenueType::Margin, VenueType::Swap] {
            let provider = MockProvider {
                fail_reference_prices: Some(venue),
                ..reference_provider()
            };
            let result = scanner(provider, ScanOptions::default()).run().await;
            assert!(
                matches!(result, Err(AppError::Connector(ConnectorError::ApiError { .. }))),
                "{} failure was not fatal",
                venue
            );
        }
    }

    #[tokio::test]
    async fn test_swap_listing_is_not_quote_filtered() {
        let provider = Arc::new(reference_provider());
        Scanner::new(provider.clone(), ScanOptions::default())
            .run()
            .await
            .unwrap();

        let mut seen = provider.quote_filters.lock().unwrap().clone();
        seen.sort_by_key(|(venue, _)| venue.to_api_string());
        assert_eq!(
            seen,
            vec![
                (VenueType::Margin, Some("USDT".to_string())),
                (VenueType::Swap, None),
            ]
        );
    }

    #[tokio::test]
    async fn test_deadline_bounds_instrument_listing() {
        let provider = MockProvider {
            slow_instruments: true,
            ..reference_provider()
        };
        let options = ScanOptions {
            deadline: Some(Duration::from_millis(200)),
            ..ScanOptions::default()
        };

        let started = std::time::Instant::now();
        let result = scanner(provider, options).run().await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(matches!(result, Err(AppError::Connector(ConnectorError::TimeoutError(_)))));
    }

    #[tokio::test]
    async fn test_slow_fee_schedule_falls_back_to_configured_fees() {
        let provider = MockProvider {
            slow_fees: true,
            ..reference_provider()
        };
        let configured = FeeSchedule {
            spot_taker: dec!(0.002),
            ..FeeSchedule::default()
        };
        let options = ScanOptions {
            deadline: Some(Duration::from_millis(200)),
            fallback_fees: configured,
            ..ScanOptions::default()
        };

        let report = scanner(provider, options).run().await.unwrap();

        assert_eq!(report.fees, configured);
    }

    fn execution_provider() -> MockProvider {
        MockProvider {
            margin: listing(&["BTC", "ETH", "SOL", "DOGE"], VenueType::Margin),
            swap: listing(&["BTC", "ETH", "SOL", "DOGE"], VenueType::Swap),
            margin_prices: vec![
                price("BTC-USDT", Some(dec!(100))),
                price("ETH-USDT", Some(dec!(100))),
                price("SOL-USDT", Some(dec!(100))),
                price("DOGE-USDT", Some(dec!(100))),
            ]
            .into_iter()
            .collect(),
            books: vec![
                book("BTC-USDT", dec!(99.9), dec!(100)),
                book("BTC-USDT-SWAP", dec!(101), dec!(101.1)),
                // ETH swap book missing
                book("ETH-USDT", dec!(99.9), dec!(100)),
                // SOL margin book crossed
                book("SOL-USDT", dec!(101), dec!(100)),
                book("SOL-USDT-SWAP", dec!(102), dec!(102.1)),
                book("DOGE-USDT", dec!(99.9), dec!(100)),
                book("DOGE-USDT-SWAP", dec!(103), dec!(103.1)),
            ]
            .into_iter()
            .collect(),
            ..MockProvider::default()
        }
    }

    #[tokio::test]
    async fn test_execution_scan_skips_failed_and_invalid_books() {
        let options = ScanOptions {
            mode: ScanMode::ExecutionPrice,
            workers: 2,
            ..ScanOptions::default()
        };
        let report = scanner(execution_provider(), options).run().await.unwrap();

        assert_eq!(report.mode, ScanMode::ExecutionPrice);
        assert_eq!(report.matched_pairs, 4);
        let bases: Vec<&str> = report.opportunities.iter().map(|o| o.signal.base()).collect();
        assert_eq!(bases, vec!["DOGE", "BTC"]);

        match &report.opportunities[1].signal {
            Signal::ExecutionPrice(result) => {
                assert_eq!(result.term_structure, TermStructure::Contango);
                assert_eq!(result.margin_buy, dec!(100));
                assert_eq!(result.swap_sell, dec!(101));
            }
            other => panic!("unexpected signal {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deadline_miss_skips_pair() {
        let mut provider = execution_provider();
        provider.slow_books.insert("DOGE-USDT-SWAP".to_string());
        let options = ScanOptions {
            mode: ScanMode::ExecutionPrice,
            deadline: Some(Duration::from_millis(200)),
            ..ScanOptions::default()
        };

        let report = scanner(provider, options).run().await.unwrap();

        let bases: Vec<&str> = report.opportunities.iter().map(|o| o.signal.base()).collect();
        assert_eq!(bases, vec!["BTC"]);
    }

    #[tokio::test]
    async fn test_one_sided_book_is_skipped() {
        let mut provider = execution_provider();
        provider.books.insert(
            "DOGE-USDT-SWAP".to_string(),
            OrderBook::new(
                "DOGE-USDT-SWAP",
                vec![OrderBookLevel::new(dec!(103), dec!(50), 1)],
                vec![],
                0,
            ),
        );
        let options = ScanOptions {
            mode: ScanMode::ExecutionPrice,
            ..ScanOptions::default()
        };

        let report = scanner(provider, options).run().await.unwrap();

        let bases: Vec<&str> = report.opportunities.iter().map(|o| o.signal.base()).collect();
        assert_eq!(bases, vec!["BTC"]);
    }

    #[tokio::test]
    async fn test_unrepresentable_pair_does_not_abort_scan() {
        let mut provider = execution_provider();
        let (id, dust) = price("DOGE-USDT", Some(dec!(0.0000000000000000000000000001)));
        provider.margin_prices.insert(id, dust);
        let options = ScanOptions {
            mode: ScanMode::ExecutionPrice,
            ..ScanOptions::default()
        };

        let report = scanner(provider, options).run().await.unwrap();

        let bases: Vec<&str> = report.opportunities.iter().map(|o| o.signal.base()).collect();
        assert_eq!(bases, vec!["BTC"]);
    }
}
