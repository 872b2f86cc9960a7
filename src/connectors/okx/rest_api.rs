//! OKX REST client
//!
//! Implements [`MarketDataProvider`] over the v5 HTTP API.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use sha2::Sha256;
use std::time::Duration;

use super::config::OkxConfig;
use super::constants::*;
use super::message_parser::OkxMessageParser;
use crate::connectors::traits::MarketDataProvider;
use crate::types::*;

type HmacSha256 = Hmac<Sha256>;

pub type Result<T> = std::result::Result<T, ConnectorError>;

pub struct OkxRestClient {
    client: Client,
    config: OkxConfig,
    base_url: String,
}

impl OkxRestClient {
    pub fn new(config: OkxConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConnectorError::InternalError(format!("failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Unauthenticated GET, returns the raw body after status checks
    async fn get_public(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let request_path = build_request_path(path, params);
        let request = self
            .client
            .request(Method::GET, format!("{}{}", self.base_url, request_path))
            .header("Accept", "application/json");

        self.send(request, &request_path).await
    }

    /// Signed GET against an account endpoint
    async fn get_signed(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let (api_key, secret, passphrase) = match (
            self.config.api_key.as_deref(),
            self.config.api_secret.as_deref(),
            self.config.api_passphrase.as_deref(),
        ) {
            (Some(k), Some(s), Some(p)) if !k.is_empty() && !s.is_empty() && !p.is_empty() => (k, s, p),
            _ => {
                return Err(ConnectorError::InvalidCredentials(format!(
                    "{} requires {}, {} and {}",
                    path, API_KEY_ENV, API_SECRET_ENV, API_PASSPHRASE_ENV
                )))
            }
        };

        let request_path = build_request_path(path, params);
        let timestamp = iso_timestamp();
        let signature = sign(secret, &timestamp, Method::GET.as_str(), &request_path, "")?;

        let request = self
            .client
            .request(Method::GET, format!("{}{}", self.base_url, request_path))
            .header("Accept", "application/json")
            .header(HEADER_ACCESS_KEY, api_key)
            .header(HEADER_ACCESS_SIGN, signature)
            .header(HEADER_ACCESS_TIMESTAMP, timestamp)
            .header(HEADER_ACCESS_PASSPHRASE, passphrase);

        self.send(request, &request_path).await
    }

    async fn send(&self, request: RequestBuilder, request_path: &str) -> Result<String> {
        debug!("GET {}", request_path);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::TOO_MANY_REQUESTS => Err(ConnectorError::RateLimitExceeded(request_path.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ConnectorError::AuthenticationFailed(
                format!("{} returned {}: {}", request_path, status, body),
            )),
            _ => Err(ConnectorError::NetworkError(format!(
                "{} returned unexpected status {}",
                request_path, status
            ))),
        }
    }

    async fn fetch_taker_fee(&self, venue: VenueType) -> Result<Option<Decimal>> {
        let body = self
            .get_signed(TRADE_FEE_PATH, &[("instType", venue.to_api_string().to_string())])
            .await?;
        OkxMessageParser::parse_taker_fee(&body)
    }

    async fn taker_fee_or(&self, venue: VenueType, default: Decimal) -> Decimal {
        match self.fetch_taker_fee(venue).await {
            Ok(Some(fee)) => fee,
            Ok(None) => default,
            Err(e) => {
                debug!("{} taker fee unavailable, using {}: {}", venue, default, e);
                default
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for OkxRestClient {
    async fn fetch_instruments(&self, venue: VenueType, quote_ccy: Option<&str>) -> Result<Vec<Instrument>> {
        let body = self
            .get_public(INSTRUMENTS_PATH, &[("instType", venue.to_api_string().to_string())])
            .await?;
        OkxMessageParser::parse_instruments(&body, venue, quote_ccy)
    }

    async fn fetch_reference_prices(&self, venue: VenueType) -> Result<PriceSnapshot> {
        let body = self
            .get_public(MARK_PRICE_PATH, &[("instType", venue.to_api_string().to_string())])
            .await?;
        OkxMessageParser::parse_mark_prices(&body)
    }

    async fn fetch_order_book(&self, inst_id: &str, depth: usize) -> Result<OrderBook> {
        let depth = depth.clamp(1, MAX_BOOK_DEPTH);
        let body = self
            .get_public(
                ORDER_BOOK_PATH,
                &[("instId", inst_id.to_string()), ("sz", depth.to_string())],
            )
            .await?;
        OkxMessageParser::parse_order_book(&body, inst_id)
    }

    async fn fetch_funding(&self, inst_id: &str) -> Result<FundingQuote> {
        let body = self
            .get_public(FUNDING_RATE_PATH, &[("instId", inst_id.to_string())])
            .await?;
        OkxMessageParser::parse_funding(&body)
    }

    async fn fetch_fee_schedule(&self) -> Result<FeeSchedule> {
        let fallback = self.config.fallback_fees;

        Ok(FeeSchedule {
            spot_taker: self.taker_fee_or(VenueType::Spot, fallback.spot_taker).await,
            swap_taker: self.taker_fee_or(VenueType::Swap, fallback.swap_taker).await,
            // no endpoint reports a default borrow rate
            margin_borrow_hourly: fallback.margin_borrow_hourly,
        })
    }

    async fn fetch_borrow_rates(&self) -> Result<BorrowRates> {
        let body = self.get_signed(INTEREST_RATE_PATH, &[]).await?;
        let rates = OkxMessageParser::parse_interest_rates(&body)?;
        if rates.is_empty() {
            warn!("Interest rate endpoint returned no currencies");
        }
        Ok(rates)
    }

    fn provider_name(&self) -> &str {
        "OKX"
    }
}

/// `path?k=v&k=v`, or just `path` without parameters
fn build_request_path(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", path, query)
}

fn iso_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// `base64(HMAC-SHA256(secret, timestamp + method + request_path + body))`
pub fn sign(secret: &str, timestamp: &str, method: &str, request_path: &str, body: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ConnectorError::AuthenticationFailed(format!("HMAC init failed: {}", e)))?;

    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(request_path.as_bytes());
    mac.update(body.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
