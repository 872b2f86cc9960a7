//! OKX response parsing
//!
//! Every decimal string the venue sends is converted here, once. Empty or
//! malformed numbers become `None` on optional fields and a
//! `DataParsingError` on required ones.

use log::{debug, warn};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::constants::SUCCESS_CODE;
use crate::types::*;

/// `{code, msg, data}` wrapper shared by every v5 endpoint
#[derive(Debug, Deserialize)]
pub struct OkxEnvelope<T> {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> OkxEnvelope<T> {
    pub fn into_data(self) -> Result<Vec<T>, ConnectorError> {
        if self.code != SUCCESS_CODE {
            return Err(ConnectorError::ApiError {
                code: self.code,
                msg: self.msg,
            });
        }
        Ok(self.data)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkxBookData {
    #[serde(default)]
    pub inst_id: String,
    #[serde(default)]
    pub bids: Vec<Vec<String>>,
    #[serde(default)]
    pub asks: Vec<Vec<String>>,
    #[serde(default)]
    pub ts: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkxFundingData {
    pub inst_id: String,
    pub funding_rate: String,
    pub next_funding_time: String,
}

#[derive(Debug, Deserialize)]
pub struct OkxTradeFeeData {
    #[serde(default)]
    pub taker: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkxInterestRateData {
    pub ccy: String,
    pub interest_rate: String,
}

pub struct OkxMessageParser;

impl OkxMessageParser {
    /// Decodes an envelope and returns its `data` array, failing on a non-zero code
    pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ConnectorError> {
        let envelope: OkxEnvelope<T> = serde_json::from_str(body)?;
        envelope.into_data()
    }

    /// Live instruments from an instruments listing, optionally filtered by quote currency
    pub fn parse_instruments(
        body: &str,
        venue: VenueType,
        quote_ccy: Option<&str>,
    ) -> Result<Vec<Instrument>, ConnectorError> {
        let raw: Vec<Map<String, Value>> = Self::parse_envelope(body)?;
        let total = raw.len();

        let instruments: Vec<Instrument> = raw
            .into_iter()
            .map(|entry| Self::parse_instrument(entry, venue))
            .filter(|inst| inst.state.is_live())
            .filter(|inst| quote_ccy.map_or(true, |q| q.is_empty() || inst.quote_ccy == q))
            .filter(|inst| !inst.inst_id.is_empty())
            .collect();

        debug!("{} instruments: {} of {} kept", venue, instruments.len(), total);
        Ok(instruments)
    }

    /// Splits typed fields out of a raw instrument object; the rest goes to `extra`
    pub fn parse_instrument(mut raw: Map<String, Value>, venue: VenueType) -> Instrument {
        let mut inst = Instrument::new(&take_string(&mut raw, "instId"), venue);
        raw.remove("instType");
        inst.base_ccy = take_string(&mut raw, "baseCcy");
        inst.quote_ccy = take_string(&mut raw, "quoteCcy");
        inst.state = InstrumentState::from_api_string(&take_string(&mut raw, "state"));
        inst.reference_price = parse_decimal(&take_string(&mut raw, "markPx"));
        inst.leverage = parse_decimal(&take_string(&mut raw, "lever"));
        inst.lot_size = parse_decimal(&take_string(&mut raw, "lotSz"));
        inst.tick_size = parse_decimal(&take_string(&mut raw, "tickSz"));
        inst.min_size = parse_decimal(&take_string(&mut raw, "minSz"));
        inst.max_size = parse_decimal(&take_string(&mut raw, "maxSz"));
        inst.extra = raw.into_iter().collect();
        inst
    }

    /// Mark prices keyed by instrument id
    pub fn parse_mark_prices(body: &str) -> Result<PriceSnapshot, ConnectorError> {
        let raw: Vec<Map<String, Value>> = Self::parse_envelope(body)?;

        let snapshot: PriceSnapshot = raw
            .into_iter()
            .filter_map(|mut entry| {
                let inst_id = take_string(&mut entry, "instId");
                if inst_id.is_empty() {
                    return None;
                }
                let price = parse_decimal(&take_string(&mut entry, "markPx"));
                let timestamp_ms = take_string(&mut entry, "ts").parse::<i64>().ok();
                Some((
                    inst_id.clone(),
                    ReferencePrice {
                        inst_id,
                        price,
                        timestamp_ms,
                        extra: entry.into_iter().collect(),
                    },
                ))
            })
            .collect();

        Ok(snapshot)
    }

    pub fn parse_order_book(body: &str, requested_inst_id: &str) -> Result<OrderBook, ConnectorError> {
        let data: Vec<OkxBookData> = Self::parse_envelope(body)?;
        let book = data.into_iter().next().ok_or_else(|| {
            ConnectorError::InvalidResponse(format!("no order book data for {}", requested_inst_id))
        })?;

        let inst_id = if book.inst_id.is_empty() {
            requested_inst_id
        } else {
            book.inst_id.as_str()
        };
        let timestamp_ms = book.ts.parse::<i64>().unwrap_or_default();

        Ok(OrderBook::new(
            inst_id,
            parse_levels(&book.bids),
            parse_levels(&book.asks),
            timestamp_ms,
        ))
    }

    pub fn parse_funding(body: &str) -> Result<FundingQuote, ConnectorError> {
        let data: Vec<OkxFundingData> = Self::parse_envelope(body)?;
        let entry = data
            .into_iter()
            .next()
            .ok_or_else(|| ConnectorError::InvalidResponse("empty funding rate data".to_string()))?;

        let rate = parse_decimal(&entry.funding_rate).ok_or_else(|| {
            ConnectorError::DataParsingError(format!("fundingRate '{}'", entry.funding_rate))
        })?;
        let next_funding_time_ms = entry.next_funding_time.parse::<i64>().map_err(|e| {
            ConnectorError::DataParsingError(format!("nextFundingTime '{}': {}", entry.next_funding_time, e))
        })?;

        Ok(FundingQuote {
            inst_id: entry.inst_id,
            rate,
            next_funding_time_ms,
        })
    }

    /// Taker fee as a positive fraction, `None` when absent or zero.
    ///
    /// OKX reports charged fees as negative numbers (`"-0.001"`).
    pub fn parse_taker_fee(body: &str) -> Result<Option<Decimal>, ConnectorError> {
        let data: Vec<OkxTradeFeeData> = Self::parse_envelope(body)?;
        Ok(data
            .first()
            .and_then(|entry| parse_decimal(&entry.taker))
            .map(|fee| fee.abs())
            .filter(|fee| !fee.is_zero()))
    }

    pub fn parse_interest_rates(body: &str) -> Result<BorrowRates, ConnectorError> {
        let data: Vec<OkxInterestRateData> = Self::parse_envelope(body)?;
        let mut rates = BorrowRates::with_capacity(data.len());
        for entry in data {
            match parse_decimal(&entry.interest_rate) {
                Some(rate) => {
                    rates.insert(entry.ccy, rate);
                }
                None => warn!("Unparseable interest rate for {}: '{}'", entry.ccy, entry.interest_rate),
            }
        }
        Ok(rates)
    }
}

/// Decimal from venue text; accepts plain and scientific notation
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// `[px, sz, liquidatedOrders, numOrders]` rows; malformed rows are skipped.
///
/// Short rows fall back to index 2, but only a non-zero value there counts:
/// the deprecated liquidated-orders field is always "0".
fn parse_levels(rows: &[Vec<String>]) -> Vec<OrderBookLevel> {
    rows.iter()
        .filter_map(|row| {
            let price = parse_decimal(row.first()?)?;
            let size = parse_decimal(row.get(1)?)?;
            let count = |i: usize| row.get(i).and_then(|v| v.parse::<u32>().ok());
            let orders = match count(3) {
                Some(n) => n,
                None => count(2).filter(|n| *n > 0).unwrap_or(1),
            };
            Some(OrderBookLevel::new(price, size, orders))
        })
        .collect()
}

fn take_string(raw: &mut Map<String, Value>, key: &str) -> String {
    match raw.remove(key) {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            // keep non-textual values visible to passthrough consumers
            raw.insert(key.to_string(), other);
            String::new()
        }
        None => String::new(),
    }
}
