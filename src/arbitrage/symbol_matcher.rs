//! Joins margin and derivative instrument lists on their base asset

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Instrument;

/// OKX separates the base asset with a hyphen (`BTC-USDT`, `BTC-USDT-SWAP`)
pub const DEFAULT_SYMBOL_SEPARATOR: char = '-';

/// Which instrument is kept when a venue lists a base asset more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later instruments silently replace earlier ones
    #[default]
    LastWins,
    FirstWins,
}

/// Instruments from both venues sharing one base asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub base: String,
    pub margin: Instrument,
    pub swap: Instrument,
}

#[derive(Debug, Clone)]
pub struct SymbolMatcher {
    separator: char,
    duplicate_policy: DuplicatePolicy,
}

impl Default for SymbolMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL_SEPARATOR, DuplicatePolicy::default())
    }
}

impl SymbolMatcher {
    pub fn new(separator: char, duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            separator,
            duplicate_policy,
        }
    }

    /// Pairs every base asset present on both venues, ordered by base asset
    pub fn match_pairs(&self, margin: &[Instrument], swap: &[Instrument]) -> Vec<MatchedPair> {
        let margin_by_base = self.index_by_base(margin);
        let swap_by_base = self.index_by_base(swap);

        let pairs: Vec<MatchedPair> = margin_by_base
            .into_iter()
            .filter_map(|(base, margin_inst)| {
                swap_by_base.get(base.as_str()).map(|swap_inst| MatchedPair {
                    base,
                    margin: margin_inst.clone(),
                    swap: (*swap_inst).clone(),
                })
            })
            .collect();

        debug!(
            "Matched {} pairs from {} margin and {} swap instruments",
            pairs.len(),
            margin.len(),
            swap.len()
        );
        pairs
    }

    fn index_by_base<'a>(&self, instruments: &'a [Instrument]) -> BTreeMap<String, &'a Instrument> {
        let mut index: BTreeMap<String, &Instrument> = BTreeMap::new();
        for inst in instruments {
            let base = extract_base_symbol(&inst.inst_id, self.separator).to_string();
            match self.duplicate_policy {
                DuplicatePolicy::LastWins => {
                    index.insert(base, inst);
                }
                DuplicatePolicy::FirstWins => {
                    index.entry(base).or_insert(inst);
                }
            }
        }
        index
    }
}

/// Leading token of an instrument id, or the whole id when it has no separator
pub fn extract_base_symbol(inst_id: &str, separator: char) -> &str {
    match inst_id.split_once(separator) {
        Some((base, _)) => base,
        None => inst_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VenueType;

    fn margin(id: &str) -> Instrument {
        Instrument::new(id, VenueType::Margin)
    }

    fn swap(id: &str) -> Instrument {
        Instrument::new(id, VenueType::Swap)
    }

    #[test]
    fn test_extract_base_symbol() {
        assert_eq!(extract_base_symbol("BTC-USDT", '-'), "BTC");
        assert_eq!(extract_base_symbol("ETH-USDT-SWAP", '-'), "ETH");
        assert_eq!(extract_base_symbol("SOLUSDT", '-'), "SOLUSDT");
        assert_eq!(extract_base_symbol("DOGE_USDT", '_'), "DOGE");
    }

    #[test]
    fn test_match_pairs_joins_on_base_asset() {
        let matcher = SymbolMatcher::default();
        let margins = vec![margin("BTC-USDT"), margin("ETH-USDT"), margin("XRP-USDT")];
        let swaps = vec![swap("ETH-USDT-SWAP"), swap("BTC-USDT-SWAP"), swap("ADA-USDT-SWAP")];

        let pairs = matcher.match_pairs(&margins, &swaps);

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].base, "BTC");
        assert_eq!(pairs[0].margin.inst_id, "BTC-USDT");
        assert_eq!(pairs[0].swap.inst_id, "BTC-USDT-SWAP");
        assert_eq!(pairs[1].base, "ETH");
    }

    #[test]
    fn test_unmatched_and_empty_inputs_produce_no_pairs() {
        let matcher = SymbolMatcher::default();
        assert!(matcher.match_pairs(&[], &[swap("BTC-USDT-SWAP")]).is_empty());
        assert!(matcher
            .match_pairs(&[margin("BTC-USDT")], &[swap("ETH-USDT-SWAP")])
            .is_empty());
    }

    #[test]
    fn test_duplicate_base_last_wins_by_default() {
        let matcher = SymbolMatcher::default();
        let swaps = vec![swap("BTC-USD-SWAP"), swap("BTC-USDT-SWAP")];

        let pairs = matcher.match_pairs(&[margin("BTC-USDT")], &swaps);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].swap.inst_id, "BTC-USDT-SWAP");
    }

    #[test]
    fn test_duplicate_base_first_wins_when_configured() {
        let matcher = SymbolMatcher::new('-', DuplicatePolicy::FirstWins);
        let swaps = vec![swap("BTC-USD-SWAP"), swap("BTC-USDT-SWAP")];

        let pairs = matcher.match_pairs(&[margin("BTC-USDT")], &swaps);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].swap.inst_id, "BTC-USD-SWAP");
    }
}
