//! Theoretical divergence between margin and derivative reference prices

use log::warn;
use rust_decimal::Decimal;

use super::symbol_matcher::MatchedPair;
use crate::types::{DiffResult, TermStructure};

/// Percent difference of two prices relative to their mean, `None` when the
/// result does not fit a `Decimal`
pub fn percent_diff(a: Decimal, b: Decimal) -> Option<Decimal> {
    let mean = a.checked_add(b)?.checked_div(Decimal::TWO)?;
    Decimal::ONE_HUNDRED
        .checked_mul(b.checked_sub(a)?.abs())?
        .checked_div(mean)
}

/// Diff for a single pair, `None` when either price is missing or non-positive
pub fn compute_diff(pair: &MatchedPair) -> Option<DiffResult> {
    let Some(margin_price) = pair.margin.reference_price else {
        warn!("Skipping {}: no usable reference price for {}", pair.base, pair.margin.inst_id);
        return None;
    };
    let Some(swap_price) = pair.swap.reference_price else {
        warn!("Skipping {}: no usable reference price for {}", pair.base, pair.swap.inst_id);
        return None;
    };
    if margin_price <= Decimal::ZERO || swap_price <= Decimal::ZERO {
        return None;
    }

    let Some(pct) = percent_diff(margin_price, swap_price) else {
        warn!("Skipping {}: price difference overflows", pair.base);
        return None;
    };

    let actual_diff = swap_price - margin_price;
    let term_structure = if actual_diff > Decimal::ZERO {
        TermStructure::Contango
    } else {
        TermStructure::Backwardation
    };

    Some(DiffResult {
        base: pair.base.clone(),
        margin_price,
        swap_price,
        actual_diff,
        percent_diff: pct,
        term_structure,
    })
}

/// Top `top_n` diffs at or above `min_diff_pct`, largest first.
///
/// Equal percentages are ordered by base asset so repeated runs over the
/// same input give the same ranking.
pub fn compute_diffs(pairs: &[MatchedPair], top_n: usize, min_diff_pct: Decimal) -> Vec<DiffResult> {
    let mut diffs: Vec<DiffResult> = pairs
        .iter()
        .filter_map(compute_diff)
        .filter(|d| d.percent_diff >= min_diff_pct)
        .collect();

    diffs.sort_by(|a, b| {
        b.percent_diff
            .cmp(&a.percent_diff)
            .then_with(|| a.base.cmp(&b.base))
    });
    diffs.truncate(top_n);
    diffs
}
