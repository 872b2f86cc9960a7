//! Overlays a reference price snapshot onto instrument metadata

use crate::types::{Instrument, PriceSnapshot};

/// Returns the instruments with snapshot prices applied where the snapshot has one
pub fn fuse(instruments: &[Instrument], snapshot: &PriceSnapshot) -> Vec<Instrument> {
    instruments
        .iter()
        .map(|inst| {
            let mut fused = inst.clone();
            if let Some(price) = snapshot.get(&inst.inst_id).and_then(|p| p.price) {
                fused.reference_price = Some(price);
            }
            fused
        })
        .collect()
}
