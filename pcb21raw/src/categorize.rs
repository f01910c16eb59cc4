//!
//! # Net Categorization
//!
//! Pin-count bucketing of finalized nets, and the per-bucket pin-occurrence
//! tally reported at elevated verbosity.
//!

// Std-Lib
use std::collections::{BTreeMap, HashMap};

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::data::{Net, NetId};

/// # Net Category Index
///
/// Read-only mapping from pin-count bucket to nets, built once per parse.
/// Iteration runs buckets in ascending pin-count order; within a bucket, nets
/// keep their discovery order. Nets with zero pins are never entered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetCategoryIndex {
    buckets: BTreeMap<usize, Vec<NetId>>,
}
impl NetCategoryIndex {
    /// Build an index from `nets`, bucketing each by its observed pin count.
    /// Pin-less nets are skipped.
    pub fn from_nets(nets: &[Net]) -> Self {
        let mut index = Self::default();
        for net in nets {
            if !net.pins.is_empty() {
                index.insert(net.pins.len(), net.id);
            }
        }
        index
    }
    /// File `id` under `bucket`.
    /// Callers hold the no-empty-nets invariant; the parsers only ever call
    /// this for nets with at least one pin.
    pub(crate) fn insert(&mut self, bucket: usize, id: NetId) {
        self.buckets.entry(bucket).or_default().push(id);
    }
    /// Iterate (bucket, nets) pairs in ascending bucket order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[NetId])> {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }
    /// Get the nets filed under `bucket`
    pub fn bucket(&self, bucket: usize) -> &[NetId] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }
    /// Number of non-empty buckets
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }
    /// Total net count across all buckets
    pub fn total_nets(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Per-bucket occurrence tally.
///
/// For each bucket in `index`, counts the raw occurrences of each pin's
/// component-instance token across all of the bucket's nets. Occurrences, not
/// distinct nets: a component contributing three pins to one net counts three
/// times. Keys are sorted for stable emission.
pub fn pin_occurrences(
    index: &NetCategoryIndex,
    nets: &[Net],
) -> BTreeMap<usize, BTreeMap<String, usize>> {
    let by_id: HashMap<NetId, &Net> = nets.iter().map(|n| (n.id, n)).collect();
    let mut tallies = BTreeMap::new();
    for (bucket, ids) in index.iter() {
        let tally: &mut BTreeMap<String, usize> = tallies.entry(bucket).or_default();
        for id in ids {
            let Some(net) = by_id.get(id) else { continue };
            for pin in &net.pins {
                *tally.entry(pin.component.clone()).or_insert(0) += 1;
            }
        }
    }
    tallies
}
