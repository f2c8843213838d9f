/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::TableError;
use crate::key::Key;
use crate::types::VariableIndex;
use crate::variable::VariableList;
use std::collections::BTreeMap;

/// A sparse contingency table: a sorted-by-key list of `(Key, weight)`
/// pairs. Weights are observed counts before [`ContingencyTable::normalize`]
/// turns them into a probability distribution.
///
/// Entries are kept sorted after every mutating call so that two tables
/// over the same variable list can be compared or merged by a linear scan
/// rather than a lookup per key — the same reasoning `dcl_data_structures`
/// applies to keeping `Grid` storage contiguous.
#[derive(Debug, Clone, Default)]
pub struct ContingencyTable {
    entries: Vec<(Key, f64)>,
    key_size: Option<usize>,
}

impl ContingencyTable {
    pub fn new() -> Self {
        Self { entries: Vec::new(), key_size: None }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity), key_size: None }
    }

    /// Appends a `(key, weight)` observation. Does not merge duplicate
    /// keys or keep the table sorted — call [`ContingencyTable::sort`]
    /// before relying on ordering.
    pub fn add(&mut self, key: Key, weight: f64) -> Result<(), TableError> {
        let size = key.words().len();
        match self.key_size {
            None => self.key_size = Some(size),
            Some(expected) if expected != size => {
                return Err(TableError::KeySizeMismatch { expected, actual: size });
            }
            Some(_) => {}
        }
        self.entries.push((key, weight));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Stable-sorts entries by key, then merges duplicate keys by summing
    /// their weights (spec.md §4.2). After this call, keys are strictly
    /// increasing and [`ContingencyTable::find`] is a valid binary search.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        let mut merged: Vec<(Key, f64)> = Vec::with_capacity(self.entries.len());
        for (key, weight) in self.entries.drain(..) {
            match merged.last_mut() {
                Some((last_key, last_weight)) if *last_key == key => *last_weight += weight,
                _ => merged.push((key, weight)),
            }
        }
        self.entries = merged;
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Key, f64)> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&(Key, f64)> {
        self.entries.get(index)
    }

    /// O(log n) lookup by key. Only correct once the table is sorted
    /// (see [`ContingencyTable::sort`]); the weight is `0.0` for a key the
    /// table has no entry for.
    pub fn find(&self, key: &Key) -> Option<f64> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key)).ok().map(|i| self.entries[i].1)
    }

    /// Rescales every weight so the table sums to 1.0. Fails if the table's
    /// total weight is non-positive.
    pub fn normalize(&mut self) -> Result<(), TableError> {
        let total = self.sum();
        if total <= 0.0 {
            return Err(TableError::ZeroSumNormalization);
        }
        for (_, w) in self.entries.iter_mut() {
            *w /= total;
        }
        Ok(())
    }

    /// Marginalizes this table onto `keep`, summing the weight of every
    /// entry that agrees on the kept variables. The maximum-entropy
    /// projection a relation induces on a dataset: every dropped variable
    /// becomes `DONT_CARE` in the projected key, then identical keys are
    /// merged by summation.
    pub fn project(&self, list: &VariableList, keep: &[VariableIndex]) -> Result<Self, TableError> {
        if keep.is_empty() {
            return Err(TableError::EmptyProjectionSubset);
        }
        let mut accum: BTreeMap<Key, f64> = BTreeMap::new();
        for (key, weight) in &self.entries {
            let projected = key.project(list, keep);
            *accum.entry(projected).or_insert(0.0) += weight;
        }
        let entries: Vec<(Key, f64)> = accum.into_iter().collect();
        Ok(Self { entries, key_size: self.key_size })
    }
}
