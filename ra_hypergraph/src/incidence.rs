// SPDX-License-Identifier: MIT
// Copyright (c) "2025" . Marvin Hansen <marvin.hansen@gmail.com> All rights reserved.

use ra_data_structures::prelude::VariableIndex;
use std::collections::{HashMap, HashSet};

/// Bipartite relation/variable incidence structure used to test the
/// loopless predicate (acyclicity of the relation hypergraph) via Graham
/// (GYO) reduction: repeatedly strip variables that appear in only one
/// remaining relation ("ears") and drop relations that are subsets of
/// another remaining relation, until nothing changes. The hypergraph is
/// loopless iff this process reduces every relation to empty.
#[derive(Debug, Clone)]
pub struct Incidence {
    relations: Vec<HashSet<VariableIndex>>,
}

impl Incidence {
    pub fn new(relations: &[Vec<VariableIndex>]) -> Self {
        Self { relations: relations.iter().map(|r| r.iter().copied().collect()).collect() }
    }

    /// `true` iff the relation set is acyclic (Graham-reducible to empty).
    pub fn is_loopless(&self) -> bool {
        let mut relations = self.relations.clone();

        loop {
            let before: usize = relations.iter().map(|r| r.len()).sum::<usize>() + relations.len();

            strip_ears(&mut relations);
            drop_subsumed(&mut relations);
            relations.retain(|r| !r.is_empty());

            let after: usize = relations.iter().map(|r| r.len()).sum::<usize>() + relations.len();
            if after == before {
                break;
            }
        }

        relations.is_empty()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }
}

/// Removes every variable that occurs in exactly one of `relations` from
/// that relation.
fn strip_ears(relations: &mut [HashSet<VariableIndex>]) {
    let mut occurrence: HashMap<VariableIndex, usize> = HashMap::new();
    for relation in relations.iter() {
        for &var in relation {
            *occurrence.entry(var).or_insert(0) += 1;
        }
    }
    let ears: HashSet<VariableIndex> = occurrence.into_iter().filter(|&(_, count)| count == 1).map(|(var, _)| var).collect();
    for relation in relations.iter_mut() {
        relation.retain(|var| !ears.contains(var));
    }
}

/// Drops any relation that is a (non-strict) subset of another relation,
/// keeping one representative of any relations that are equal.
fn drop_subsumed(relations: &mut Vec<HashSet<VariableIndex>>) {
    let mut keep = vec![true; relations.len()];
    for i in 0..relations.len() {
        if !keep[i] {
            continue;
        }
        for j in 0..relations.len() {
            if i == j || !keep[j] {
                continue;
            }
            let strictly_smaller_or_equal_with_lower_index = relations[i].is_subset(&relations[j]) && (relations[i].len() < relations[j].len() || i < j);
            if strictly_smaller_or_equal_with_lower_index {
                keep[i] = false;
                break;
            }
        }
    }
    let mut iter = keep.into_iter();
    relations.retain(|_| iter.next().unwrap());
}
