/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::{InvalidInputError, InvariantViolationError};
use crate::relation::Relation;
use ra_data_structures::prelude::{VariableIndex, VariableList};
use ra_hypergraph::{Incidence, VariableGraph};
use std::cmp::Ordering;

/// A sorted-unique, non-empty set of [`Relation`]s: one RA model
/// hypothesis. Two models are equal iff their relation sets are equal;
/// `Ord` is defined lexicographically over the canonical [`Model::print_name`]
/// so that neighbour generation and search results are fully reproducible
/// (see the tie-break open question resolved in `SPEC_FULL.md`).
#[derive(Debug, Clone)]
pub struct Model {
    relations: Vec<Relation>,
}

impl Model {
    /// Sorts relations (lexicographically over their variable sets) and
    /// deduplicates by equality; rejects an empty model.
    pub fn new(mut relations: Vec<Relation>) -> Result<Self, InvariantViolationError> {
        if relations.is_empty() {
            return Err(InvariantViolationError::EmptyModel);
        }
        relations.sort();
        relations.dedup();
        Ok(Self { relations })
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every variable index mentioned by any relation, sorted and
    /// deduplicated.
    pub fn variables(&self) -> Vec<VariableIndex> {
        let mut vars: Vec<VariableIndex> = self.relations.iter().flat_map(|r| r.variables().iter().copied()).collect();
        vars.sort();
        vars.dedup();
        vars
    }

    pub fn print_name(&self, list: &VariableList) -> String {
        self.relations.iter().map(|r| r.print_name(list)).collect::<Vec<_>>().join(":")
    }

    /// `true` iff the relation hypergraph is acyclic (Graham-reducible to
    /// empty): its unique-projection closed form exists without IPF.
    pub fn is_loopless(&self) -> bool {
        let relation_sets: Vec<Vec<VariableIndex>> = self.relations.iter().map(|r| r.variables().to_vec()).collect();
        Incidence::new(&relation_sets).is_loopless()
    }

    /// `true` iff every relation has exactly two variables and the
    /// induced variable graph is a simple path.
    pub fn is_chain(&self) -> bool {
        if !self.relations.iter().all(|r| r.len() == 2) {
            return false;
        }
        let edges: Vec<[VariableIndex; 2]> = self
            .relations
            .iter()
            .map(|r| {
                let vars = r.variables();
                [vars[0], vars[1]]
            })
            .collect();
        VariableGraph::from_two_variable_relations(&edges).is_chain()
    }

    /// `true` iff every pair of relations is variable-disjoint.
    pub fn is_disjoint(&self) -> bool {
        for i in 0..self.relations.len() {
            for j in (i + 1)..self.relations.len() {
                if self.relations[i].intersects(&self.relations[j]) {
                    return false;
                }
            }
        }
        true
    }

    /// Degrees of freedom via inclusion-exclusion over the relations'
    /// variable sets (standard hierarchical log-linear model DF formula):
    /// `DF = Σ_{∅≠S⊆relations} (-1)^(|S|+1) · df(∩_{r∈S} vars(r))`, where
    /// `df(V) = Π_{v∈V} cardinality(v) − 1` (an empty intersection
    /// contributes `df(∅) = 0`).
    pub fn compute_df(&self, list: &VariableList) -> Result<f64, InvalidInputError> {
        let n = self.relations.len();
        let mut total = 0.0;
        for mask in 1u32..(1u32 << n) {
            let mut intersection: Option<Vec<VariableIndex>> = None;
            let mut bits_set = 0u32;
            for (i, relation) in self.relations.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    bits_set += 1;
                    intersection = Some(match intersection {
                        None => relation.variables().to_vec(),
                        Some(acc) => acc.into_iter().filter(|v| relation.contains(*v)).collect(),
                    });
                }
            }
            let vars = intersection.unwrap_or_default();
            let mut product = 1.0;
            for v in vars {
                let variable = list.get(v).map_err(|_| InvalidInputError::UnknownAbbrev(v.to_string()))?;
                product *= variable.cardinality().get() as f64;
            }
            let df = product - 1.0;
            let sign = if bits_set % 2 == 1 { 1.0 } else { -1.0 };
            total += sign * df;
        }
        Ok(total)
    }

    /// Enumerates all distinct chain models over `list`'s variables: one
    /// per permutation of the variable indices, identifying a permutation
    /// with its reverse (`n!/2` chains for `n ≥ 2`, `0` for `n ≤ 1`).
    pub fn generate_all_chains(list: &VariableList) -> Vec<Model> {
        let n = list.len();
        if n < 2 {
            return Vec::new();
        }
        let indices: Vec<VariableIndex> = (0..n).map(VariableIndex::new).collect();
        let mut permutations = Vec::new();
        permute(&indices, &mut Vec::new(), &mut vec![false; n], &mut permutations);

        let mut seen_reversed = std::collections::HashSet::new();
        let mut chains = Vec::new();
        for perm in permutations {
            let mut reversed = perm.clone();
            reversed.reverse();
            if seen_reversed.contains(&reversed) {
                continue;
            }
            seen_reversed.insert(perm.clone());

            let relations: Vec<Relation> = perm.windows(2).map(|w| Relation::new(vec![w[0], w[1]]).expect("adjacent pair is non-empty")).collect();
            chains.push(Model::new(relations).expect("chain has at least one relation for n >= 2"));
        }
        chains
    }
}

fn permute(remaining: &[VariableIndex], current: &mut Vec<VariableIndex>, used: &mut [bool], out: &mut Vec<Vec<VariableIndex>>) {
    if current.len() == remaining.len() {
        out.push(current.clone());
        return;
    }
    for i in 0..remaining.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(remaining[i]);
        permute(remaining, current, used, out);
        current.pop();
        used[i] = false;
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.relations == other.relations
    }
}

impl Eq for Model {}

impl std::hash::Hash for Model {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.relations.hash(state);
    }
}

impl PartialOrd for Model {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Model {
    fn cmp(&self, other: &Self) -> Ordering {
        self.relations.cmp(&other.relations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_data_structures::prelude::{Cardinality, VarType, Variable, VariableList};

    fn binary_list(n: usize) -> VariableList {
        let vars = (0..n)
            .map(|i| {
                let abbrev = char::from(b'A' + i as u8).to_string();
                Variable::new(abbrev.clone(), abbrev, Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap()
            })
            .collect();
        VariableList::new(vars).unwrap()
    }

    fn rel(vars: &[usize]) -> Relation {
        Relation::new(vars.iter().map(|&i| VariableIndex::new(i)).collect()).unwrap()
    }

    #[test]
    fn loopless_detection_matches_scenario_5() {
        let ab_bc = Model::new(vec![rel(&[0, 1]), rel(&[1, 2])]).unwrap();
        assert!(ab_bc.is_loopless());

        let triangle = Model::new(vec![rel(&[0, 1]), rel(&[1, 2]), rel(&[0, 2])]).unwrap();
        assert!(!triangle.is_loopless());
    }

    #[test]
    fn chain_detection_matches_scenario_6() {
        let path = Model::new(vec![rel(&[0, 1]), rel(&[1, 2]), rel(&[2, 3])]).unwrap();
        assert!(path.is_chain());

        let star = Model::new(vec![rel(&[0, 1]), rel(&[0, 2]), rel(&[0, 3])]).unwrap();
        assert!(!star.is_chain());
    }

    #[test]
    fn chain_implies_loopless() {
        let path = Model::new(vec![rel(&[0, 1]), rel(&[1, 2]), rel(&[2, 3])]).unwrap();
        assert!(path.is_chain());
        assert!(path.is_loopless());
    }

    #[test]
    fn single_two_variable_relation_is_always_a_chain() {
        let model = Model::new(vec![rel(&[0, 1])]).unwrap();
        assert!(model.is_chain());
    }

    #[test]
    fn chain_enumeration_counts_match_n_factorial_over_two() {
        // generateAllChains(n) == 0, 1, 3, 12, 60 for n = 1..5 (spec.md §8).
        let expected = [0usize, 1, 3, 12, 60];
        for (i, &expected_count) in expected.iter().enumerate() {
            let n = i + 1;
            let list = binary_list(n);
            let chains = Model::generate_all_chains(&list);
            assert_eq!(chains.len(), expected_count, "n={n}");
        }
    }

    #[test]
    fn disjoint_predicate_rejects_shared_variables() {
        let disjoint = Model::new(vec![rel(&[0, 1]), rel(&[2, 3])]).unwrap();
        assert!(disjoint.is_disjoint());

        let overlapping = Model::new(vec![rel(&[0, 1]), rel(&[1, 2])]).unwrap();
        assert!(!overlapping.is_disjoint());
    }

    #[test]
    fn df_of_two_independent_binary_relations_is_two() {
        let list = binary_list(2);
        let model = Model::new(vec![rel(&[0]), rel(&[1])]).unwrap();
        assert_eq!(model.compute_df(&list).unwrap(), 2.0);
    }
}
