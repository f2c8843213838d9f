/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::model::Model;
use ra_data_structures::prelude::VariableList;
use std::collections::HashSet;

/// Which neighbours of a seed model [`generate_neighbors`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchFilter {
    /// Accept every refinement, loopy or not.
    Full,
    /// Reject a refinement whose relation hypergraph has a loop
    /// ([`Model::is_loopless`]).
    Loopless,
    /// Accept only refinements whose relations remain pairwise disjoint.
    Disjoint,
    /// Accept only refinements that are themselves a chain model.
    Chain,
}

/// Enumerates the neighbours of `model`: for each relation `r` and each
/// variable `v` not already in `r`, the model `(model \ {r}) ∪ {r ∪ {v}}`
/// — "refine one relation by adding one variable" (spec.md §4.7) — kept
/// only if it passes `filter`, then deduplicated by canonical model
/// identity and sorted by [`Model::cmp`] so that search results are a
/// reproducible function of the seed model (spec.md §9's tie-break open
/// question).
pub fn generate_neighbors(model: &Model, list: &VariableList, filter: SearchFilter) -> Vec<Model> {
    let all_variables = list.iter().map(|(index, _)| index).collect::<Vec<_>>();
    let mut seen = HashSet::new();
    let mut neighbors = Vec::new();

    for (relation_index, relation) in model.relations().iter().enumerate() {
        for &variable in &all_variables {
            if relation.contains(variable) {
                continue;
            }
            let refined = relation.with_variable_added(variable);
            let mut relations: Vec<_> = model.relations().to_vec();
            relations[relation_index] = refined;
            let Ok(candidate) = Model::new(relations) else {
                continue;
            };
            if !passes(&candidate, filter) {
                continue;
            }
            if seen.insert(candidate.clone()) {
                neighbors.push(candidate);
            }
        }
    }

    neighbors.sort();
    neighbors
}

/// The inverse operator [`crate::driver::Direction::Descending`] search
/// uses: for each relation `r` with `|r| >= 2` and each variable `v ∈ r`,
/// the model `(model \ {r}) ∪ {r \ {v}}` — coarsening one relation by
/// dropping one variable, the mirror image of [`generate_neighbors`]'s
/// refinement. Relations that would become empty are simply dropped
/// (a coarsened model may end up with fewer relations than the seed).
pub fn generate_coarser_neighbors(model: &Model, filter: SearchFilter) -> Vec<Model> {
    let mut seen = HashSet::new();
    let mut neighbors = Vec::new();

    for (relation_index, relation) in model.relations().iter().enumerate() {
        if relation.len() < 2 {
            continue;
        }
        for &variable in relation.variables() {
            let remaining: Vec<_> = relation.variables().iter().copied().filter(|&v| v != variable).collect();
            let mut relations: Vec<_> = model.relations().to_vec();
            relations.remove(relation_index);
            if let Ok(shrunk) = crate::relation::Relation::new(remaining) {
                relations.push(shrunk);
            }
            let Ok(candidate) = Model::new(relations) else {
                continue;
            };
            if !passes(&candidate, filter) {
                continue;
            }
            if seen.insert(candidate.clone()) {
                neighbors.push(candidate);
            }
        }
    }

    neighbors.sort();
    neighbors
}

fn passes(candidate: &Model, filter: SearchFilter) -> bool {
    match filter {
        SearchFilter::Full => true,
        SearchFilter::Loopless => candidate.is_loopless(),
        SearchFilter::Disjoint => candidate.is_disjoint(),
        SearchFilter::Chain => candidate.is_chain(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Relation;
    use ra_data_structures::prelude::{Cardinality, VarType, Variable, VariableIndex};

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
    fn full_filter_accepts_every_refinement() {
        let list = binary_list(3);
        let seed = Model::new(vec![rel(&[0]), rel(&[1]), rel(&[2])]).unwrap();
        let neighbors = generate_neighbors(&seed, &list, SearchFilter::Full);
        // 3 relations * 2 other variables each = 6 candidate refinements,
        // none collide after sort+dedup since each grows a distinct relation.
        assert_eq!(neighbors.len(), 6);
    }

    #[test]
    fn loopless_filter_rejects_refinements_that_close_a_loop() {
        let list = binary_list(3);
        let seed = Model::new(vec![rel(&[0, 1]), rel(&[1, 2])]).unwrap();
        let neighbors = generate_neighbors(&seed, &list, SearchFilter::Loopless);
        assert!(neighbors.iter().all(|m| m.is_loopless()));
        // Refining AB -> ABC or BC -> ABC both close the A-B-C triangle
        // once the third edge is implied; the surviving neighbours must
        // all still be loopless.
    }

    #[test]
    fn chain_filter_keeps_only_chain_models() {
        let list = binary_list(4);
        let seed = Model::new(vec![rel(&[0, 1]), rel(&[2, 3])]).unwrap();
        let neighbors = generate_neighbors(&seed, &list, SearchFilter::Chain);
        assert!(neighbors.iter().all(|m| m.is_chain()));
    }

    #[test]
    fn disjoint_filter_keeps_only_pairwise_disjoint_relations() {
        let list = binary_list(3);
        let seed = Model::new(vec![rel(&[0]), rel(&[1]), rel(&[2])]).unwrap();
        let neighbors = generate_neighbors(&seed, &list, SearchFilter::Disjoint);
        assert!(neighbors.iter().all(|m| m.is_disjoint()));
    }

    #[test]
    fn coarser_neighbors_drop_one_variable_from_a_relation() {
        let list = binary_list(3);
        let seed = Model::new(vec![rel(&[0, 1, 2])]).unwrap();
        let neighbors = generate_coarser_neighbors(&seed, SearchFilter::Full);
        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.iter().all(|m| m.relations()[0].len() == 2));
    }

    #[test]
    fn coarser_neighbors_skip_singleton_relations() {
        let seed = Model::new(vec![rel(&[0]), rel(&[1])]).unwrap();
        let neighbors = generate_coarser_neighbors(&seed, SearchFilter::Full);
        assert!(neighbors.is_empty());
    }

    #[test]
    fn result_is_deduplicated_and_sorted() {
        let list = binary_list(3);
        let seed = Model::new(vec![rel(&[0]), rel(&[1]), rel(&[2])]).unwrap();
        let neighbors = generate_neighbors(&seed, &list, SearchFilter::Full);
        let mut sorted_copy = neighbors.clone();
        sorted_copy.sort();
        assert_eq!(neighbors, sorted_copy);
        let unique: HashSet<_> = neighbors.iter().cloned().collect();
        assert_eq!(unique.len(), neighbors.len());
    }
}
