/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::NumericDivergenceError;
use crate::relation::Relation;
use ra_data_structures::prelude::{ContingencyTable, Key, VariableIndex, VariableList};

const MAX_ITERATIONS: usize = 1_000;
const CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// Every key in the full joint state space of `list` (cartesian product
/// of all variable domains), sorted. Grows as `Π cardinalities`, so this
/// is only tractable for the small-to-moderate variable counts RA model
/// search operates on.
pub fn enumerate_full_joint_space(list: &VariableList) -> Vec<Key> {
    let cardinalities: Vec<u32> = list.variables().iter().map(|v| v.cardinality().get()).collect();
    let mut out = Vec::new();
    let mut current = vec![0u32; cardinalities.len()];
    enumerate_rec(list, &cardinalities, &mut current, 0, &mut out);
    out
}

fn enumerate_rec(list: &VariableList, cardinalities: &[u32], current: &mut Vec<u32>, position: usize, out: &mut Vec<Key>) {
    if position == cardinalities.len() {
        out.push(Key::from_values(list, current).expect("values within declared cardinality"));
        return;
    }
    for value in 0..cardinalities[position] {
        current[position] = value;
        enumerate_rec(list, cardinalities, current, position + 1, out);
    }
}

/// Iterative Proportional Fitting: finds the maximum-entropy distribution
/// over `list`'s full joint space whose projection onto each relation in
/// `relations` matches the corresponding observed marginal in
/// `target_marginals` (same order). Converges in one sweep for a model
/// with a single relation spanning all variables; for loopless models in
/// general it converges quickly, for loopy models it may need many sweeps
/// or fail to converge within [`MAX_ITERATIONS`].
pub fn iterative_proportional_fitting(
    list: &VariableList,
    relations: &[Relation],
    target_marginals: &[ContingencyTable],
    model_name: &str,
) -> Result<ContingencyTable, NumericDivergenceError> {
    let joint_keys = enumerate_full_joint_space(list);
    let n = joint_keys.len() as f64;

    let mut current = ContingencyTable::with_capacity(joint_keys.len());
    for key in &joint_keys {
        current.add(key.clone(), 1.0 / n).expect("uniform keys share key_size");
    }
    current.sort();

    let mut max_relative_change = f64::INFINITY;
    let mut iterations_used = 0;

    for iteration in 0..MAX_ITERATIONS {
        iterations_used = iteration + 1;
        max_relative_change = 0.0;

        for (relation, target) in relations.iter().zip(target_marginals.iter()) {
            let current_marginal = project_table(list, &current, relation);

            let mut next = ContingencyTable::with_capacity(joint_keys.len());
            for (key, weight) in current.iter() {
                let projected = key.project(list, relation.variables());
                let target_weight = target.find(&projected).unwrap_or(0.0);
                let current_weight = current_marginal.find(&projected).unwrap_or(0.0);
                let new_weight = if current_weight > 0.0 { weight * target_weight / current_weight } else { 0.0 };
                if current_weight > 0.0 {
                    let relative_change = (new_weight - weight).abs() / current_weight.max(1e-300);
                    max_relative_change = max_relative_change.max(relative_change);
                }
                next.add(key.clone(), new_weight).expect("same key_size as current");
            }
            next.sort();
            current = next;
        }

        if max_relative_change < CONVERGENCE_TOLERANCE {
            log::debug!("IPF for model '{model_name}' converged after {iterations_used} iterations");
            return Ok(current);
        }
        if iterations_used % 100 == 0 {
            log::warn!("IPF for model '{model_name}' at {iterations_used} iterations, max relative change {max_relative_change:.3e}");
        }
    }

    Err(NumericDivergenceError { model_name: model_name.to_string(), iterations: iterations_used, max_relative_change })
}

fn project_table(list: &VariableList, table: &ContingencyTable, relation: &Relation) -> ContingencyTable {
    let keep: Vec<VariableIndex> = relation.variables().to_vec();
    table.project(list, &keep).expect("relation is non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_data_structures::prelude::{Cardinality, VarType, Variable};

    fn two_independent_binary() -> VariableList {
        let vars = vec![
            Variable::new("a", "A", Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap(),
            Variable::new("b", "B", Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap(),
        ];
        VariableList::new(vars).unwrap()
    }

    #[test]
    fn single_relation_spanning_all_variables_reproduces_input_exactly() {
        let list = two_independent_binary();
        let mut input = ContingencyTable::new();
        input.add(Key::from_values(&list, &[0, 0]).unwrap(), 0.1).unwrap();
        input.add(Key::from_values(&list, &[0, 1]).unwrap(), 0.2).unwrap();
        input.add(Key::from_values(&list, &[1, 0]).unwrap(), 0.3).unwrap();
        input.add(Key::from_values(&list, &[1, 1]).unwrap(), 0.4).unwrap();
        input.sort();

        let relation = Relation::new(vec![VariableIndex::new(0), VariableIndex::new(1)]).unwrap();
        let projection = iterative_proportional_fitting(&list, &[relation], &[input.clone()], "AB").unwrap();

        for (key, weight) in input.iter() {
            let got = projection.find(key).unwrap_or(0.0);
            assert!((got - weight).abs() < 1e-8, "expected {weight}, got {got}");
        }
    }

    #[test]
    fn two_independent_singleton_relations_reproduce_the_product_distribution() {
        let list = two_independent_binary();
        let mut input = ContingencyTable::new();
        input.add(Key::from_values(&list, &[0, 0]).unwrap(), 0.25).unwrap();
        input.add(Key::from_values(&list, &[0, 1]).unwrap(), 0.25).unwrap();
        input.add(Key::from_values(&list, &[1, 0]).unwrap(), 0.25).unwrap();
        input.add(Key::from_values(&list, &[1, 1]).unwrap(), 0.25).unwrap();
        input.sort();

        let relation_a = Relation::new(vec![VariableIndex::new(0)]).unwrap();
        let relation_b = Relation::new(vec![VariableIndex::new(1)]).unwrap();
        let marginal_a = input.project(&list, relation_a.variables()).unwrap();
        let marginal_b = input.project(&list, relation_b.variables()).unwrap();

        let projection = iterative_proportional_fitting(&list, &[relation_a, relation_b], &[marginal_a, marginal_b], "A:B").unwrap();

        for (key, _) in input.iter() {
            let got = projection.find(key).unwrap_or(0.0);
            assert!((got - 0.25).abs() < 1e-6, "got {got}");
        }
    }
}
