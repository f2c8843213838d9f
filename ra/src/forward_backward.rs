/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::InvalidInputError;
use crate::model::Model;
use crate::relation::Relation;
use crate::vb_manager::VBManager;
use ra_data_structures::prelude::{ContingencyTable, Key, VariableIndex, VariableList};
use std::collections::HashMap;

/// Linear-time exact single-variable marginals for a detected chain
/// model, by forward and backward sweeps over its pairwise relations
/// (O(n·k²) where k is the maximum variable cardinality, versus O(kⁿ) for
/// direct joint marginalization).
pub struct ForwardBackward<'a> {
    list: &'a VariableList,
    order: Vec<VariableIndex>,
    edges: Vec<ContingencyTable>,
}

impl<'a> ForwardBackward<'a> {
    /// Builds the chain traversal order and fetches each consecutive
    /// pair's observed marginal from `manager`. `model` must satisfy
    /// [`Model::is_chain`].
    pub fn new(manager: &VBManager<'a>, model: &Model) -> Result<Self, InvalidInputError> {
        let order = chain_order(model)?;
        let edges = order
            .windows(2)
            .map(|w| {
                let relation = Relation::new(vec![w[0], w[1]]).expect("adjacent distinct variables");
                manager.compute_projection(&relation)
            })
            .collect();
        Ok(Self { list: manager.variable_list(), order, edges })
    }

    /// `α[i]`: the marginal of `order[i]` implied by the chain of
    /// conditionals `P(v0)·P(v1|v0)·…·P(vi|v_{i-1})`.
    pub fn forward_pass(&self) -> Vec<Vec<f64>> {
        let mut alpha = Vec::with_capacity(self.order.len());
        alpha.push(marginal_of_edge(self.list, &self.edges[0], self.order[0]));
        for i in 1..self.order.len() {
            let edge = &self.edges[i - 1];
            let prev = self.order[i - 1];
            let next = self.order[i];
            let conditional = conditional_given(self.list, edge, prev, next);
            let prev_marginal = &alpha[i - 1];
            let next_card = conditional[0].len();
            let mut next_marginal = vec![0.0; next_card];
            for (prev_value, &prev_weight) in prev_marginal.iter().enumerate() {
                for (next_value, slot) in next_marginal.iter_mut().enumerate() {
                    *slot += prev_weight * conditional[prev_value][next_value];
                }
            }
            alpha.push(next_marginal);
        }
        alpha
    }

    /// `β[i]`: the marginal of `order[i]` implied by the mirrored chain of
    /// conditionals built right-to-left.
    pub fn backward_pass(&self) -> Vec<Vec<f64>> {
        let n = self.order.len();
        let mut beta = vec![Vec::new(); n];
        beta[n - 1] = marginal_of_edge(self.list, &self.edges[n - 2], self.order[n - 1]);
        for i in (0..n - 1).rev() {
            let edge = &self.edges[i];
            let next = self.order[i + 1];
            let here = self.order[i];
            let conditional = conditional_given(self.list, edge, next, here);
            let next_marginal = &beta[i + 1];
            let here_card = conditional[0].len();
            let mut here_marginal = vec![0.0; here_card];
            for (next_value, &next_weight) in next_marginal.iter().enumerate() {
                for (here_value, slot) in here_marginal.iter_mut().enumerate() {
                    *slot += next_weight * conditional[next_value][here_value];
                }
            }
            beta[i] = here_marginal;
        }
        beta
    }

    /// Combines [`ForwardBackward::forward_pass`] and
    /// [`ForwardBackward::backward_pass`] into the `n` single-variable
    /// marginals, one [`ContingencyTable`] per chain position in
    /// traversal order. For chain-consistent ("tree-structured") data,
    /// forward and backward already agree exactly, so the averaging
    /// combination introduces no bias — it only reconciles floating-point
    /// noise between the two independent sweeps.
    pub fn forward_backward(&self) -> Vec<ContingencyTable> {
        let alpha = self.forward_pass();
        let beta = self.backward_pass();
        self.order
            .iter()
            .zip(alpha.iter().zip(beta.iter()))
            .map(|(&variable, (a, b))| {
                let combined: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| (x + y) / 2.0).collect();
                to_table(self.list, variable, &combined)
            })
            .collect()
    }

    pub fn order(&self) -> &[VariableIndex] {
        &self.order
    }
}

/// The two endpoints of a chain's variable graph have degree 1; traversal
/// starts at the lower-indexed endpoint and follows edges, giving a
/// deterministic, direction-invariant (per spec.md §9) linearisation.
fn chain_order(model: &Model) -> Result<Vec<VariableIndex>, InvalidInputError> {
    if !model.is_chain() {
        return Err(InvalidInputError::UnknownModelSyntax("model is not a chain".to_string()));
    }
    let mut adjacency: HashMap<VariableIndex, Vec<VariableIndex>> = HashMap::new();
    for relation in model.relations() {
        let vars = relation.variables();
        adjacency.entry(vars[0]).or_default().push(vars[1]);
        adjacency.entry(vars[1]).or_default().push(vars[0]);
    }

    if adjacency.len() == 1 {
        return Ok(adjacency.into_keys().collect());
    }

    let start = *adjacency
        .iter()
        .filter(|(_, neighbors)| neighbors.len() == 1)
        .map(|(v, _)| v)
        .min()
        .expect("a chain has at least two degree-1 endpoints");

    let mut order = vec![start];
    let mut previous = None;
    let mut current = start;
    while order.len() < adjacency.len() {
        let next = adjacency[&current].iter().copied().find(|&candidate| Some(candidate) != previous).expect("chain is connected");
        order.push(next);
        previous = Some(current);
        current = next;
    }
    Ok(order)
}

fn marginal_of_edge(list: &VariableList, edge: &ContingencyTable, variable: VariableIndex) -> Vec<f64> {
    let cardinality = list.get(variable).expect("variable from chain order is valid").cardinality().get() as usize;
    let mut out = vec![0.0; cardinality];
    for (key, weight) in edge.iter() {
        let value = key.get_raw(list, variable).expect("variable is part of this edge's relation") as usize;
        out[value] += weight;
    }
    out
}

/// `conditional[x_given][x_target]` = `P(target = x_target | given = x_given)`,
/// derived from the joint `edge` table over `{given, target}`.
fn conditional_given(list: &VariableList, edge: &ContingencyTable, given: VariableIndex, target: VariableIndex) -> Vec<Vec<f64>> {
    let given_cardinality = list.get(given).expect("valid variable").cardinality().get() as usize;
    let target_cardinality = list.get(target).expect("valid variable").cardinality().get() as usize;
    let mut joint = vec![vec![0.0; target_cardinality]; given_cardinality];
    for (key, weight) in edge.iter() {
        let given_value = key.get_raw(list, given).expect("given is part of this edge") as usize;
        let target_value = key.get_raw(list, target).expect("target is part of this edge") as usize;
        joint[given_value][target_value] += weight;
    }
    let given_marginal = marginal_of_edge(list, edge, given);
    for (given_value, row) in joint.iter_mut().enumerate() {
        let denom = given_marginal[given_value];
        if denom > 0.0 {
            for cell in row.iter_mut() {
                *cell /= denom;
            }
        }
    }
    joint
}

fn to_table(list: &VariableList, variable: VariableIndex, marginal: &[f64]) -> ContingencyTable {
    let mut table = ContingencyTable::with_capacity(marginal.len());
    for (value, &weight) in marginal.iter().enumerate() {
        let mut values = vec![0u32; list.len()];
        // Other slots don't matter for a single-variable key built only to
        // carry this one value; DONT_CARE semantics aren't needed since
        // this table's keys are never projected further.
        values[variable.get()] = value as u32;
        let key = Key::from_values(list, &fill_defaults(list, variable, value as u32, &mut values)).expect("value within declared cardinality");
        table.add(key, weight).expect("uniform key_size");
    }
    table.sort();
    table
}

fn fill_defaults(list: &VariableList, variable: VariableIndex, value: u32, values: &mut [u32]) -> Vec<u32> {
    for (index, _) in list.iter() {
        if index != variable {
            values[index.get()] = 0;
        }
    }
    values[variable.get()] = value;
    values.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_data_structures::prelude::{Cardinality, VarType, Variable};
    use crate::statistics::entropy;

    fn chain_of_three() -> (VariableList, ContingencyTable) {
        let vars = ["A", "B", "C"]
            .iter()
            .map(|&abbrev| Variable::new(abbrev, abbrev, Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap())
            .collect();
        let list = VariableList::new(vars).unwrap();
        let mut table = ContingencyTable::new();
        // A perfectly correlated chain A=B=C, uniform over (0,0,0)/(1,1,1).
        table.add(Key::from_values(&list, &[0, 0, 0]).unwrap(), 0.5).unwrap();
        table.add(Key::from_values(&list, &[1, 1, 1]).unwrap(), 0.5).unwrap();
        table.sort();
        (list, table)
    }

    #[test]
    fn forward_backward_marginals_match_direct_projection_on_a_chain() {
        let (list, table) = chain_of_three();
        let manager = VBManager::new(&list, &table, 100.0);
        let model = manager.make_model("AB:BC").unwrap();
        assert!(model.is_chain());

        let fb = ForwardBackward::new(&manager, &model).unwrap();
        let marginals = fb.forward_backward();

        for (variable, marginal_table) in fb.order().iter().zip(marginals.iter()) {
            let relation = Relation::new(vec![*variable]).unwrap();
            let direct = manager.compute_projection(&relation);
            assert!((entropy(marginal_table) - entropy(&direct)).abs() < 1e-10);
        }
    }

    #[test]
    fn chain_order_starts_at_the_lower_indexed_endpoint() {
        let (list, table) = chain_of_three();
        let manager = VBManager::new(&list, &table, 100.0);
        let model = manager.make_model("AB:BC").unwrap();
        let order = chain_order(&model).unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], VariableIndex::new(0));
    }
}
