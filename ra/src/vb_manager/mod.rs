/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

mod ipf;

use crate::errors::{InvalidInputError, NumericDivergenceError};
use crate::model::Model;
use crate::relation::Relation;
use crate::statistics::{self, StatisticsRecord};
use ra_data_structures::prelude::{ContingencyTable, VariableIndex, VariableList};
use std::cell::RefCell;
use std::collections::HashMap;

/// Given a variable list and a normalized input table, computes
/// maximum-entropy model projections and their information statistics.
/// Owns a per-relation projection cache keyed by the relation's sorted
/// variable-index fingerprint (spec.md §9): cheap to clone per search
/// worker, trading memory for lock-freedom on the hot path, the same
/// trade-off `dcl_data_structures`'s `Grid` makes with its `RefCell`
/// storage.
pub struct VBManager<'a> {
    list: &'a VariableList,
    input: &'a ContingencyTable,
    sample_size: f64,
    projection_cache: RefCell<HashMap<Vec<VariableIndex>, ContingencyTable>>,
}

impl<'a> VBManager<'a> {
    pub fn new(list: &'a VariableList, input: &'a ContingencyTable, sample_size: f64) -> Self {
        Self { list, input, sample_size, projection_cache: RefCell::new(HashMap::new()) }
    }

    pub fn variable_list(&self) -> &VariableList {
        self.list
    }

    /// The independence model: singleton relations for every independent
    /// variable plus one relation grouping all dependent variables
    /// together, or — if no variable is marked dependent — the
    /// all-singletons model.
    pub fn bottom_ref_model(&self) -> Model {
        let dependents: Vec<VariableIndex> = self.list.iter().filter(|(_, v)| v.is_dependent()).map(|(i, _)| i).collect();
        let mut relations = Vec::new();
        if dependents.is_empty() {
            for (index, _) in self.list.iter() {
                relations.push(Relation::new(vec![index]).expect("singleton is non-empty"));
            }
        } else {
            for (index, variable) in self.list.iter() {
                if !variable.is_dependent() {
                    relations.push(Relation::new(vec![index]).expect("singleton is non-empty"));
                }
            }
            relations.push(Relation::new(dependents).expect("caller already checked non-empty"));
        }
        Model::new(relations).expect("variable list is non-empty")
    }

    /// The saturated model: a single relation spanning every variable, the
    /// top of the model lattice and the usual seed for a
    /// [`crate::driver::Direction::Descending`] search.
    pub fn saturated_model(&self) -> Model {
        let all: Vec<VariableIndex> = self.list.iter().map(|(index, _)| index).collect();
        Model::new(vec![Relation::new(all).expect("variable list is non-empty")]).expect("single relation is non-empty")
    }

    /// The observed marginal of the input table projected onto `relation`,
    /// cached by relation fingerprint.
    pub fn compute_projection(&self, relation: &Relation) -> ContingencyTable {
        let fingerprint = relation.variables().to_vec();
        if let Some(cached) = self.projection_cache.borrow().get(&fingerprint) {
            log::debug!("projection cache hit for relation {:?}", fingerprint);
            return cached.clone();
        }
        let projected = self.input.project(self.list, relation.variables()).expect("relation is non-empty");
        self.projection_cache.borrow_mut().insert(fingerprint, projected.clone());
        projected
    }

    /// The model's maximum-entropy projection: the distribution over the
    /// full joint space whose marginals onto every relation match the
    /// input table's observed marginals. A model with a single relation
    /// spanning all variables returns that relation's own projection
    /// directly; every other case (loopless or loopy) is solved by
    /// Iterative Proportional Fitting, which is exact for both — loopless
    /// models simply converge in very few sweeps.
    pub fn compute_model_projection(&self, model: &Model) -> Result<ContingencyTable, NumericDivergenceError> {
        if model.len() == 1 && model.relations()[0].len() == self.list.len() {
            return Ok(self.compute_projection(&model.relations()[0]));
        }
        let marginals: Vec<ContingencyTable> = model.relations().iter().map(|r| self.compute_projection(r)).collect();
        ipf::iterative_proportional_fitting(self.list, model.relations(), &marginals, &model.print_name(self.list))
    }

    pub fn compute_h(&self, model: &Model) -> Result<f64, NumericDivergenceError> {
        Ok(statistics::entropy(&self.compute_model_projection(model)?))
    }

    pub fn compute_t(&self, model: &Model) -> Result<f64, NumericDivergenceError> {
        let projection = self.compute_model_projection(model)?;
        Ok(statistics::transmission(self.input, &projection))
    }

    pub fn compute_df(&self, model: &Model) -> Result<f64, InvalidInputError> {
        model.compute_df(self.list)
    }

    pub fn compute_lr(&self, model: &Model) -> Result<f64, NumericDivergenceError> {
        let projection = self.compute_model_projection(model)?;
        Ok(statistics::likelihood_ratio(self.input, &projection, self.sample_size))
    }

    pub fn compute_p2(&self, model: &Model) -> Result<f64, NumericDivergenceError> {
        let projection = self.compute_model_projection(model)?;
        Ok(statistics::pearson_chi_squared(self.input, &projection, self.sample_size))
    }

    pub fn compute_statistics(&self, model: &Model) -> Result<StatisticsRecord, NumericDivergenceError> {
        let projection = self.compute_model_projection(model)?;
        let h = statistics::entropy(&projection);
        let t = statistics::transmission(self.input, &projection);
        let df = model.compute_df(self.list).unwrap_or(0.0);
        let lr = statistics::likelihood_ratio(self.input, &projection, self.sample_size);
        let p2 = statistics::pearson_chi_squared(self.input, &projection, self.sample_size);
        Ok(StatisticsRecord { h, t, df, lr, p2, aic: statistics::aic(lr, df), bic: statistics::bic(lr, df, self.sample_size) })
    }

    /// Parses a colon-delimited short-name like `"AB:BC"` into a [`Model`]
    /// using this manager's variable list to resolve abbrevs.
    pub fn make_model(&self, short_name: &str) -> Result<Model, InvalidInputError> {
        let mut relations = Vec::new();
        for relation_name in short_name.split(':') {
            if relation_name.is_empty() {
                return Err(InvalidInputError::UnknownModelSyntax(short_name.to_string()));
            }
            let mut variables = Vec::new();
            let mut remaining = relation_name;
            while !remaining.is_empty() {
                let matched_abbrev = self
                    .list
                    .iter()
                    .map(|(_, v)| v.abbrev())
                    .filter(|abbrev| remaining.starts_with(abbrev))
                    .max_by_key(|abbrev| abbrev.len())
                    .ok_or_else(|| InvalidInputError::UnknownModelSyntax(short_name.to_string()))?
                    .to_string();
                let index = self.list.index_of_abbrev(&matched_abbrev).map_err(|_| InvalidInputError::UnknownModelSyntax(short_name.to_string()))?;
                variables.push(index);
                remaining = &remaining[matched_abbrev.len()..];
            }
            relations.push(Relation::new(variables).map_err(|_| InvalidInputError::UnknownModelSyntax(short_name.to_string()))?);
        }
        Model::new(relations).map_err(|_| InvalidInputError::UnknownModelSyntax(short_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_data_structures::prelude::{Cardinality, Key, VarType, Variable};

    fn two_independent_binary() -> (VariableList, ContingencyTable) {
        let vars = vec![
            Variable::new("alpha", "A", Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap(),
            Variable::new("beta", "B", Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap(),
        ];
        let list = VariableList::new(vars).unwrap();
        let mut table = ContingencyTable::new();
        table.add(Key::from_values(&list, &[0, 0]).unwrap(), 0.25).unwrap();
        table.add(Key::from_values(&list, &[0, 1]).unwrap(), 0.25).unwrap();
        table.add(Key::from_values(&list, &[1, 0]).unwrap(), 0.25).unwrap();
        table.add(Key::from_values(&list, &[1, 1]).unwrap(), 0.25).unwrap();
        table.sort();
        (list, table)
    }

    fn mutual_information(manager: &VBManager) -> f64 {
        let a = Relation::new(vec![VariableIndex::new(0)]).unwrap();
        let b = Relation::new(vec![VariableIndex::new(1)]).unwrap();
        let ab = Relation::new(vec![VariableIndex::new(0), VariableIndex::new(1)]).unwrap();
        let h_a = statistics::entropy(&manager.compute_projection(&a));
        let h_b = statistics::entropy(&manager.compute_projection(&b));
        let h_ab = statistics::entropy(&manager.compute_projection(&ab));
        h_a + h_b - h_ab
    }

    #[test]
    fn scenario_2_two_independent_variables_have_zero_mutual_information() {
        let (list, table) = two_independent_binary();
        let manager = VBManager::new(&list, &table, 100.0);
        assert!(mutual_information(&manager).abs() < 1e-8);
    }

    #[test]
    fn scenario_3_perfect_correlation_has_mutual_information_one() {
        let vars = vec![
            Variable::new("alpha", "A", Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap(),
            Variable::new("beta", "B", Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap(),
        ];
        let list = VariableList::new(vars).unwrap();
        let mut table = ContingencyTable::new();
        table.add(Key::from_values(&list, &[0, 0]).unwrap(), 0.5).unwrap();
        table.add(Key::from_values(&list, &[1, 1]).unwrap(), 0.5).unwrap();
        table.sort();
        let manager = VBManager::new(&list, &table, 100.0);
        assert!((mutual_information(&manager) - 1.0).abs() < 1e-8);
    }

    #[test]
    fn make_model_parses_colon_delimited_short_names() {
        let (list, table) = two_independent_binary();
        let manager = VBManager::new(&list, &table, 100.0);
        let model = manager.make_model("A:B").unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.print_name(&list), "A:B");
    }

    #[test]
    fn make_model_rejects_unknown_abbrev() {
        let (list, table) = two_independent_binary();
        let manager = VBManager::new(&list, &table, 100.0);
        assert!(manager.make_model("Z").is_err());
    }

    #[test]
    fn bottom_ref_model_is_all_singletons_with_no_dependent_variables() {
        let (list, table) = two_independent_binary();
        let manager = VBManager::new(&list, &table, 100.0);
        let model = manager.bottom_ref_model();
        assert_eq!(model.len(), 2);
        assert!(model.relations().iter().all(|r| r.len() == 1));
    }

    #[test]
    fn saturated_model_is_a_single_relation_spanning_every_variable() {
        let (list, table) = two_independent_binary();
        let manager = VBManager::new(&list, &table, 100.0);
        let model = manager.saturated_model();
        assert_eq!(model.len(), 1);
        assert_eq!(model.relations()[0].len(), list.len());
    }
}
