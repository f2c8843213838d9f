/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::InvariantViolationError;
use ra_data_structures::prelude::{VariableIndex, VariableList};

/// A sorted-unique non-empty subset of variable indices: one hyperedge of
/// a model's relation hypergraph. The preserved joint marginal a model
/// hypothesis commits to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Relation {
    variables: Vec<VariableIndex>,
}

impl Relation {
    /// Sorts and deduplicates `variables`; rejects an empty relation.
    pub fn new(mut variables: Vec<VariableIndex>) -> Result<Self, InvariantViolationError> {
        if variables.is_empty() {
            return Err(InvariantViolationError::EmptyRelation);
        }
        variables.sort();
        variables.dedup();
        Ok(Self { variables })
    }

    pub fn variables(&self) -> &[VariableIndex] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, variable: VariableIndex) -> bool {
        self.variables.binary_search(&variable).is_ok()
    }

    pub fn intersects(&self, other: &Relation) -> bool {
        self.variables.iter().any(|v| other.contains(*v))
    }

    pub fn is_subset_of(&self, other: &Relation) -> bool {
        self.variables.iter().all(|v| other.contains(*v))
    }

    /// `r ∪ {v}`; `v` must not already be a member.
    pub fn with_variable_added(&self, variable: VariableIndex) -> Self {
        let mut variables = self.variables.clone();
        variables.push(variable);
        variables.sort();
        variables.dedup();
        Self { variables }
    }

    /// Product of cardinalities of this relation's variables, minus one —
    /// the relation's contribution to a model's degrees of freedom before
    /// inclusion-exclusion over shared sub-relations.
    pub fn degrees_of_freedom_contribution(&self, list: &VariableList) -> Result<f64, crate::errors::InvalidInputError> {
        let mut product = 1.0;
        for &v in &self.variables {
            let variable = list.get(v).map_err(|_| crate::errors::InvalidInputError::UnknownAbbrev(v.to_string()))?;
            product *= variable.cardinality().get() as f64;
        }
        Ok(product - 1.0)
    }

    /// Concatenated abbrevs of this relation's variables, in index order —
    /// the canonical "AB"-style relation name.
    pub fn print_name(&self, list: &VariableList) -> String {
        self.variables
            .iter()
            .map(|&v| list.get(v).map(|variable| variable.abbrev().to_string()).unwrap_or_else(|_| format!("?{}", v.get())))
            .collect::<Vec<_>>()
            .join("")
    }
}
