/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::{InvalidInputError, ParseError};
use ra_data_structures::prelude::{Cardinality, ContingencyTable, Key, VarType, Variable, VariableList};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of `DataSpec::variables` (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub abbrev: String,
    pub cardinality: u32,
    pub values: Vec<String>,
    #[serde(default, rename = "isDependent")]
    pub is_dependent: bool,
}

/// The stable dataset JSON schema (spec.md §6): a named dataset, its
/// variable declarations, and parallel `data`/`counts` arrays. A `data`
/// cell may be either the value's declared label or its integer index
/// directly — both are accepted per spec.md §6's `str | int`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSpec {
    pub name: String,
    #[serde(default, rename = "sampleSize")]
    pub sample_size: Option<f64>,
    pub variables: Vec<VariableSpec>,
    pub data: Vec<Vec<Value>>,
    pub counts: Vec<f64>,
}

impl DataSpec {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Declared sample size, or the sum of `counts` if none was given.
    pub fn sample_size(&self) -> f64 {
        self.sample_size.unwrap_or_else(|| self.counts.iter().sum())
    }

    /// Builds a [`VariableList`] from `self.variables`, in declaration
    /// order. Every variable becomes `Dependent` if `is_dependent` was
    /// set, `Independent` otherwise (the JSON schema has no `excluded`
    /// concept — that's a legacy `.in`-only notion, see
    /// [`super::legacy_in::LegacyInDocument::to_json`]).
    pub fn to_variable_list(&self) -> Result<VariableList, InvalidInputError> {
        let mut variables = Vec::with_capacity(self.variables.len());
        for spec in &self.variables {
            let cardinality = Cardinality::new(spec.cardinality).map_err(|_| InvalidInputError::UnknownAbbrev(spec.abbrev.clone()))?;
            let var_type = if spec.is_dependent { VarType::Dependent } else { VarType::Independent };
            let variable = Variable::new(spec.name.clone(), spec.abbrev.clone(), cardinality, spec.is_dependent, spec.values.clone(), var_type)
                .map_err(|_| InvalidInputError::UnknownAbbrev(spec.abbrev.clone()))?;
            variables.push(variable);
        }
        VariableList::new(variables).map_err(|_| InvalidInputError::UnknownModelSyntax(self.name.clone()))
    }

    /// Builds the [`ContingencyTable`] for `list`: one row of `data` per
    /// weighted observation, its weight taken from the matching `counts`
    /// entry. Every row's length must equal `variables.len()`; every cell
    /// must resolve to a value within its variable's declared domain,
    /// either by label lookup or (for an integer cell) directly.
    pub fn to_table(&self, list: &VariableList) -> Result<ContingencyTable, InvalidInputError> {
        if self.counts.len() != self.data.len() {
            return Err(InvalidInputError::RowLengthMismatch { expected: self.data.len(), actual: self.counts.len() });
        }
        let mut table = ContingencyTable::with_capacity(self.data.len());
        for (row, &weight) in self.data.iter().zip(self.counts.iter()) {
            if row.len() != list.len() {
                return Err(InvalidInputError::RowLengthMismatch { expected: list.len(), actual: row.len() });
            }
            let mut values = Vec::with_capacity(row.len());
            for ((_, variable), cell) in list.iter().zip(row.iter()) {
                values.push(resolve_cell(variable, cell)?);
            }
            let key = Key::from_values(list, &values).map_err(|_| InvalidInputError::RowLengthMismatch { expected: list.len(), actual: values.len() })?;
            table.add(key, weight).map_err(|_| InvalidInputError::RowLengthMismatch { expected: list.len(), actual: values.len() })?;
        }
        Ok(table)
    }
}

fn resolve_cell(variable: &Variable, cell: &Value) -> Result<u32, InvalidInputError> {
    match cell {
        Value::String(label) => variable.index_of_value(label).ok_or_else(|| InvalidInputError::DataValueNotInValueMap {
            variable: variable.name().to_string(),
            value: label.clone(),
        }),
        Value::Number(n) => n
            .as_u64()
            .map(|v| v as u32)
            .filter(|&v| v < variable.cardinality().get())
            .ok_or_else(|| InvalidInputError::DataValueNotInValueMap {
                variable: variable.name().to_string(),
                value: cell.to_string(),
            }),
        other => Err(InvalidInputError::DataValueNotInValueMap { variable: variable.name().to_string(), value: other.to_string() }),
    }
}
