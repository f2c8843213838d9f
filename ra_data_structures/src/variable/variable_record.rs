/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::VariableListError;
use crate::types::Cardinality;
use crate::variable::var_type::VarType;

const MAX_NAME_LEN: usize = 32;
const MAX_ABBREV_LEN: usize = 8;

/// A single discrete variable: its name, its unique short abbreviation used
/// in relation/model printing, its cardinality, and the ordered labels for
/// each of its `0..cardinality` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    abbrev: String,
    cardinality: Cardinality,
    is_dependent: bool,
    value_map: Vec<String>,
    var_type: VarType,
}

impl Variable {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        abbrev: impl Into<String>,
        cardinality: Cardinality,
        is_dependent: bool,
        value_map: Vec<String>,
        var_type: VarType,
    ) -> Result<Self, VariableListError> {
        let name = name.into();
        let abbrev = abbrev.into();

        if name.len() > MAX_NAME_LEN {
            return Err(VariableListError::InvalidName { name });
        }
        if abbrev.is_empty() || abbrev.len() > MAX_ABBREV_LEN {
            return Err(VariableListError::InvalidAbbrev { abbrev });
        }
        if value_map.len() != cardinality.get() as usize {
            return Err(VariableListError::ValueMapLengthMismatch {
                expected: cardinality.get(),
                actual: value_map.len(),
            });
        }

        Ok(Self {
            name,
            abbrev,
            cardinality,
            is_dependent,
            value_map,
            var_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbrev(&self) -> &str {
        &self.abbrev
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn is_dependent(&self) -> bool {
        self.is_dependent
    }

    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    pub fn value_map(&self) -> &[String] {
        &self.value_map
    }

    /// Maps a value label to its integer index (insertion order), or `None`
    /// if the label isn't one of this variable's declared values.
    pub fn index_of_value(&self, label: &str) -> Option<u32> {
        self.value_map.iter().position(|v| v == label).map(|i| i as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(n: u32) -> Cardinality {
        Cardinality::new(n).unwrap()
    }

    #[test]
    fn rejects_abbrev_too_long() {
        let err = Variable::new(
            "age",
            "toolongabbrev",
            card(2),
            false,
            vec!["lo".into(), "hi".into()],
            VarType::Independent,
        )
        .unwrap_err();
        assert!(matches!(err, VariableListError::InvalidAbbrev { .. }));
    }

    #[test]
    fn rejects_value_map_length_mismatch() {
        let err = Variable::new(
            "age",
            "A",
            card(3),
            false,
            vec!["lo".into(), "hi".into()],
            VarType::Independent,
        )
        .unwrap_err();
        assert!(matches!(err, VariableListError::ValueMapLengthMismatch { .. }));
    }

    #[test]
    fn index_of_value_uses_insertion_order() {
        let v = Variable::new(
            "age",
            "A",
            card(3),
            false,
            vec!["lo".into(), "mid".into(), "hi".into()],
            VarType::Independent,
        )
        .unwrap();
        assert_eq!(v.index_of_value("mid"), Some(1));
        assert_eq!(v.index_of_value("nope"), None);
    }
}
