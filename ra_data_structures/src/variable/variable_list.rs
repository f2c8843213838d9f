/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::VariableListError;
use crate::types::{VariableIndex, KEY_WORD_BITS};
use crate::variable::variable_record::Variable;
use std::cell::Cell;
use std::collections::HashMap;

/// Bit offset + width of one variable's slice within a packed [`crate::key::Key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitLayout {
    pub offset: u32,
    pub width: u32,
}

/// Ordered sequence of [`Variable`]s with a fixed bit-field layout computed
/// once at construction. The layout packs each variable's slice into one or
/// more 32-bit words (`key_size` words total); it never changes after the
/// first [`crate::key::Key`] is allocated from this list, tracked via the
/// `frozen` flag (interior mutability, same `RefCell`-for-a-cache idiom the
/// teacher's `Grid` storage uses, here a `Cell<bool>` since it's a single
/// flag rather than a full cache).
#[derive(Debug)]
pub struct VariableList {
    variables: Vec<Variable>,
    abbrev_index: HashMap<String, usize>,
    layout: Vec<BitLayout>,
    key_size: usize,
    frozen: Cell<bool>,
}

impl VariableList {
    pub fn new(variables: Vec<Variable>) -> Result<Self, VariableListError> {
        let mut abbrev_index = HashMap::with_capacity(variables.len());
        for (i, v) in variables.iter().enumerate() {
            if abbrev_index.insert(v.abbrev().to_string(), i).is_some() {
                return Err(VariableListError::DuplicateAbbrev {
                    abbrev: v.abbrev().to_string(),
                });
            }
        }

        let (layout, key_size) = compute_layout(&variables);

        Ok(Self {
            variables,
            abbrev_index,
            layout,
            key_size,
            frozen: Cell::new(false),
        })
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn key_size(&self) -> usize {
        self.key_size
    }

    pub fn get(&self, index: VariableIndex) -> Result<&Variable, VariableListError> {
        self.variables
            .get(index.get())
            .ok_or(VariableListError::UnknownVariableIndex { index: index.get() })
    }

    pub fn layout_of(&self, index: VariableIndex) -> Result<BitLayout, VariableListError> {
        self.layout
            .get(index.get())
            .copied()
            .ok_or(VariableListError::UnknownVariableIndex { index: index.get() })
    }

    pub fn index_of_abbrev(&self, abbrev: &str) -> Result<VariableIndex, VariableListError> {
        self.abbrev_index
            .get(abbrev)
            .map(|&i| VariableIndex::new(i))
            .ok_or_else(|| VariableListError::UnknownAbbrev { abbrev: abbrev.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableIndex, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableIndex::new(i), v))
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Product of all variable cardinalities — the size of the full joint
    /// state space.
    pub fn state_space_size(&self) -> f64 {
        self.variables
            .iter()
            .map(|v| v.cardinality().get() as f64)
            .product()
    }

    /// Appends a variable; fails once a [`crate::key::Key`] has been
    /// allocated (see [`VariableList::freeze`]).
    pub fn push(&mut self, variable: Variable) -> Result<(), VariableListError> {
        if self.frozen.get() {
            return Err(VariableListError::ListFrozen);
        }
        if self.abbrev_index.contains_key(variable.abbrev()) {
            return Err(VariableListError::DuplicateAbbrev {
                abbrev: variable.abbrev().to_string(),
            });
        }
        self.abbrev_index
            .insert(variable.abbrev().to_string(), self.variables.len());
        self.variables.push(variable);
        let (layout, key_size) = compute_layout(&self.variables);
        self.layout = layout;
        self.key_size = key_size;
        Ok(())
    }

    /// Marks this list as frozen; called by [`crate::key::Key`] on first
    /// allocation. Idempotent.
    pub fn freeze(&self) {
        self.frozen.set(true);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }
}

fn compute_layout(variables: &[Variable]) -> (Vec<BitLayout>, usize) {
    let mut layout = Vec::with_capacity(variables.len());
    let mut bit_cursor: u32 = 0;
    for v in variables {
        let width = v.cardinality().bit_width();
        // Each variable's slice must fit within a single word: if it would
        // straddle a word boundary, start it at the next word instead.
        let word_of_start = bit_cursor / KEY_WORD_BITS;
        let word_of_end = (bit_cursor + width - 1) / KEY_WORD_BITS;
        if word_of_start != word_of_end {
            bit_cursor = (word_of_start + 1) * KEY_WORD_BITS;
        }
        layout.push(BitLayout { offset: bit_cursor, width });
        bit_cursor += width;
    }
    let key_size = if bit_cursor == 0 {
        1
    } else {
        bit_cursor.div_ceil(KEY_WORD_BITS) as usize
    };
    (layout, key_size.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cardinality;
    use crate::variable::var_type::VarType;

    fn var(abbrev: &str, cardinality: u32) -> Variable {
        let labels = (0..cardinality).map(|i| format!("v{i}")).collect();
        Variable::new(
            abbrev,
            abbrev,
            Cardinality::new(cardinality).unwrap(),
            false,
            labels,
            VarType::Independent,
        )
        .unwrap()
    }

    #[test]
    fn layout_packs_variables_without_straddling_words() {
        // 20 binary variables: each needs 2 bits (bit_width reserves a
        // sentinel), so 20*2 = 40 bits => 2 words, no straddling since
        // 2 divides 32 evenly.
        let vars: Vec<_> = (0..20).map(|i| var(&format!("V{i}"), 2)).collect();
        let list = VariableList::new(vars).unwrap();
        assert_eq!(list.key_size(), 2);
        for (idx, _) in list.iter() {
            let layout = list.layout_of(idx).unwrap();
            let start_word = layout.offset / KEY_WORD_BITS;
            let end_word = (layout.offset + layout.width - 1) / KEY_WORD_BITS;
            assert_eq!(start_word, end_word);
        }
    }

    #[test]
    fn freeze_blocks_further_push() {
        let list = VariableList::new(vec![var("A", 2)]).unwrap();
        list.freeze();
        let mut list = list;
        let err = list.push(var("B", 2)).unwrap_err();
        assert_eq!(err, VariableListError::ListFrozen);
    }

    #[test]
    fn rejects_duplicate_abbrev() {
        let err = VariableList::new(vec![var("A", 2), var("A", 3)]).unwrap_err();
        assert!(matches!(err, VariableListError::DuplicateAbbrev { .. }));
    }

    #[test]
    fn state_space_size_is_product_of_cardinalities() {
        let list = VariableList::new(vec![var("A", 2), var("B", 3)]).unwrap();
        assert_eq!(list.state_space_size(), 6.0);
    }
}
