/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::VariableListError;
use crate::types::{KeyWord, VariableIndex, DONT_CARE, KEY_WORD_BITS};
use crate::variable::VariableList;
use std::fmt;

/// A bit-packed joint-state key: one slice per variable, packed across a
/// fixed number of 32-bit [`KeyWord`]s per [`VariableList::key_size`]. A
/// slice holding the all-ones [`DONT_CARE`] pattern means that variable is
/// marginalized out of this key (see [`Key::project`]).
///
/// Lexicographic `Ord`/`Hash` over the word vector gives the sorted-key
/// ordering contingency tables rely on to merge duplicate keys after a
/// projection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    words: Vec<KeyWord>,
}

impl Key {
    /// A key of `size` all-zero words.
    pub fn zeroed(size: usize) -> Self {
        Self { words: vec![KeyWord::ZERO; size.max(1)] }
    }

    /// A key of `size` words with every slice set to [`DONT_CARE`].
    pub fn all_dont_care(list: &VariableList) -> Self {
        let mut key = Self::zeroed(list.key_size());
        for (index, _) in list.iter() {
            let layout = list.layout_of(index).expect("index from list.iter() is valid");
            key.set_raw(layout.offset, layout.width, DONT_CARE);
        }
        list.freeze();
        key
    }

    /// Builds a fully-specified key from one value per variable, in
    /// `VariableList` order. Freezes `list`.
    pub fn from_values(list: &VariableList, values: &[u32]) -> Result<Self, VariableListError> {
        if values.len() != list.len() {
            return Err(VariableListError::ValueMapLengthMismatch {
                expected: list.len() as u32,
                actual: values.len(),
            });
        }
        let mut key = Self::zeroed(list.key_size());
        for (index, variable) in list.iter() {
            let value = values[index.get()];
            if value >= variable.cardinality().get() {
                return Err(VariableListError::ValueOutOfRange {
                    index: index.get(),
                    value,
                    cardinality: variable.cardinality().get(),
                });
            }
            let layout = list.layout_of(index)?;
            key.set_raw(layout.offset, layout.width, value);
        }
        list.freeze();
        Ok(key)
    }

    /// Reads the raw slice value for `index` (either a real value or
    /// [`DONT_CARE`]).
    pub fn get_raw(&self, list: &VariableList, index: VariableIndex) -> Result<u32, VariableListError> {
        let layout = list.layout_of(index)?;
        Ok(self.read_raw(layout.offset, layout.width))
    }

    /// `true` if `index`'s slice is [`DONT_CARE`] (marginalized out).
    pub fn is_dont_care(&self, list: &VariableList, index: VariableIndex) -> Result<bool, VariableListError> {
        Ok(self.get_raw(list, index)? == DONT_CARE)
    }

    /// Returns a copy of this key with every variable *not* in `keep`
    /// masked to [`DONT_CARE`] — the projection used when summing a
    /// contingency table down onto a relation's variable subset.
    pub fn project(&self, list: &VariableList, keep: &[VariableIndex]) -> Self {
        let mut out = self.clone();
        for (index, _) in list.iter() {
            if !keep.contains(&index) {
                let layout = list.layout_of(index).expect("index from list.iter() is valid");
                out.set_raw(layout.offset, layout.width, DONT_CARE);
            }
        }
        out
    }

    pub fn words(&self) -> &[KeyWord] {
        &self.words
    }

    fn read_raw(&self, offset: u32, width: u32) -> u32 {
        let word_index = (offset / KEY_WORD_BITS) as usize;
        let local_offset = offset % KEY_WORD_BITS;
        self.words[word_index].get_slice(local_offset, width)
    }

    fn set_raw(&mut self, offset: u32, width: u32, value: u32) {
        let word_index = (offset / KEY_WORD_BITS) as usize;
        let local_offset = offset % KEY_WORD_BITS;
        self.words[word_index] = self.words[word_index].set_slice(local_offset, width, value);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, w) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{w}")?;
        }
        Ok(())
    }
}
