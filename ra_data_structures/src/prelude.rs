/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Convenience re-export of the crate's public surface, mirroring the
//! teacher crate's `prelude` convention so downstream crates can
//! `use ra_data_structures::prelude::*;` instead of importing each module.

pub use crate::errors::{TableError, VariableListError};
pub use crate::key::Key;
pub use crate::table::ContingencyTable;
pub use crate::types::{Cardinality, KeyWord, VariableIndex, DONT_CARE, KEY_WORD_BITS, PROB_MIN};
pub use crate::variable::{VarType, Variable, VariableList};
