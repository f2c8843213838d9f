/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Convenience re-export of this crate's public surface, mirroring
//! `ra_data_structures::prelude`'s convention.

pub use crate::driver::{
    Direction, ProgressEvent, SearchConfig, SearchDriver, SearchFilter, SearchOutcome, Statistic,
};
pub use crate::errors::{InvalidInputError, InvariantViolationError, NumericDivergenceError, ParseError};
pub use crate::forward_backward::ForwardBackward;
pub use crate::model::Model;
pub use crate::parser::{json::DataSpec, legacy_in::LegacyInDocument};
pub use crate::relation::Relation;
pub use crate::search::generate_neighbors;
pub use crate::statistics::StatisticsRecord;
pub use crate::vb_manager::VBManager;
