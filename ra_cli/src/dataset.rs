/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use ra::errors::ParseError;
use ra::prelude::DataSpec;
use ra::prelude::LegacyInDocument;
use ra_data_structures::prelude::{ContingencyTable, VariableList};
use std::path::Path;

/// A dataset loaded from disk: its variable layout, normalized
/// contingency table, and the sample size `N` the LR/P²/BIC statistics
/// need.
pub struct Dataset {
    pub list: VariableList,
    pub table: ContingencyTable,
    pub sample_size: f64,
}

/// Loads `path`, dispatching on its extension: `.json` goes through
/// [`DataSpec`], anything else through the legacy `.in` dialect
/// (spec.md §4.9), re-emitted via `LegacyInDocument::to_json` with
/// `type=0` variables excluded by default.
pub fn load(path: &Path) -> Result<Dataset, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|e| ParseError::Legacy { line: 0, message: format!("could not read '{}': {e}", path.display()) })?;

    let spec = if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        DataSpec::parse(&text)?
    } else {
        LegacyInDocument::parse(&text)?.to_json(true)
    };

    let sample_size = spec.sample_size();
    let list = spec.to_variable_list().map_err(|e| ParseError::Legacy { line: 0, message: e.to_string() })?;
    let table_raw = spec.to_table(&list).map_err(|e| ParseError::Legacy { line: 0, message: e.to_string() })?;

    let mut table = table_raw;
    table.sort();
    table.normalize().map_err(|e| ParseError::Legacy { line: 0, message: e.to_string() })?;

    Ok(Dataset { list, table, sample_size })
}
