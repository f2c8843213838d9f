/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::dataset;
use crate::ExitCode;
use std::path::Path;

/// `ra table <dataset>`: parse a dataset and print its contingency
/// table's row count, sample size, and key layout (spec.md §6).
pub fn run(path: &Path) -> ExitCode {
    let dataset = match dataset::load(path) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::InputError;
        }
    };

    println!("variables: {}", dataset.list.len());
    for (index, variable) in dataset.list.iter() {
        println!("  [{}] {} ({}) cardinality={}", index, variable.name(), variable.abbrev(), variable.cardinality());
    }
    println!("key_size: {} words", dataset.list.key_size());
    println!("sample_size: {}", dataset.sample_size);
    println!("rows: {}", dataset.table.len());
    println!("sum (should be ~1.0 after normalize): {:.10}", dataset.table.sum());

    ExitCode::Success
}
