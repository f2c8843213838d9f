/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::dataset;
use crate::ExitCode;
use ra::prelude::VBManager;
use std::path::Path;

/// `ra fit <dataset> --model <short-name>`: parse a model string via
/// [`VBManager::make_model`] and print its [`ra::prelude::StatisticsRecord`]
/// (spec.md §6).
pub fn run(path: &Path, model_name: &str) -> ExitCode {
    let dataset = match dataset::load(path) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::InputError;
        }
    };

    let manager = VBManager::new(&dataset.list, &dataset.table, dataset.sample_size);
    let model = match manager.make_model(model_name) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::InputError;
        }
    };

    match manager.compute_statistics(&model) {
        Ok(stats) => {
            println!("model: {}", model.print_name(&dataset.list));
            println!("H:   {:.6}", stats.h);
            println!("T:   {:.6}", stats.t);
            println!("DF:  {}", stats.df);
            println!("LR:  {:.6}", stats.lr);
            println!("P2:  {:.6}", stats.p2);
            println!("AIC: {:.6}", stats.aic);
            println!("BIC: {:.6}", stats.bic);
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::NumericError
        }
    }
}
