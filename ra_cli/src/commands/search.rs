/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::dataset;
use crate::ExitCode;
use ra::prelude::{Direction, ProgressEvent, SearchConfig, SearchDriver, SearchFilter, Statistic, VBManager};
use std::path::Path;

#[allow(clippy::too_many_arguments)]
pub fn run(path: &Path, width: usize, levels: usize, statistic: Statistic, filter: SearchFilter, direction: Direction) -> ExitCode {
    let dataset = match dataset::load(path) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::InputError;
        }
    };

    let manager = VBManager::new(&dataset.list, &dataset.table, dataset.sample_size);
    let seed = match direction {
        Direction::Ascending => manager.bottom_ref_model(),
        Direction::Descending => manager.saturated_model(),
    };

    let config = SearchConfig { width, max_levels: levels, statistic, filter, direction };
    let driver = SearchDriver::new(&dataset.list, &dataset.table, dataset.sample_size, config);

    let outcome = driver.run(seed, |event| log_progress(&event));

    println!("best_model: {}", outcome.best_model.print_name(&dataset.list));
    println!("best_statistic: {:.6}", outcome.best_statistic);
    if outcome.fully_diverged {
        eprintln!("error: every candidate model at some level failed to converge (IPF divergence)");
        return ExitCode::NumericError;
    }
    ExitCode::Success
}

fn log_progress(event: &ProgressEvent) {
    match event {
        ProgressEvent::Started { total_levels, statistic_name } => {
            log::info!("search started: {total_levels} levels, statistic={statistic_name}");
        }
        ProgressEvent::Level { current_level, total_levels, total_models_evaluated, best_model_name, best_statistic, statistic_name } => {
            log::info!(
                "level {current_level}/{total_levels}: {total_models_evaluated} models evaluated, best so far '{best_model_name}' {statistic_name}={best_statistic:.6}"
            );
        }
        ProgressEvent::Complete { total_models_evaluated, best_model_name, best_statistic, statistic_name } => {
            log::info!("search complete: {total_models_evaluated} models evaluated, best '{best_model_name}' {statistic_name}={best_statistic:.6}");
        }
    }
}
