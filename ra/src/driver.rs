/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Parallel level-wise beam search over the model lattice (spec.md §4.8).
//! Grounded on `inputlayer-inputlayer::storage_engine`'s
//! `rayon::ThreadPoolBuilder` + `par_iter().map(...).collect()` shape: a
//! configurable pool size, independent per-item work, one owned `Vec` of
//! results per level. No process-global mutable result slice (spec.md §9's
//! explicitly flagged anti-pattern) — each level is reduced from the
//! `Vec<LevelResult>` `par_iter` returns.

pub use crate::search::SearchFilter;

use crate::errors::NumericDivergenceError;
use crate::model::Model;
use crate::vb_manager::VBManager;
use ra_data_structures::prelude::{ContingencyTable, VariableList};
use rayon::prelude::*;

/// Which information criterion drives the beam's ranking. Lower is better
/// for all three (spec.md §4.4/§4.8): AIC and BIC already subtract a
/// complexity penalty from LR, and a smaller LR means the model's
/// projection is closer to the observed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Aic,
    Bic,
    Lr,
}

/// `Ascending` refines from the independence model toward the saturated
/// model via [`crate::search::generate_neighbors`] (adding one variable to
/// one relation per step); `Descending` coarsens the other way, typically
/// seeded from the saturated model, via
/// [`crate::search::generate_coarser_neighbors`] (dropping one variable
/// from one relation per step) — see [`SearchDriver::candidates_for_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Beam width, level cap, statistic, filter and direction for one search
/// run (spec.md §4.8's parameter list; the legacy `.in` frontmatter's
/// `:optimize-search-width` / `:search-levels` become `width` / `max_levels`).
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub width: usize,
    pub max_levels: usize,
    pub statistic: Statistic,
    pub filter: SearchFilter,
    pub direction: Direction,
}

/// One progress callback payload (spec.md §6). Emitted at the start of a
/// run, after every completed level, and once at the end.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Started { total_levels: usize, statistic_name: &'static str },
    Level { current_level: usize, total_levels: usize, total_models_evaluated: usize, best_model_name: String, best_statistic: f64, statistic_name: &'static str },
    Complete { total_models_evaluated: usize, best_model_name: String, best_statistic: f64, statistic_name: &'static str },
}

/// One model's evaluated statistic, or the divergence error that kept it
/// from being scored (spec.md §4.8's "per-task error, search continues").
#[derive(Debug, Clone)]
struct LevelResult {
    model: Model,
    outcome: Result<f64, NumericDivergenceError>,
}

/// The result of one [`SearchDriver::run`] call. `fully_diverged` is set
/// when some level's entire candidate set failed to evaluate (every
/// candidate hit [`NumericDivergenceError`]) — spec.md §4.8's "overall
/// search does not abort unless all tasks at a level fail", surfaced here
/// so the CLI (spec.md §6) can map it to exit code `2`.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_model: Model,
    pub best_statistic: f64,
    pub fully_diverged: bool,
}

/// Owns the read-only [`VariableList`] and input [`ContingencyTable`] a
/// search run shares across worker threads, plus the configuration for one
/// run. Each worker builds its own private [`VBManager`] (and therefore its
/// own projection cache) inside the `par_iter` closure — no lock is ever
/// taken on the hot path (spec.md §5).
pub struct SearchDriver<'a> {
    list: &'a VariableList,
    input: &'a ContingencyTable,
    sample_size: f64,
    config: SearchConfig,
}

impl<'a> SearchDriver<'a> {
    pub fn new(list: &'a VariableList, input: &'a ContingencyTable, sample_size: f64, config: SearchConfig) -> Self {
        Self { list, input, sample_size, config }
    }

    /// Runs the beam search to completion (or until the frontier is empty
    /// or unchanged), calling `on_progress` after each level boundary.
    /// `on_progress` may be a no-op; it must be safe to call from a single
    /// thread between levels (this driver never calls it concurrently).
    /// Returns the best model seen across every level, by
    /// [`SearchConfig::statistic`] (lower is better).
    pub fn run(&self, seed: Model, mut on_progress: impl FnMut(ProgressEvent)) -> SearchOutcome {
        let statistic_name = statistic_name(self.config.statistic);
        on_progress(ProgressEvent::Started { total_levels: self.config.max_levels, statistic_name });

        let seed_statistic = self.evaluate_one(&seed).unwrap_or(f64::INFINITY);
        let mut frontier = vec![seed.clone()];
        let mut best_model = seed;
        let mut best_statistic = seed_statistic;
        let mut total_evaluated = 1usize;
        let mut fully_diverged = false;

        for level in 1..=self.config.max_levels {
            let candidates = self.candidates_for_level(&frontier);
            if candidates.is_empty() {
                break;
            }

            let results: Vec<LevelResult> = candidates
                .par_iter()
                .map(|candidate| LevelResult { model: candidate.clone(), outcome: self.evaluate_one(candidate) })
                .collect();

            total_evaluated += results.len();

            let mut scored: Vec<(Model, f64)> = results.into_iter().filter_map(|r| r.outcome.ok().map(|s| (r.model, s))).collect();
            scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

            if scored.is_empty() {
                fully_diverged = true;
                break;
            }

            let new_frontier: Vec<Model> = scored.iter().take(self.config.width).map(|(m, _)| m.clone()).collect();

            if scored[0].1 < best_statistic {
                best_statistic = scored[0].1;
                best_model = scored[0].0.clone();
            }

            on_progress(ProgressEvent::Level {
                current_level: level,
                total_levels: self.config.max_levels,
                total_models_evaluated: total_evaluated,
                best_model_name: best_model.print_name(self.list),
                best_statistic,
                statistic_name,
            });

            if new_frontier == frontier {
                break;
            }
            frontier = new_frontier;
        }

        on_progress(ProgressEvent::Complete {
            total_models_evaluated: total_evaluated,
            best_model_name: best_model.print_name(self.list),
            best_statistic,
            statistic_name,
        });

        SearchOutcome { best_model, best_statistic, fully_diverged }
    }

    fn candidates_for_level(&self, frontier: &[Model]) -> Vec<Model> {
        let mut candidates: Vec<Model> = match self.config.direction {
            Direction::Ascending => frontier.iter().flat_map(|m| crate::search::generate_neighbors(m, self.list, self.config.filter)).collect(),
            Direction::Descending => frontier.iter().flat_map(|m| crate::search::generate_coarser_neighbors(m, self.config.filter)).collect(),
        };
        candidates.sort();
        candidates.dedup();
        candidates
    }

    fn evaluate_one(&self, model: &Model) -> Result<f64, NumericDivergenceError> {
        let manager = VBManager::new(self.list, self.input, self.sample_size);
        let stats = manager.compute_statistics(model)?;
        Ok(match self.config.statistic {
            Statistic::Aic => stats.aic,
            Statistic::Bic => stats.bic,
            Statistic::Lr => stats.lr,
        })
    }
}

fn statistic_name(statistic: Statistic) -> &'static str {
    match statistic {
        Statistic::Aic => "AIC",
        Statistic::Bic => "BIC",
        Statistic::Lr => "LR",
    }
}
