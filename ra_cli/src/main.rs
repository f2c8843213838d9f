/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! `ra`: a command-line front-end over the `ra` reconstructability-analysis
//! engine (spec.md §6). Three subcommands — `table`, `fit`, `search` — each
//! load a dataset (JSON or legacy `.in`, dispatched by extension in
//! [`dataset::load`]) and drive one operation of [`ra::vb_manager::VBManager`]
//! or [`ra::driver::SearchDriver`]. Logging goes through `log` + `env_logger`,
//! the same facade/subscriber split used across the example pack.

mod commands;
mod dataset;

use clap::{Parser, Subcommand, ValueEnum};
use ra::prelude::{Direction as RaDirection, SearchFilter as RaSearchFilter, Statistic as RaStatistic};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "ra", version, about = "Reconstructability analysis: table inspection, model fitting, and lattice search.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a dataset and print its variable layout and table summary.
    Table {
        /// Path to a `.json` dataset or a legacy `.in` frontmatter file.
        dataset: PathBuf,
    },
    /// Fit a single model (colon-delimited short name, e.g. "AB:BC") and print its statistics.
    Fit {
        /// Path to a `.json` dataset or a legacy `.in` frontmatter file.
        dataset: PathBuf,
        /// Colon-delimited relation list, e.g. "AB:BC".
        #[arg(long)]
        model: String,
    },
    /// Beam-search the model lattice for the model minimizing an information criterion.
    Search {
        /// Path to a `.json` dataset or a legacy `.in` frontmatter file.
        dataset: PathBuf,
        /// Number of models carried forward from each level.
        #[arg(long, default_value_t = 3)]
        width: usize,
        /// Maximum number of levels to search.
        #[arg(long, default_value_t = 10)]
        levels: usize,
        /// Information criterion used to rank candidate models.
        #[arg(long, value_enum, default_value_t = StatisticArg::Aic)]
        statistic: StatisticArg,
        /// Which models are admissible candidates.
        #[arg(long, value_enum, default_value_t = FilterArg::Loopless)]
        filter: FilterArg,
        /// Search from the independence model upward, or the saturated model downward.
        #[arg(long, value_enum, default_value_t = DirectionArg::Ascending)]
        direction: DirectionArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatisticArg {
    Aic,
    Bic,
    Lr,
}

impl From<StatisticArg> for RaStatistic {
    fn from(value: StatisticArg) -> Self {
        match value {
            StatisticArg::Aic => RaStatistic::Aic,
            StatisticArg::Bic => RaStatistic::Bic,
            StatisticArg::Lr => RaStatistic::Lr,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    Full,
    Loopless,
    Disjoint,
    Chain,
}

impl From<FilterArg> for RaSearchFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::Full => RaSearchFilter::Full,
            FilterArg::Loopless => RaSearchFilter::Loopless,
            FilterArg::Disjoint => RaSearchFilter::Disjoint,
            FilterArg::Chain => RaSearchFilter::Chain,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Ascending,
    Descending,
}

impl From<DirectionArg> for RaDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Ascending => RaDirection::Ascending,
            DirectionArg::Descending => RaDirection::Descending,
        }
    }
}

/// Process exit codes (spec.md §6): `0` success, `1` malformed input or
/// unparsable model/dataset, `2` numeric divergence during projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    InputError = 1,
    NumericError = 2,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let code = match cli.command {
        Command::Table { dataset } => commands::table::run(&dataset),
        Command::Fit { dataset, model } => commands::fit::run(&dataset, &model),
        Command::Search { dataset, width, levels, statistic, filter, direction } => {
            commands::search::run(&dataset, width, levels, statistic.into(), filter.into(), direction.into())
        }
    };

    process::exit(code as i32);
}
