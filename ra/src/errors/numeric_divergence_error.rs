/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use std::error::Error;
use std::fmt;

/// Iterative Proportional Fitting did not converge within its iteration
/// cap. Reported per task by the search driver; the overall search
/// continues with the offending model marked invalid rather than aborting.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericDivergenceError {
    pub model_name: String,
    pub iterations: usize,
    pub max_relative_change: f64,
}

impl Error for NumericDivergenceError {}

impl fmt::Display for NumericDivergenceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "NumericDivergenceError: IPF for model '{}' did not converge after {} iterations (max relative change {:.3e})",
            self.model_name, self.iterations, self.max_relative_change
        )
    }
}
