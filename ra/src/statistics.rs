/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::InvariantViolationError;
use ra_data_structures::prelude::{ContingencyTable, VariableList, PROB_MIN};

/// A `{H, T, DF, LR, P², AIC, BIC}` tuple for one (model, data) pair
/// (spec.md §3's Statistics record).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsRecord {
    pub h: f64,
    pub t: f64,
    pub df: f64,
    pub lr: f64,
    pub p2: f64,
    pub aic: f64,
    pub bic: f64,
}

/// Shannon entropy in bits: `H(P) = -Σ pᵢ·log₂ pᵢ`, with `0·log 0 = 0`
/// (weights below [`PROB_MIN`] are skipped rather than clamped, since a
/// skipped term and a `PROB_MIN`-clamped term both contribute ~0 bits).
pub fn entropy(table: &ContingencyTable) -> f64 {
    table.iter().map(|&(_, p)| if p < PROB_MIN { 0.0 } else { -p * p.log2() }).sum()
}

/// `log₂(Π cardinalities)` — the entropy of the uniform distribution over
/// the full joint state space, i.e. the maximum entropy any table over
/// `list` can have.
pub fn max_entropy(list: &VariableList) -> f64 {
    list.state_space_size().log2()
}

/// Kullback–Leibler divergence `Σ pᵢ·log₂(pᵢ/qᵢ)`. `p` and `q` must share
/// key layout and be sorted. Terms where `qᵢ = 0` while `pᵢ > 0` are
/// skipped silently, matching the legacy behaviour spec.md §4.4 and §9
/// document: safe only because every caller in this codebase supplies a
/// `q` that dominates `p` by construction (the model projection always
/// has full support wherever the input table does). Use
/// [`transmission_checked`] to enforce that precondition explicitly.
pub fn transmission(p: &ContingencyTable, q: &ContingencyTable) -> f64 {
    sum_transmission_terms(p, q)
}

/// As [`transmission`], but returns an error instead of silently skipping
/// a term where `q` does not dominate `p`.
pub fn transmission_checked(p: &ContingencyTable, q: &ContingencyTable) -> Result<f64, InvariantViolationError> {
    for (index, (key, pi)) in p.iter().enumerate() {
        let qi = q.find(key).unwrap_or(0.0);
        if qi < PROB_MIN && *pi >= PROB_MIN {
            return Err(InvariantViolationError::NonDominatingTransmission { index });
        }
    }
    Ok(sum_transmission_terms(p, q))
}

fn sum_transmission_terms(p: &ContingencyTable, q: &ContingencyTable) -> f64 {
    let mut total = 0.0;
    for (key, pi) in p.iter() {
        if *pi < PROB_MIN {
            continue;
        }
        let qi = q.find(key).unwrap_or(0.0);
        if qi < PROB_MIN {
            continue;
        }
        total += pi * (pi / qi).log2();
    }
    total
}

/// `N · Σ (Oᵢ - Eᵢ)²/Eᵢ`. `observed` and `expected` must share key layout
/// and be sorted. Cells where `Eᵢ = 0` are skipped; cells where `Oᵢ = 0`
/// still contribute `N·Eᵢ`.
pub fn pearson_chi_squared(observed: &ContingencyTable, expected: &ContingencyTable, sample_size: f64) -> f64 {
    let mut total = 0.0;
    for (key, e) in expected.iter() {
        let e = *e;
        if e <= 0.0 {
            continue;
        }
        let o = observed.find(key).unwrap_or(0.0);
        total += (o - e).powi(2) / e;
    }
    sample_size * total
}

/// `2·N·ln(2)·transmission(O, E)`.
pub fn likelihood_ratio(observed: &ContingencyTable, expected: &ContingencyTable, sample_size: f64) -> f64 {
    2.0 * sample_size * std::f64::consts::LN_2 * transmission(observed, expected)
}

/// `LR - 2·DF`.
pub fn aic(lr: f64, df: f64) -> f64 {
    lr - 2.0 * df
}

/// `LR - DF·ln(N)`.
pub fn bic(lr: f64, df: f64, sample_size: f64) -> f64 {
    lr - df * sample_size.ln()
}
