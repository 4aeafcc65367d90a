//! # Parametric Scorer
//!
//! Conditional distributions for a target variable given an assignment to
//! its parents. The only implementation shipped is a linear score per target
//! state (bias plus one contribution per observed parent) pushed through a
//! softmax.
//!
//! ```text
//! score(s) = bias[s] + Σ weights[parent][observed][s]
//! P(s)     = exp(score(s) - max) / Σ exp(score(t) - max)
//! ```
//!
//! Lookups are defined-or-absent: a parent missing from the table, or a state
//! label missing under a known parent, adds nothing. That permissive rule is
//! what lets callers hand over raw, partially-labelled evidence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Posterior;
use crate::{Error, Result};

// ============================================================================
// Cpt trait
// ============================================================================

/// A conditional probability table for one target variable.
///
/// This is the seam between the posterior engine and the parametric form.
/// Implementations must be pure: the same assignment always yields the same
/// distribution.
pub trait Cpt: Send + Sync {
    /// Target states in canonical order.
    fn states(&self) -> &[String];

    /// Normalized probabilities aligned with [`Cpt::states`] for a
    /// `(parent, state)` assignment.
    fn distribution(&self, assignment: &[(&str, &str)]) -> Vec<f64>;

    /// Convenience wrapper labelling [`Cpt::distribution`] with state names.
    fn posterior(&self, assignment: &[(&str, &str)]) -> Posterior {
        let probs = self.distribution(assignment);
        Posterior::from_pairs(self.states().iter().map(String::as_str).zip(probs))
    }
}

// ============================================================================
// Scoring table
// ============================================================================

/// Parent state label → score vector over the target states.
pub type StateWeights = BTreeMap<String, Vec<f64>>;

/// Bias vector plus per-parent, per-state score vectors.
///
/// Every vector is positionally aligned with the target's canonical states.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringTable {
    pub bias: Vec<f64>,
    #[serde(default)]
    pub weights: BTreeMap<String, StateWeights>,
}

impl ScoringTable {
    pub fn new(bias: impl Into<Vec<f64>>) -> Self {
        Self { bias: bias.into(), weights: BTreeMap::new() }
    }

    /// Add a parent's rows: `(state, vector)` pairs.
    pub fn with_parent<S, V>(mut self, parent: impl Into<String>, rows: impl IntoIterator<Item = (S, V)>) -> Self
    where
        S: Into<String>,
        V: Into<Vec<f64>>,
    {
        let rows = rows.into_iter().map(|(s, v)| (s.into(), v.into())).collect();
        self.weights.insert(parent.into(), rows);
        self
    }

    pub fn insert(&mut self, parent: impl Into<String>, state: impl Into<String>, vector: impl Into<Vec<f64>>) {
        self.weights
            .entry(parent.into())
            .or_default()
            .insert(state.into(), vector.into());
    }

    /// Score vector for `parent` observed at `state`, if defined.
    pub fn vector(&self, parent: &str, state: &str) -> Option<&[f64]> {
        self.weights.get(parent)?.get(state).map(Vec::as_slice)
    }

    /// Number of target states this table scores.
    pub fn width(&self) -> usize {
        self.bias.len()
    }

    /// Check every vector has `width` components and that no assignment can
    /// push a score past `f64::MAX`.
    ///
    /// The bound per target state is `|bias[s]|` plus, for each parent, the
    /// largest `|row[s]|` over that parent's rows. Keeping it finite keeps
    /// every softmax input finite, so posteriors never turn into NaN.
    pub fn validate(&self, width: usize) -> Result<()> {
        if self.width() != width {
            return Err(Error::InvalidScoringTable(format!(
                "bias has {} entries, target has {width} states",
                self.width()
            )));
        }
        if self.bias.iter().any(|b| !b.is_finite()) {
            return Err(Error::InvalidScoringTable("bias has a non-finite entry".into()));
        }

        let mut bound: Vec<f64> = self.bias.iter().map(|b| b.abs()).collect();
        for (parent, rows) in &self.weights {
            let mut widest = vec![0.0_f64; width];
            for (state, vector) in rows {
                if vector.len() != width {
                    return Err(Error::InvalidScoringTable(format!(
                        "{parent}={state} has {} entries, target has {width} states",
                        vector.len()
                    )));
                }
                if vector.iter().any(|w| !w.is_finite()) {
                    return Err(Error::InvalidScoringTable(format!(
                        "{parent}={state} has a non-finite entry"
                    )));
                }
                for (m, w) in widest.iter_mut().zip(vector) {
                    *m = (*m).max(w.abs());
                }
            }
            for (b, m) in bound.iter_mut().zip(widest) {
                *b += m;
            }
        }

        if let Some(s) = bound.iter().position(|b| !b.is_finite()) {
            return Err(Error::InvalidScoringTable(format!(
                "scores for target state {s} can overflow"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Linear softmax CPT
// ============================================================================

/// Linear-score-plus-softmax CPT over a fixed target state list.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSoftmaxCpt {
    states: Vec<String>,
    table: ScoringTable,
}

impl LinearSoftmaxCpt {
    /// Pair a scoring table with the target's canonical states.
    pub fn new(states: impl IntoIterator<Item = impl Into<String>>, table: ScoringTable) -> Result<Self> {
        let states: Vec<String> = states.into_iter().map(Into::into).collect();
        table.validate(states.len())?;
        Ok(Self { states, table })
    }

    pub fn table(&self) -> &ScoringTable {
        &self.table
    }

    /// Unnormalized scores aligned with the target states.
    pub fn scores(&self, assignment: &[(&str, &str)]) -> Vec<f64> {
        let mut scores = self.table.bias.clone();
        for &(parent, state) in assignment {
            // Absent parent or absent label contributes zero
            if let Some(vector) = self.table.vector(parent, state) {
                for (score, w) in scores.iter_mut().zip(vector) {
                    *score += w;
                }
            }
        }
        scores
    }
}

impl Cpt for LinearSoftmaxCpt {
    fn states(&self) -> &[String] {
        &self.states
    }

    fn distribution(&self, assignment: &[(&str, &str)]) -> Vec<f64> {
        softmax(&self.scores(assignment))
    }
}

/// Max-shifted softmax. Empty input yields an empty output.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();

    exps.iter().map(|&e| e / sum).collect()
}

// ============================================================================
// Tests
// ============================================================================
