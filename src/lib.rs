//! # agrobayes: exact inference on a fixed discrete Bayesian network
//!
//! A small inference engine for crop pest-outbreak risk: a fixed DAG of
//! categorical field observations feeding one target variable, a parametric
//! CPT for that target, exact posteriors by enumeration over unobserved
//! parents, and d-separation style independence queries.
//!
//! ## Design Principles
//!
//! 1. **Composition root**: a [`Network`] is an explicit immutable value. No
//!    global model; any number of networks can coexist.
//! 2. **Trait-first CPT**: [`Cpt`] is the contract between the posterior
//!    engine and the parametric form.
//! 3. **Permissive evidence**: unknown variables or labels in evidence score
//!    zero instead of failing. Only model construction returns errors.
//! 4. **Pure queries**: every query is a deterministic function of the
//!    network and its arguments, safe to call from many threads.
//!
//! ## Quick Start
//!
//! ```rust
//! use agrobayes::{evidence, Network};
//!
//! # fn example() -> agrobayes::Result<()> {
//! let net = Network::pest_outbreak()?;
//!
//! let ev = evidence([("Humidity", "High"), ("PesticideUsage", "Low")]);
//! let post = net.posterior(&ev);
//! if let Some(risk) = net.classify(&post) {
//!     println!("Risk: {} ({:.3})", risk.state, risk.probability);
//! }
//!
//! assert!(net.is_independent("Humidity", "PesticideUsage", ["PestOutbreak"])?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Model Sources
//!
//! | Source | Entry point | Description |
//! |--------|-------------|-------------|
//! | Built-in | [`Network::pest_outbreak`] | 8 field observations → `PestOutbreak` |
//! | JSON | [`Network::from_json_str`], [`Network::from_path`] | [`ModelConfig`] document |
//! | Code | [`Network::new`] | Hand-built [`GraphRegistry`] + [`ScoringTable`] |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod registry;
pub mod scoring;
pub mod inference;
pub mod independence;
pub mod config;
pub mod pest;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Variable, VarId, Flow, Evidence, Posterior, Classification,
    evidence,
};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use registry::GraphRegistry;
pub use scoring::{Cpt, LinearSoftmaxCpt, ScoringTable};
pub use config::{ModelConfig, VariableConfig};

use std::path::Path;

use tracing::info;

// ============================================================================
// Top-level Network handle
// ============================================================================

/// A ready-to-query network: topology, designated target, and the target's
/// CPT. Immutable once built.
#[derive(Debug, Clone)]
pub struct Network {
    registry: GraphRegistry,
    target: VarId,
    cpt: LinearSoftmaxCpt,
}

impl Network {
    /// Assemble a network from a finished registry and the target's table.
    pub fn new(registry: GraphRegistry, target: &str, table: ScoringTable) -> Result<Self> {
        let target_id = registry.require(target)?;
        let cpt = LinearSoftmaxCpt::new(registry.states_of(target)?.iter().cloned(), table)?;

        info!(
            variables = registry.len(),
            edges = registry.edge_count(),
            target_variable = target,
            "network constructed"
        );
        Ok(Self { registry, target: target_id, cpt })
    }

    /// The fixed pest-outbreak model.
    pub fn pest_outbreak() -> Result<Self> {
        pest::network()
    }

    /// Build from a parsed model document.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        config.build()
    }

    /// Build from a JSON model document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        ModelConfig::from_json_str(json)?.build()
    }

    /// Build from a JSON model document on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        ModelConfig::from_path(path)?.build()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Posterior over the target's states.
    ///
    /// Parents absent from `evidence` are enumerated over their full domain
    /// and the per-combination distributions averaged with equal weight.
    /// Keys that are not parents of the target are ignored.
    pub fn posterior(&self, evidence: &Evidence) -> Posterior {
        inference::posterior(&self.registry, self.target, &self.cpt, evidence)
    }

    /// Most probable state, earliest canonical state on ties.
    pub fn classify(&self, posterior: &Posterior) -> Option<Classification> {
        inference::classify(posterior)
    }

    /// Posterior then classification in one call.
    pub fn assess(&self, evidence: &Evidence) -> Option<(Posterior, Classification)> {
        let post = self.posterior(evidence);
        let class = self.classify(&post)?;
        Some((post, class))
    }

    /// Whether `x` and `y` are separated given `given`.
    /// See [`independence::is_independent`].
    pub fn is_independent<I, S>(&self, x: &str, y: &str, given: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        independence::is_independent(&self.registry, x, y, given)
    }

    /// Parent combinations a [`Network::posterior`] call would enumerate.
    pub fn enumeration_size(&self, evidence: &Evidence) -> usize {
        inference::enumeration_size(&self.registry, self.target, evidence)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn registry(&self) -> &GraphRegistry {
        &self.registry
    }

    /// The designated target variable.
    pub fn target(&self) -> &Variable {
        self.registry.var(self.target)
    }

    pub fn cpt(&self) -> &LinearSoftmaxCpt {
        &self.cpt
    }

    /// Snapshot of this network as a model document.
    pub fn to_config(&self) -> ModelConfig {
        ModelConfig::from_network(self)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Duplicate variable: {0}")]
    DuplicateVariable(String),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Variable {0} has no states")]
    EmptyStates(String),

    #[error("Variable {variable} lists state {state} more than once")]
    DuplicateState { variable: String, state: String },

    #[error("Invalid scoring table: {0}")]
    InvalidScoringTable(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
