//! Model documents: a network described as JSON.
//!
//! ```text
//! {
//!   "target": "PestOutbreak",
//!   "variables": [ { "name": "Humidity", "states": ["Low", "Medium", "High"] }, ... ],
//!   "edges": [ ["Humidity", "PestOutbreak"], ... ],
//!   "scoring": {
//!     "bias": [1.0, 0.0, -1.0],
//!     "weights": { "Humidity": { "Low": [1.0, 0.0, -1.0], ... }, ... }
//!   }
//! }
//! ```
//!
//! Building goes through the same [`GraphRegistry`] calls as hand-written
//! setup code, so a bad document fails with the same structural errors.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::registry::GraphRegistry;
use crate::scoring::ScoringTable;
use crate::{Error, Network, Result};

/// One variable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub states: Vec<String>,
}

/// A complete network description: topology, target, and scoring table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub target: String,
    pub variables: Vec<VariableConfig>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
    pub scoring: ScoringTable,
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register variables and edges in document order, then attach the table.
    pub fn build(&self) -> Result<Network> {
        if self.variables.is_empty() {
            return Err(Error::Config("model declares no variables".into()));
        }

        let mut registry = GraphRegistry::new();
        for var in &self.variables {
            registry.add_variable(&var.name, var.states.iter().cloned())?;
        }
        for (parent, child) in &self.edges {
            registry.add_edge(parent, child)?;
        }

        let target = registry.require(&self.target).map_err(|_| {
            Error::Config(format!("target {} is not a declared variable", self.target))
        })?;
        for parent in self.scoring.weights.keys() {
            match registry.id_of(parent) {
                Some(id) if registry.parent_ids(target).contains(&id) => {}
                _ => warn!(
                    parent = parent.as_str(),
                    target_variable = self.target.as_str(),
                    "scoring row for a variable that is not a parent of the target; it will never be scored"
                ),
            }
        }

        Network::new(registry, &self.target, self.scoring.clone())
    }

    /// Describe an existing network.
    pub(crate) fn from_network(network: &Network) -> Self {
        let registry = network.registry();
        Self {
            target: network.target().name.clone(),
            variables: registry
                .variables()
                .map(|v| VariableConfig { name: v.name.clone(), states: v.states.clone() })
                .collect(),
            edges: registry
                .edges()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
            scoring: network.cpt().table().clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
