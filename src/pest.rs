//! Built-in pest-outbreak network.
//!
//! Eight discretized field observations feed a single target:
//!
//! ```text
//!  Humidity  NDVI  PheromoneCount  CropMaturity
//!      \       \         |            /
//!       └───────┴────────┼───────────┘
//!                        ▼
//!                  PestOutbreak          Low / Medium / High
//!                        ▲
//!       ┌───────┬────────┼───────────┐
//!      /       /         |            \
//!  FertilizerType  PesticideUsage  Yield  CropDiseaseStatus
//! ```
//!
//! Parents are registered in the order listed by [`PARENTS`]; that order is
//! the enumeration order for unobserved parents.

use crate::registry::GraphRegistry;
use crate::scoring::ScoringTable;
use crate::{Network, Result};

/// Name of the target variable.
pub const TARGET: &str = "PestOutbreak";

/// Target states, canonical order.
pub const RISK_LEVELS: [&str; 3] = ["Low", "Medium", "High"];

/// A parent variable with its states and per-state score vectors
/// (aligned with [`RISK_LEVELS`]).
pub struct ParentEntry {
    pub name: &'static str,
    pub states: [&'static str; 3],
    pub weights: [[f64; 3]; 3],
}

/// Score vector shapes shared by several parents.
const FAVOURS_LOW: [f64; 3] = [1.0, 0.0, -1.0];
const FAVOURS_HIGH: [f64; 3] = [-1.0, 0.0, 1.0];
const LEANS_HIGH: [f64; 3] = [-0.5, 0.0, 0.5];
const LEANS_MEDIUM: [f64; 3] = [0.0, 0.5, -0.5];

/// Bias over [`RISK_LEVELS`].
pub const BIAS: [f64; 3] = [1.0, 0.0, -1.0];

/// The eight observed parents of [`TARGET`].
pub const PARENTS: [ParentEntry; 8] = [
    ParentEntry {
        name: "Humidity",
        states: ["Low", "Medium", "High"],
        weights: [FAVOURS_LOW, [0.5, 0.5, -0.5], FAVOURS_HIGH],
    },
    ParentEntry {
        name: "NDVI",
        states: ["Poor", "Moderate", "Good"],
        weights: [LEANS_HIGH, LEANS_MEDIUM, FAVOURS_LOW],
    },
    ParentEntry {
        name: "PheromoneCount",
        states: ["Low", "Medium", "High"],
        weights: [FAVOURS_LOW, LEANS_MEDIUM, FAVOURS_HIGH],
    },
    ParentEntry {
        name: "CropMaturity",
        states: ["Early", "Mid", "Late"],
        weights: [FAVOURS_LOW, LEANS_MEDIUM, FAVOURS_HIGH],
    },
    ParentEntry {
        name: "FertilizerType",
        states: ["None", "Organic", "Synthetic"],
        weights: [LEANS_HIGH, LEANS_MEDIUM, FAVOURS_LOW],
    },
    ParentEntry {
        name: "PesticideUsage",
        states: ["Low", "Medium", "High"],
        weights: [LEANS_HIGH, LEANS_MEDIUM, FAVOURS_LOW],
    },
    ParentEntry {
        name: "Yield",
        states: ["Low", "Medium", "High"],
        weights: [LEANS_HIGH, LEANS_MEDIUM, FAVOURS_LOW],
    },
    ParentEntry {
        name: "CropDiseaseStatus",
        states: ["None", "Minor", "Severe"],
        weights: [FAVOURS_LOW, LEANS_MEDIUM, FAVOURS_HIGH],
    },
];

/// Registry with all nine variables and the eight parent edges.
pub fn registry() -> Result<GraphRegistry> {
    let mut reg = GraphRegistry::new();
    for parent in &PARENTS {
        reg.add_variable(parent.name, parent.states)?;
    }
    reg.add_variable(TARGET, RISK_LEVELS)?;
    for parent in &PARENTS {
        reg.add_edge(parent.name, TARGET)?;
    }
    Ok(reg)
}

/// Scoring table for [`TARGET`].
pub fn scoring_table() -> ScoringTable {
    PARENTS.iter().fold(ScoringTable::new(BIAS), |table, parent| {
        table.with_parent(parent.name, parent.states.into_iter().zip(parent.weights))
    })
}

/// The assembled network.
pub fn network() -> Result<Network> {
    Network::new(registry()?, TARGET, scoring_table())
}
