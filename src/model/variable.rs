//! Variable (node) in the network graph.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Opaque variable identifier. Dense, assigned in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Adjacency list. Fan-in and fan-out are small for the models we carry.
pub type Adjacency = SmallVec<[VarId; 8]>;

/// A named discrete random variable.
///
/// `states` order is canonical: it indexes scoring vectors and breaks ties
/// in classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VarId,
    pub name: String,
    pub states: Vec<String>,
    pub parents: Adjacency,
    pub children: Adjacency,
}

impl Variable {
    pub fn new(id: VarId, name: impl Into<String>, states: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id,
            name: name.into(),
            states: states.into_iter().map(Into::into).collect(),
            parents: Adjacency::new(),
            children: Adjacency::new(),
        }
    }

    /// Position of `state` in the canonical order.
    pub fn state_index(&self, state: &str) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }

    pub fn cardinality(&self) -> usize {
        self.states.len()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Direction a reachability item travels in the independence search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flow {
    /// Arrived from a child; may continue to parents.
    Ascending,
    /// Arrived from a parent; may continue to children.
    Descending,
}
