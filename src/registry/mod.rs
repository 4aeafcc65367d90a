//! # Graph Registry
//!
//! Owns the network's variables and their parent/child adjacency.
//!
//! Variables live in a dense `Vec` indexed by [`VarId`]; a name index maps
//! identifiers back to ids. Registration order is canonical: it fixes the
//! order of every `parents_of` / `children_of` answer and therefore the
//! enumeration order of missing parents.
//!
//! ## Preconditions
//!
//! - **No cycle check**: `add_edge` trusts the caller to keep the graph
//!   acyclic. The independence search still terminates on cyclic input
//!   because it tracks visited items, but its answer is meaningless there.
//! - **Build once**: the registry is mutable only while a model is being
//!   assembled. [`Network`](crate::Network) takes ownership and exposes it
//!   read-only.

use hashbrown::HashMap;
use tracing::trace;

use crate::model::{VarId, Variable};
use crate::{Error, Result};

/// Registry of discrete variables and directed edges.
#[derive(Debug, Clone, Default)]
pub struct GraphRegistry {
    variables: Vec<Variable>,
    by_name: HashMap<String, VarId>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Register a variable with a non-empty, duplicate-free state list.
    pub fn add_variable<S>(&mut self, name: &str, states: impl IntoIterator<Item = S>) -> Result<VarId>
    where
        S: Into<String>,
    {
        if self.by_name.contains_key(name) {
            return Err(Error::DuplicateVariable(name.to_string()));
        }

        let states: Vec<String> = states.into_iter().map(Into::into).collect();
        if states.is_empty() {
            return Err(Error::EmptyStates(name.to_string()));
        }
        for (i, state) in states.iter().enumerate() {
            if states[..i].contains(state) {
                return Err(Error::DuplicateState {
                    variable: name.to_string(),
                    state: state.clone(),
                });
            }
        }

        let id = VarId(self.variables.len());
        trace!(variable = name, %id, states = states.len(), "registered variable");
        self.variables.push(Variable::new(id, name, states));
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Add the directed edge `parent -> child`. Both endpoints must exist.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        let p = self.require(parent)?;
        let c = self.require(child)?;

        self.variables[p.0].children.push(c);
        self.variables[c.0].parents.push(p);
        trace!(parent, child, "registered edge");
        Ok(())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn id_of(&self, name: &str) -> Option<VarId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Resolve a name, failing with `UnknownVariable`.
    pub fn require(&self, name: &str) -> Result<VarId> {
        self.id_of(name).ok_or_else(|| Error::UnknownVariable(name.to_string()))
    }

    /// Variable behind an id this registry handed out.
    pub(crate) fn var(&self, id: VarId) -> &Variable {
        &self.variables[id.0]
    }

    pub(crate) fn name(&self, id: VarId) -> &str {
        &self.var(id).name
    }

    pub(crate) fn parent_ids(&self, id: VarId) -> &[VarId] {
        &self.var(id).parents
    }

    pub(crate) fn child_ids(&self, id: VarId) -> &[VarId] {
        &self.var(id).children
    }

    // ========================================================================
    // Read-only queries by name
    // ========================================================================

    /// Canonical state order of `name`.
    pub fn states_of(&self, name: &str) -> Result<&[String]> {
        let id = self.require(name)?;
        Ok(&self.var(id).states)
    }

    /// Parents of `name`, in edge registration order.
    pub fn parents_of(&self, name: &str) -> Result<Vec<&str>> {
        let id = self.require(name)?;
        Ok(self.parent_ids(id).iter().map(|&p| self.name(p)).collect())
    }

    /// Children of `name`, in edge registration order.
    pub fn children_of(&self, name: &str) -> Result<Vec<&str>> {
        let id = self.require(name)?;
        Ok(self.child_ids(id).iter().map(|&c| self.name(c)).collect())
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// All variables in registration order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    /// All edges as `(parent, child)` names, grouped by parent in
    /// registration order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().flat_map(move |v| {
            v.children.iter().map(move |&c| (v.name.as_str(), self.name(c)))
        })
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.variables.iter().map(|v| v.children.len()).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================
