//! # Network Model
//!
//! Plain DTOs shared by the registry, scorer, inference engine and
//! independence oracle.
//!
//! Design rule: pure data. No I/O, no interior mutability.

pub mod variable;
pub mod evidence;
pub mod posterior;

pub use variable::{Adjacency, Flow, VarId, Variable};
pub use evidence::{evidence, Evidence};
pub use posterior::{Classification, Posterior};
