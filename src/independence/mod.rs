//! # Independence Oracle
//!
//! Conditional-independence queries on the network's directed graph, answered
//! by a Bayes-ball style reachability search over `(variable, flow)` items.
//!
//! ## Transition rules
//!
//! | Node conditioned? | Flow        | Enqueue                                   |
//! |-------------------|-------------|-------------------------------------------|
//! | no                | Ascending   | parents as Ascending, children as Descending |
//! | no                | Descending  | children as Descending                    |
//! | yes               | Ascending   | parents as Ascending                      |
//! | yes               | Descending  | nothing                                   |
//!
//! Reaching `y` in any flow means an active path exists.
//!
//! ## Limitations
//!
//! - **No collider activation**: a conditioned node entered from a parent
//!   always blocks. Textbook Bayes-ball reopens the path there. The rule set
//!   above is kept as is; the fixed model has a single child with many
//!   parents and no deeper v-structures.
//! - **Asymmetric**: `is_independent(x, y, z)` and `is_independent(y, x, z)`
//!   can differ, e.g. on a chain conditioned on its middle node.

use std::collections::VecDeque;

use hashbrown::HashSet;
use tracing::debug;

use crate::model::{Flow, VarId};
use crate::registry::GraphRegistry;
use crate::Result;

/// `true` when every path from `x` to `y` is blocked given `given`.
///
/// `x` and `y` must be registered; unknown names in `given` are ignored.
pub fn is_independent<I, S>(registry: &GraphRegistry, x: &str, y: &str, given: I) -> Result<bool>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let start = registry.require(x)?;
    let goal = registry.require(y)?;
    let given: HashSet<VarId> = given
        .into_iter()
        .filter_map(|name| registry.id_of(name.as_ref()))
        .collect();

    let (reachable, visited) = reaches(registry, start, goal, &given);
    debug!(x, y, conditioned = given.len(), visited, independent = !reachable, "independence query");
    Ok(!reachable)
}

/// Breadth-first search from `start`. Returns whether `goal` was reached and
/// how many distinct items were processed.
fn reaches(registry: &GraphRegistry, start: VarId, goal: VarId, given: &HashSet<VarId>) -> (bool, usize) {
    let mut queue: VecDeque<(VarId, Flow)> = VecDeque::new();
    let mut visited: HashSet<(VarId, Flow)> = HashSet::new();

    queue.push_back((start, Flow::Ascending));
    queue.push_back((start, Flow::Descending));

    while let Some(item) = queue.pop_front() {
        if !visited.insert(item) {
            continue;
        }

        let (node, flow) = item;
        if node == goal {
            return (true, visited.len());
        }

        match (given.contains(&node), flow) {
            (false, Flow::Ascending) => {
                queue.extend(registry.parent_ids(node).iter().map(|&p| (p, Flow::Ascending)));
                queue.extend(registry.child_ids(node).iter().map(|&c| (c, Flow::Descending)));
            }
            (false, Flow::Descending) => {
                queue.extend(registry.child_ids(node).iter().map(|&c| (c, Flow::Descending)));
            }
            (true, Flow::Ascending) => {
                queue.extend(registry.parent_ids(node).iter().map(|&p| (p, Flow::Ascending)));
            }
            (true, Flow::Descending) => {}
        }
    }

    (false, visited.len())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn registry(vars: &[&str], edges: &[(&str, &str)]) -> GraphRegistry {
        let mut reg = GraphRegistry::new();
        for v in vars {
            reg.add_variable(v, ["0", "1"]).unwrap();
        }
        for (p, c) in edges {
            reg.add_edge(p, c).unwrap();
        }
        reg
    }

    const NONE: [&str; 0] = [];

    #[test]
    fn test_self_query_is_dependent() {
        let reg = registry(&["A"], &[]);
        assert!(!is_independent(&reg, "A", "A", NONE).unwrap());
        // Conditioning on x itself does not matter: x is popped first
        assert!(!is_independent(&reg, "A", "A", ["A"]).unwrap());
    }

    #[test]
    fn test_disconnected_variables_are_independent() {
        let reg = registry(&["A", "B"], &[]);
        assert!(is_independent(&reg, "A", "B", NONE).unwrap());
    }

    #[test]
    fn test_chain_blocked_by_middle() {
        let reg = registry(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert!(!is_independent(&reg, "A", "C", NONE).unwrap());
        assert!(is_independent(&reg, "A", "C", ["B"]).unwrap());
    }

    #[test]
    fn test_chain_query_from_descendant_is_not_blocked() {
        // Ascending through a conditioned node still reaches its parents
        let reg = registry(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert!(!is_independent(&reg, "C", "A", NONE).unwrap());
        assert!(!is_independent(&reg, "C", "A", ["B"]).unwrap());
    }

    #[test]
    fn test_fork_blocked_by_common_cause() {
        let reg = registry(&["A", "B", "C"], &[("B", "A"), ("B", "C")]);
        assert!(!is_independent(&reg, "A", "C", NONE).unwrap());
        assert!(is_independent(&reg, "A", "C", ["B"]).unwrap());
    }

    #[test]
    fn test_collider_stays_blocked_when_conditioned() {
        let reg = registry(&["A", "B", "C"], &[("A", "C"), ("B", "C")]);
        assert!(is_independent(&reg, "A", "B", NONE).unwrap());
        assert!(is_independent(&reg, "A", "B", ["C"]).unwrap());
    }

    #[test]
    fn test_descendant_of_collider_reached_downstream() {
        let reg = registry(&["A", "B", "C", "D"], &[("A", "C"), ("B", "C"), ("C", "D")]);
        assert!(!is_independent(&reg, "A", "D", NONE).unwrap());
        assert!(is_independent(&reg, "A", "D", ["C"]).unwrap());
    }

    #[test]
    fn test_unknown_conditioning_names_ignored() {
        let reg = registry(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert!(!is_independent(&reg, "A", "C", ["Nope"]).unwrap());
    }

    #[test]
    fn test_unknown_endpoints_rejected() {
        let reg = registry(&["A"], &[]);
        assert!(matches!(is_independent(&reg, "Z", "A", NONE), Err(Error::UnknownVariable(ref n)) if n == "Z"));
        assert!(matches!(is_independent(&reg, "A", "Z", NONE), Err(Error::UnknownVariable(ref n)) if n == "Z"));
    }

    #[test]
    fn test_cycle_terminates() {
        // Not a valid network, but the visited set must still bound the search
        let reg = registry(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        assert!(is_independent(&reg, "A", "D", NONE).unwrap());
        let (_, visited) = reaches(&reg, VarId(0), VarId(3), &HashSet::new());
        assert!(visited <= 2 * reg.len());
    }
}
