//! # Posterior Engine and Classifier
//!
//! Exact posterior of a target variable given evidence over its parents.
//!
//! When every parent is observed the CPT answers directly. Otherwise each
//! unobserved parent is enumerated over its full domain and the resulting
//! distributions are averaged with equal weight:
//!
//! ```text
//! P(target | e) = 1/|D| · Σ_{d ∈ D} cpt(e ∪ d)      D = Π domain(missing)
//! ```
//!
//! The mean is unweighted. It equals marginalization only under a uniform
//! prior on each missing parent, and must stay that way: callers compare
//! against numbers produced under exactly this rule.
//!
//! Cost is the product of the missing parents' domain sizes. Use
//! [`crate::Network::enumeration_size`] to check it before querying with
//! sparse evidence.

use smallvec::SmallVec;
use tracing::debug;

use crate::model::{Classification, Evidence, Posterior, VarId};
use crate::registry::GraphRegistry;
use crate::scoring::Cpt;

/// Parent slot of the assignment being built.
enum Slot<'a> {
    Observed(&'a str),
    Missing { domain: &'a [String] },
}

/// Posterior over `target`'s states given `evidence`.
///
/// Evidence keys that are not parents of `target` are ignored. A parent
/// present in evidence counts as observed even when its label is unknown to
/// the CPT; it then contributes zero.
///
/// `target` must come from `registry`; [`crate::Network`] holds that pairing.
pub(crate) fn posterior<C>(registry: &GraphRegistry, target: VarId, cpt: &C, evidence: &Evidence) -> Posterior
where
    C: Cpt + ?Sized,
{
    let parents = registry.parent_ids(target);

    let ignored = evidence
        .keys()
        .filter(|k| !parents.iter().any(|&p| registry.name(p) == k.as_str()))
        .count();
    if ignored > 0 {
        debug!(ignored, "evidence keys outside the target's parent set ignored");
    }

    let slots: SmallVec<[(&str, Slot<'_>); 8]> = parents
        .iter()
        .map(|&p| {
            let name = registry.name(p);
            let slot = match evidence.get(name) {
                Some(state) => Slot::Observed(state.as_str()),
                None => Slot::Missing { domain: registry.get(p).map_or(&[][..], |v| v.states.as_slice()) },
            };
            (name, slot)
        })
        .collect();

    let mut assignment: SmallVec<[(&str, &str); 8]> = slots
        .iter()
        .map(|(name, slot)| match slot {
            Slot::Observed(state) => (*name, *state),
            Slot::Missing { domain } => (*name, domain.first().map_or("", String::as_str)),
        })
        .collect();

    // (assignment position, domain) for each missing parent, in parent order
    let missing: SmallVec<[(usize, &[String]); 8]> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, (_, slot))| match slot {
            Slot::Missing { domain } => Some((i, *domain)),
            Slot::Observed(_) => None,
        })
        .collect();

    if missing.is_empty() {
        return cpt.posterior(&assignment);
    }

    debug!(
        missing = missing.len(),
        combinations = missing_product(missing.iter().map(|(_, d)| d.len())),
        "enumerating unobserved parents"
    );

    let mut totals = vec![0.0_f64; cpt.states().len()];
    let mut count = 0_usize;
    let mut odometer: SmallVec<[usize; 8]> = SmallVec::from_elem(0, missing.len());

    loop {
        for (k, &(pos, domain)) in missing.iter().enumerate() {
            assignment[pos].1 = domain[odometer[k]].as_str();
        }

        for (total, p) in totals.iter_mut().zip(cpt.distribution(&assignment)) {
            *total += p;
        }
        count += 1;

        // Advance: last missing parent varies fastest
        let mut k = missing.len();
        loop {
            if k == 0 {
                let mean = totals.into_iter().map(|t| t / count as f64);
                return Posterior::from_pairs(cpt.states().iter().map(String::as_str).zip(mean));
            }
            k -= 1;
            odometer[k] += 1;
            if odometer[k] < missing[k].1.len() {
                break;
            }
            odometer[k] = 0;
        }
    }
}

/// Number of parent combinations [`posterior`] would score for `evidence`.
///
/// 1 when every parent is observed. Saturates at `usize::MAX`.
pub(crate) fn enumeration_size(registry: &GraphRegistry, target: VarId, evidence: &Evidence) -> usize {
    missing_product(
        registry
            .parent_ids(target)
            .iter()
            .filter(|&&p| !evidence.contains_key(registry.name(p)))
            .filter_map(|&p| registry.get(p))
            .map(|v| v.cardinality()),
    )
}

fn missing_product(sizes: impl Iterator<Item = usize>) -> usize {
    sizes.fold(1_usize, usize::saturating_mul)
}

/// Most probable state.
///
/// Iterates in the posterior's canonical order and keeps the first strict
/// improvement, so exact ties go to the earliest state. NaN never wins.
/// `None` only for an empty posterior (or one made entirely of NaN).
pub fn classify(posterior: &Posterior) -> Option<Classification> {
    let mut best: Option<(&str, f64)> = None;
    for (state, p) in posterior.iter() {
        let better = match best {
            None => !p.is_nan(),
            Some((_, top)) => p > top,
        };
        if better {
            best = Some((state, p));
        }
    }
    best.map(|(state, probability)| Classification { state: state.to_string(), probability })
}

// ============================================================================
// Tests
// ============================================================================
