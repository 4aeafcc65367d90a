//! Property tests for posterior invariants, classifier tie-breaking and
//! independence-search behaviour on random DAGs.

use agrobayes::inference::classify;
use agrobayes::pest::PARENTS;
use agrobayes::{Cpt, Evidence, GraphRegistry, Network, Posterior, ScoringTable};
use proptest::prelude::*;

/// Evidence over the pest network: each parent is absent, set to one of its
/// states, or set to a label the model does not know.
fn pest_evidence() -> impl Strategy<Value = Evidence> {
    prop::collection::vec(0usize..5, PARENTS.len()).prop_map(|picks| {
        PARENTS
            .iter()
            .zip(picks)
            .filter_map(|(parent, pick)| match pick {
                0 | 1 | 2 => Some((parent.name.to_string(), parent.states[pick].to_string())),
                3 => Some((parent.name.to_string(), "Unknown".to_string())),
                _ => None,
            })
            .collect()
    })
}

/// Three parents with random domain sizes feeding a binary target, with
/// random weights. Returns the network and each parent's states.
fn small_network(sizes: &[usize], weights: &[f64]) -> (Network, Vec<(String, Vec<String>)>) {
    let mut reg = GraphRegistry::new();
    let mut table = ScoringTable::new([weights[0], -weights[0]]);
    let mut parents = Vec::new();
    let mut w = weights[1..].iter().copied();

    for (i, &size) in sizes.iter().enumerate() {
        let name = format!("P{i}");
        let states: Vec<String> = (0..size).map(|s| format!("s{s}")).collect();
        reg.add_variable(&name, states.clone()).unwrap();
        for s in &states {
            let x = w.next().unwrap_or(0.0);
            table.insert(name.clone(), s.clone(), [x, -x / 2.0]);
        }
        parents.push((name, states));
    }
    reg.add_variable("T", ["no", "yes"]).unwrap();
    for (name, _) in &parents {
        reg.add_edge(name, "T").unwrap();
    }
    (Network::new(reg, "T", table).unwrap(), parents)
}

/// Brute-force unweighted mean over every completion of `evidence`.
fn brute_force_mean(net: &Network, parents: &[(String, Vec<String>)], evidence: &Evidence) -> Vec<f64> {
    fn walk(
        net: &Network,
        parents: &[(String, Vec<String>)],
        evidence: &Evidence,
        chosen: &mut Vec<(String, String)>,
        sums: &mut Vec<f64>,
        count: &mut usize,
    ) {
        let Some(((name, states), rest)) = parents.split_first() else {
            let assignment: Vec<(&str, &str)> = chosen.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
            for (sum, p) in sums.iter_mut().zip(net.cpt().distribution(&assignment)) {
                *sum += p;
            }
            *count += 1;
            return;
        };
        match evidence.get(name) {
            Some(state) => {
                chosen.push((name.clone(), state.clone()));
                walk(net, rest, evidence, chosen, sums, count);
                chosen.pop();
            }
            None => {
                for state in states {
                    chosen.push((name.clone(), state.clone()));
                    walk(net, rest, evidence, chosen, sums, count);
                    chosen.pop();
                }
            }
        }
    }

    let mut sums = vec![0.0; 2];
    let mut count = 0;
    walk(net, parents, evidence, &mut Vec::new(), &mut sums, &mut count);
    assert_eq!(count, net.enumeration_size(evidence));
    sums.into_iter().map(|s| s / count as f64).collect()
}

/// Random DAG: edges only go from lower to higher index.
fn random_dag(n: usize, edges: &[(usize, usize)]) -> GraphRegistry {
    let mut reg = GraphRegistry::new();
    for i in 0..n {
        reg.add_variable(&format!("V{i}"), ["0", "1"]).unwrap();
    }
    for &(a, b) in edges {
        let (a, b) = (a % n, b % n);
        if a < b {
            reg.add_edge(&format!("V{a}"), &format!("V{b}")).unwrap();
        }
    }
    reg
}

/// Weakly connected component label per variable.
fn components(reg: &GraphRegistry) -> Vec<usize> {
    let n = reg.len();
    let mut label: Vec<usize> = (0..n).collect();
    loop {
        let mut changed = false;
        for (p, c) in reg.edges() {
            let (p, c) = (reg.id_of(p).unwrap().0, reg.id_of(c).unwrap().0);
            let m = label[p].min(label[c]);
            if label[p] != m || label[c] != m {
                label[p] = m;
                label[c] = m;
                changed = true;
            }
        }
        if !changed {
            return label;
        }
    }
}

proptest! {
    #[test]
    fn posterior_is_a_distribution(ev in pest_evidence()) {
        let net = Network::pest_outbreak().unwrap();
        let post = net.posterior(&ev);
        prop_assert_eq!(post.len(), 3);
        prop_assert!((post.total() - 1.0).abs() < 1e-9);
        prop_assert!(post.probabilities().all(|p| p > 0.0 && p < 1.0));
    }

    #[test]
    fn posterior_equals_mean_over_completions(
        sizes in prop::collection::vec(1usize..5, 3),
        weights in prop::collection::vec(-3.0f64..3.0, 16),
        mask in prop::collection::vec(prop::option::of(0usize..4), 3),
    ) {
        let (net, parents) = small_network(&sizes, &weights);
        let ev: Evidence = parents
            .iter()
            .zip(&mask)
            .filter_map(|((name, states), pick)| {
                pick.map(|i| (name.clone(), states[i % states.len()].clone()))
            })
            .collect();

        let expected = brute_force_mean(&net, &parents, &ev);
        let post = net.posterior(&ev);
        for (got, want) in post.probabilities().zip(expected) {
            prop_assert!((got - want).abs() < 1e-12, "got {} want {}", got, want);
        }
    }

    #[test]
    fn classifier_picks_first_maximum(probs in prop::collection::vec(0u8..5, 1..8)) {
        let post = Posterior::from_pairs(
            probs.iter().enumerate().map(|(i, &p)| (format!("s{i}"), p as f64 / 10.0)),
        );
        let max = *probs.iter().max().unwrap();
        let first = probs.iter().position(|&p| p == max).unwrap();

        let class = classify(&post).unwrap();
        prop_assert_eq!(class.state, format!("s{first}"));
        prop_assert_eq!(class.probability, max as f64 / 10.0);
    }

    #[test]
    fn independence_search_on_random_dags(
        n in 1usize..9,
        edges in prop::collection::vec((0usize..9, 0usize..9), 0..16),
        x in 0usize..9,
        y in 0usize..9,
        given in prop::collection::vec(0usize..9, 0..4),
    ) {
        let reg = random_dag(n, &edges);
        let (x, y) = (x % n, y % n);
        let given: Vec<String> = given.iter().map(|g| format!("V{}", g % n)).collect();
        let (xn, yn) = (format!("V{x}"), format!("V{y}"));

        let independent = agrobayes::independence::is_independent(&reg, &xn, &yn, &given).unwrap();

        if x == y {
            prop_assert!(!independent);
        }
        let comp = components(&reg);
        if comp[x] != comp[y] {
            prop_assert!(independent);
        }
        // Without conditioning, an ancestor always reaches its descendants
        let downstream = reg.children_of(&xn).unwrap().contains(&yn.as_str());
        if downstream {
            let open = agrobayes::independence::is_independent(&reg, &xn, &yn, Vec::<String>::new()).unwrap();
            prop_assert!(!open);
        }
    }
}
