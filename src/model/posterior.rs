//! Posterior distribution over a variable's states.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Probabilities per state, kept in the variable's canonical state order.
///
/// Values produced by the engine are strictly positive and sum to 1 within
/// floating-point tolerance. Serializes as a `{ state: probability }` map
/// whose keys follow the canonical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Posterior {
    entries: Vec<(String, f64)>,
}

impl Posterior {
    /// Build from `(state, probability)` pairs. Iteration order is kept as the
    /// canonical order.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self { entries: pairs.into_iter().map(|(s, p)| (s.into(), p)).collect() }
    }

    pub fn get(&self, state: &str) -> Option<f64> {
        self.entries.iter().find(|(s, _)| s == state).map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, p)| (s.as_str(), *p))
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, p)| *p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all probabilities. 1.0 for engine output, up to rounding.
    pub fn total(&self) -> f64 {
        self.probabilities().sum()
    }
}

impl<'a> IntoIterator for &'a Posterior {
    type Item = (&'a str, f64);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (String, f64)>, fn(&'a (String, f64)) -> (&'a str, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        fn pair(e: &(String, f64)) -> (&str, f64) {
            (e.0.as_str(), e.1)
        }
        self.entries.iter().map(pair as fn(&'a (String, f64)) -> (&'a str, f64))
    }
}

impl Serialize for Posterior {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (state, p) in &self.entries {
            map.serialize_entry(state, p)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Posterior {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PosteriorVisitor;

        impl<'de> Visitor<'de> for PosteriorVisitor {
            type Value = Posterior;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of state to probability")
            }

            // Document order is kept as the canonical order
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Posterior, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((state, p)) = access.next_entry::<String, f64>()? {
                    entries.push((state, p));
                }
                Ok(Posterior { entries })
            }
        }

        deserializer.deserialize_map(PosteriorVisitor)
    }
}

/// The most probable state of a posterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub state: String,
    pub probability: f64,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3})", self.state, self.probability)
    }
}
