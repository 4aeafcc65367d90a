//! Evidence: the observed partial assignment supplied per query.

use std::collections::HashMap;

/// Variable name → observed state label.
///
/// Need not cover every parent of the target. Keys the model does not know,
/// and labels a parent does not define, are tolerated and score as zero.
pub type Evidence = HashMap<String, String>;

/// Build evidence from `(variable, state)` pairs.
pub fn evidence<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Evidence
where
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
