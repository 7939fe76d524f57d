use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Term -> weight map holding only non-zero entries. Built once, never mutated afterwards.
///
/// Entries keep insertion order, so `sum`, `norm` and `dot` add in the same order for
/// identically built vectors and produce bit-identical results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    weights: IndexMap<String, f64>,
}

impl SparseVector {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, term: &str) -> f64 { self.weights.get(term).copied().unwrap_or(0.0) }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    pub fn contains(&self, term: &str) -> bool { self.weights.contains_key(term) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }

    /// Sum of weights (the L1 norm, since weights are non-negative).
    pub fn sum(&self) -> f64 { self.weights.values().sum() }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 { self.weights.values().map(|w| w * w).sum::<f64>().sqrt() }

    /// Dot product, iterating the smaller operand.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small.iter().map(|(t, w)| w * large.get(t)).sum()
    }
}

impl FromIterator<(String, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let weights = iter.into_iter().filter(|(_, w)| *w != 0.0).collect();
        Self { weights }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        iter.into_iter().map(|(t, w)| (t.to_string(), w)).collect()
    }
}
