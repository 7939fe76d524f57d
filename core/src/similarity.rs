//! Similarity between two sparse term vectors.
//!
//! Every formula short-circuits to 0 when the dot product is 0, which also covers
//! empty operands, so no formula divides by a zero sum or norm.

use crate::error::EvalError;
use crate::vector::SparseVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned by jaccard when sum(x) + sum(y) - dot(x, y) is exactly 0 after a non-zero dot.
pub const JACCARD_ZERO_DENOMINATOR: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Similarity {
    Cosine,
    Jaccard,
    Dice,
    Overlap,
}

impl Similarity {
    pub const ALL: [Similarity; 4] = [Similarity::Cosine, Similarity::Jaccard, Similarity::Dice, Similarity::Overlap];

    pub fn score(self, x: &SparseVector, y: &SparseVector) -> f64 {
        match self {
            Similarity::Cosine => cosine(x, y),
            Similarity::Jaccard => jaccard(x, y),
            Similarity::Dice => dice(x, y),
            Similarity::Overlap => overlap(x, y),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Similarity::Cosine => "cosine",
            Similarity::Jaccard => "jaccard",
            Similarity::Dice => "dice",
            Similarity::Overlap => "overlap",
        }
    }
}

/// Sum of `x[t] * y[t]` over the terms of the smaller vector.
pub fn dot(x: &SparseVector, y: &SparseVector) -> f64 { x.dot(y) }

pub fn cosine(x: &SparseVector, y: &SparseVector) -> f64 {
    let num = dot(x, y);
    if num == 0.0 {
        return 0.0;
    }
    num / (x.norm() * y.norm())
}

pub fn dice(x: &SparseVector, y: &SparseVector) -> f64 {
    let num = dot(x, y);
    if num == 0.0 {
        return 0.0;
    }
    2.0 * num / (x.sum() + y.sum())
}

pub fn jaccard(x: &SparseVector, y: &SparseVector) -> f64 {
    let num = dot(x, y);
    if num == 0.0 {
        return 0.0;
    }
    let denom = x.sum() + y.sum() - num;
    if denom == 0.0 {
        return JACCARD_ZERO_DENOMINATOR;
    }
    num / denom
}

pub fn overlap(x: &SparseVector, y: &SparseVector) -> f64 {
    let num = dot(x, y);
    if num == 0.0 {
        return 0.0;
    }
    num / x.sum().min(y.sum())
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Similarity {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Similarity::Cosine),
            "jaccard" => Ok(Similarity::Jaccard),
            "dice" => Ok(Similarity::Dice),
            "overlap" => Ok(Similarity::Overlap),
            _ => Err(EvalError::UnknownSimilarity { value: s.to_string() }),
        }
    }
}
