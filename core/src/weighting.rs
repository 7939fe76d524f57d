//! Document -> term-weight vector conversion.

use crate::doc_freq::DocFreqTable;
use crate::document::{Document, Field, TermWeights};
use crate::error::EvalError;
use crate::vector::SparseVector;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightingScheme {
    /// Field-weighted term frequency: each occurrence adds its field's multiplier.
    Tf,
    /// Field-weighted term frequency divided by document frequency (a plain ratio, no log).
    #[serde(rename = "tfidf")]
    TfIdf,
    /// 1 for every term present, regardless of field or count.
    Boolean,
}

impl WeightingScheme {
    pub const ALL: [WeightingScheme; 3] = [WeightingScheme::Tf, WeightingScheme::TfIdf, WeightingScheme::Boolean];

    pub fn vectorize(self, doc: &Document, doc_freqs: &DocFreqTable, weights: &TermWeights) -> SparseVector {
        match self {
            WeightingScheme::Tf => weighted_tf(doc, weights).into_iter().collect(),
            WeightingScheme::TfIdf => tf_over_df(doc, doc_freqs, weights),
            WeightingScheme::Boolean => accumulation_order(doc).map(|(_, t)| (t, 1.0)).collect(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeightingScheme::Tf => "tf",
            WeightingScheme::TfIdf => "tfidf",
            WeightingScheme::Boolean => "boolean",
        }
    }
}

/// Free-function form of [`WeightingScheme::vectorize`].
pub fn vectorize(doc: &Document, doc_freqs: &DocFreqTable, weights: &TermWeights, scheme: WeightingScheme) -> SparseVector {
    scheme.vectorize(doc, doc_freqs, weights)
}

/// Vector terms are inserted author, keyword, title, abstract; the order fixes the
/// float summation order of every later reduction.
const ACCUMULATION_ORDER: [Field; 4] = [Field::Author, Field::Keyword, Field::Title, Field::Abstract];

fn accumulation_order(doc: &Document) -> impl Iterator<Item = (Field, &str)> + '_ {
    ACCUMULATION_ORDER
        .into_iter()
        .flat_map(move |f| doc.field(f).iter().map(move |t| (f, t.as_str())))
}

fn weighted_tf(doc: &Document, weights: &TermWeights) -> IndexMap<String, f64> {
    let mut acc: IndexMap<String, f64> = IndexMap::new();
    for (field, term) in accumulation_order(doc) {
        *acc.entry(term.to_string()).or_insert(0.0) += weights.get(field);
    }
    acc
}

fn tf_over_df(doc: &Document, doc_freqs: &DocFreqTable, weights: &TermWeights) -> SparseVector {
    weighted_tf(doc, weights)
        .into_iter()
        .map(|(term, tf)| {
            let df = doc_freqs.get(&term);
            // terms unseen in the corpus (typically query-only terms) get no weight
            let w = if df == 0 { 0.0 } else { tf / df as f64 };
            (term, w)
        })
        .collect()
}

impl fmt::Display for WeightingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for WeightingScheme {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tf" => Ok(WeightingScheme::Tf),
            "tfidf" | "tf-idf" => Ok(WeightingScheme::TfIdf),
            "boolean" | "bool" => Ok(WeightingScheme::Boolean),
            _ => Err(EvalError::UnknownScheme { value: s.to_string() }),
        }
    }
}
