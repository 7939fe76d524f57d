//! Precondition violations raised by the weighting, ranking and evaluation code.

use crate::document::{DocId, Field};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A metric was asked to evaluate a query with no relevant documents.
    #[error("relevance set is empty{}", query_label(.query_id))]
    EmptyRelevance { query_id: Option<u32> },

    /// A relevant document does not occur in the ranking.
    #[error("relevant document {doc_id} is missing from the ranking; the ranking must cover the whole corpus")]
    MissingFromRanking { doc_id: DocId },

    /// Normalized metrics are undefined unless 0 < relevant < corpus.
    #[error("{metric} requires 0 < relevant < corpus size, got relevant = {relevant}, corpus size = {corpus}")]
    DegenerateCorpus { metric: &'static str, relevant: usize, corpus: usize },

    #[error("{field} weight must be finite and non-negative, got {value}")]
    InvalidWeight { field: Field, value: f64 },

    #[error("unknown weighting scheme '{value}'\n  Valid options: tf, tfidf, boolean")]
    UnknownScheme { value: String },

    #[error("unknown similarity '{value}'\n  Valid options: cosine, jaccard, dice, overlap")]
    UnknownSimilarity { value: String },
}

impl EvalError {
    /// Attach the query id to an `EmptyRelevance` error; other variants pass through.
    pub fn for_query(self, id: u32) -> Self {
        match self {
            Self::EmptyRelevance { .. } => Self::EmptyRelevance { query_id: Some(id) },
            other => other,
        }
    }
}

fn query_label(id: &Option<u32>) -> String {
    id.map(|q| format!(" for query {q}")).unwrap_or_default()
}
