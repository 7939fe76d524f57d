//! Vector-space retrieval evaluation: term weighting, similarity, ranking and
//! precision/recall metrics over in-memory documents.

pub mod corpus;
pub mod doc_freq;
pub mod document;
pub mod error;
pub mod metrics;
pub mod rank;
pub mod similarity;
pub mod tokenizer;
pub mod vector;
pub mod weighting;

pub use doc_freq::DocFreqTable;
pub use document::{DocId, Document, Field, TermWeights};
pub use error::{EvalError, Result};
pub use metrics::{evaluate, QueryMetrics, RelevanceSet};
pub use rank::{rank, rank_scored};
pub use similarity::Similarity;
pub use vector::SparseVector;
pub use weighting::{vectorize, WeightingScheme};
