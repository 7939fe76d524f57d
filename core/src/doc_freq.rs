use crate::document::Document;
use std::collections::{HashMap, HashSet};

/// Number of documents in a corpus containing each term at least once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocFreqTable {
    counts: HashMap<String, u32>,
    num_docs: usize,
}

impl DocFreqTable {
    /// Single pass over the corpus; repeats of a term inside one document count once.
    pub fn build(corpus: &[Document]) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for doc in corpus {
            let seen_in_doc: HashSet<&str> = doc.tokens().map(|(_, t)| t).collect();
            for term in seen_in_doc {
                *counts.entry(term.to_string()).or_insert(0) += 1;
            }
        }
        tracing::debug!(num_docs = corpus.len(), num_terms = counts.len(), "built document-frequency table");
        Self { counts, num_docs: corpus.len() }
    }

    /// 0 for terms never seen in the corpus.
    pub fn get(&self, term: &str) -> u32 { self.counts.get(term).copied().unwrap_or(0) }

    pub fn num_terms(&self) -> usize { self.counts.len() }

    pub fn num_docs(&self) -> usize { self.num_docs }
}
