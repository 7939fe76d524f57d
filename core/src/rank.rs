use crate::document::DocId;
use crate::vector::SparseVector;
use std::cmp::Ordering;

/// Scores every document against the query and returns `(doc_id, score)` sorted by descending score.
/// Ids are `index + 1`. The sort is stable, so equal scores keep corpus order.
pub fn rank_scored<F>(doc_vectors: &[SparseVector], query: &SparseVector, similarity: F) -> Vec<(DocId, f64)>
where
    F: Fn(&SparseVector, &SparseVector) -> f64,
{
    let mut scored: Vec<(DocId, f64)> = doc_vectors
        .iter()
        .enumerate()
        .map(|(i, doc)| ((i + 1) as DocId, similarity(query, doc)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
}

/// Full-corpus ranking of document ids; no top-k cut.
pub fn rank<F>(doc_vectors: &[SparseVector], query: &SparseVector, similarity: F) -> Vec<DocId>
where
    F: Fn(&SparseVector, &SparseVector) -> f64,
{
    rank_scored(doc_vectors, query, similarity).into_iter().map(|(id, _)| id).collect()
}
