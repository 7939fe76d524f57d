//! Precision/recall evaluation of a full-corpus ranking against relevance judgments.
//!
//! All functions take the complete ranking (every document id exactly once) and the
//! relevant ids for a single query. An empty relevance set is a caller error and is
//! reported as [`EvalError::EmptyRelevance`] instead of producing NaN.

use crate::document::DocId;
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Relevant document ids for one query. Order is kept (ranks are reported in this order),
/// duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevanceSet {
    ids: Vec<DocId>,
    members: HashSet<DocId>,
}

impl RelevanceSet {
    pub fn new(ids: impl IntoIterator<Item = DocId>) -> Self {
        let mut set = Self::default();
        for id in ids {
            set.insert(id);
        }
        set
    }

    pub fn insert(&mut self, id: DocId) {
        if self.members.insert(id) {
            self.ids.push(id);
        }
    }

    pub fn contains(&self, id: DocId) -> bool { self.members.contains(&id) }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    pub fn ids(&self) -> &[DocId] { &self.ids }
}

impl FromIterator<DocId> for RelevanceSet {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self { Self::new(iter) }
}

fn require_relevant(relevant: &RelevanceSet) -> Result<()> {
    if relevant.is_empty() {
        return Err(EvalError::EmptyRelevance { query_id: None });
    }
    Ok(())
}

/// Interpolated precision at `target` recall.
///
/// Walks the ranking and records a (recall, precision) point at every relevant hit.
/// The last point with recall <= target and the first with recall > target bracket the
/// target; precision is linearly interpolated between them. Before any hit the lower
/// bracket is the implicit point (recall 0, precision 1). If the scan ends without a
/// point above the target, the lower bracket's precision is returned, which for
/// `target = 1.0` is `|relevant| / rank of the last relevant document`.
///
/// Every relevant id must appear in `results`, whatever the target.
pub fn precision_at(target: f64, results: &[DocId], relevant: &RelevanceSet) -> Result<f64> {
    require_relevant(relevant)?;
    require_ranked(results, relevant)?;
    let total = relevant.len() as f64;

    let (mut lower_r, mut lower_p) = (0.0, 1.0);
    let mut upper: Option<(f64, f64)> = None;
    let mut hits = 0usize;
    for (i, id) in results.iter().enumerate() {
        if !relevant.contains(*id) {
            continue;
        }
        hits += 1;
        let precision = hits as f64 / (i + 1) as f64;
        let recall = hits as f64 / total;
        if recall > target {
            upper = Some((recall, precision));
            break;
        }
        lower_r = recall;
        lower_p = precision;
    }

    match upper {
        Some((upper_r, upper_p)) => Ok(lower_p + (upper_p - lower_p) * (target - lower_r) / (upper_r - lower_r)),
        None => Ok(lower_p),
    }
}

fn require_ranked(results: &[DocId], relevant: &RelevanceSet) -> Result<()> {
    let ranked: HashSet<DocId> = results.iter().copied().collect();
    match relevant.ids().iter().copied().find(|id| !ranked.contains(id)) {
        Some(doc_id) => Err(EvalError::MissingFromRanking { doc_id }),
        None => Ok(()),
    }
}

/// Mean of interpolated precision at recall 0.25, 0.5 and 0.75.
pub fn mean_precision1(results: &[DocId], relevant: &RelevanceSet) -> Result<f64> {
    let sum = [0.25, 0.5, 0.75]
        .into_iter()
        .map(|r| precision_at(r, results, relevant))
        .sum::<Result<f64>>()?;
    Ok(sum / 3.0)
}

/// Mean of interpolated precision at recall 0.1, 0.2, ..., 1.0.
pub fn mean_precision2(results: &[DocId], relevant: &RelevanceSet) -> Result<f64> {
    let sum = (1..=10)
        .map(|i| precision_at(0.1 * i as f64, results, relevant))
        .sum::<Result<f64>>()?;
    Ok(0.1 * sum)
}

/// 1-based position of each relevant document in the ranking, in relevance-set order.
pub fn rank_of_relevant(results: &[DocId], relevant: &RelevanceSet) -> Result<Vec<usize>> {
    let mut position: HashMap<DocId, usize> = HashMap::with_capacity(results.len());
    for (i, id) in results.iter().enumerate() {
        position.entry(*id).or_insert(i + 1);
    }
    relevant
        .ids()
        .iter()
        .map(|id| position.get(id).copied().ok_or(EvalError::MissingFromRanking { doc_id: *id }))
        .collect()
}

fn check_sizes(metric: &'static str, relevant: usize, corpus: usize) -> Result<()> {
    if relevant == 0 {
        return Err(EvalError::EmptyRelevance { query_id: None });
    }
    if relevant >= corpus {
        return Err(EvalError::DegenerateCorpus { metric, relevant, corpus });
    }
    Ok(())
}

/// `1 - (Σ rank_i - Σ i) / (Rel · (N - Rel))`, with N the ranking length.
///
/// Requires `0 < Rel < N`.
pub fn norm_recall(results: &[DocId], relevant: &RelevanceSet) -> Result<f64> {
    let (n, rel) = (results.len(), relevant.len());
    check_sizes("normalized recall", rel, n)?;
    let ranks = rank_of_relevant(results, relevant)?;

    let sum_ranks: usize = ranks.iter().sum();
    let ideal: usize = (1..=rel).sum();
    Ok(1.0 - (sum_ranks as f64 - ideal as f64) / (rel as f64 * (n - rel) as f64))
}

/// `1 - (Σ ln rank_i - Σ ln i) / (N ln N - (N - Rel) ln(N - Rel) - Rel ln Rel)`.
///
/// Requires `0 < Rel < N`, which keeps every logarithm argument positive.
pub fn norm_precision(results: &[DocId], relevant: &RelevanceSet) -> Result<f64> {
    let (n, rel) = (results.len(), relevant.len());
    check_sizes("normalized precision", rel, n)?;
    let ranks = rank_of_relevant(results, relevant)?;

    let log_ranks: f64 = ranks.iter().map(|r| (*r as f64).ln()).sum();
    let log_ideal: f64 = (1..=rel).map(|i| (i as f64).ln()).sum();
    let (n, rel) = (n as f64, rel as f64);
    let denom = n * n.ln() - (n - rel) * (n - rel).ln() - rel * rel.ln();
    Ok(1.0 - (log_ranks - log_ideal) / denom)
}

/// The eight numbers reported per query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryMetrics {
    #[serde(rename = "p_0.25")]
    pub p_025: f64,
    #[serde(rename = "p_0.5")]
    pub p_050: f64,
    #[serde(rename = "p_0.75")]
    pub p_075: f64,
    #[serde(rename = "p_1.0")]
    pub p_100: f64,
    pub p_mean1: f64,
    pub p_mean2: f64,
    pub r_norm: f64,
    pub p_norm: f64,
}

impl QueryMetrics {
    pub const HEADER: [&'static str; 8] = ["p_0.25", "p_0.5", "p_0.75", "p_1.0", "p_mean1", "p_mean2", "r_norm", "p_norm"];

    pub fn values(&self) -> [f64; 8] {
        [self.p_025, self.p_050, self.p_075, self.p_100, self.p_mean1, self.p_mean2, self.r_norm, self.p_norm]
    }

    fn from_values(v: [f64; 8]) -> Self {
        Self { p_025: v[0], p_050: v[1], p_075: v[2], p_100: v[3], p_mean1: v[4], p_mean2: v[5], r_norm: v[6], p_norm: v[7] }
    }

    /// Field-wise average; `None` for an empty slice.
    pub fn mean(all: &[QueryMetrics]) -> Option<QueryMetrics> {
        if all.is_empty() {
            return None;
        }
        let mut acc = [0.0; 8];
        for m in all {
            for (a, v) in acc.iter_mut().zip(m.values()) {
                *a += v;
            }
        }
        Some(Self::from_values(acc.map(|a| a / all.len() as f64)))
    }
}

/// Computes all eight metrics for one query.
pub fn evaluate(results: &[DocId], relevant: &RelevanceSet) -> Result<QueryMetrics> {
    Ok(QueryMetrics {
        p_025: precision_at(0.25, results, relevant)?,
        p_050: precision_at(0.5, results, relevant)?,
        p_075: precision_at(0.75, results, relevant)?,
        p_100: precision_at(1.0, results, relevant)?,
        p_mean1: mean_precision1(results, relevant)?,
        p_mean2: mean_precision2(results, relevant)?,
        r_norm: norm_recall(results, relevant)?,
        p_norm: norm_precision(results, relevant)?,
    })
}
