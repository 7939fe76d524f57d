use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use vsm::corpus::{read_docs_file, read_rels_file, read_stopwords_file, Judgments};
use vsm::tokenizer::{Preprocess, Stemmer, StopwordFilter};
use vsm::{evaluate, DocFreqTable, DocId, Document, EvalError, QueryMetrics, Similarity, SparseVector, TermWeights, WeightingScheme};

/// Axes of the configuration grid. Missing axes in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub term: Vec<WeightingScheme>,
    pub stem: Vec<bool>,
    pub removestop: Vec<bool>,
    pub sim: Vec<Similarity>,
    pub weights: Vec<TermWeights>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            term: WeightingScheme::ALL.to_vec(),
            stem: vec![false, true],
            removestop: vec![false, true],
            sim: vec![Similarity::Cosine, Similarity::Jaccard, Similarity::Dice, Similarity::Overlap],
            weights: vec![
                TermWeights::UNIFORM,
                TermWeights { author: 1.0, title: 3.0, keyword: 4.0, abstract_: 1.0 },
                TermWeights { author: 1.0, title: 1.0, keyword: 1.0, abstract_: 4.0 },
            ],
        }
    }
}

impl SweepConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let config: SweepConfig = serde_json::from_reader(BufReader::new(f)).with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for w in &self.weights {
            w.validate()?;
        }
        if self.configurations().is_empty() {
            bail!("sweep has an empty axis; nothing to evaluate");
        }
        Ok(())
    }

    /// Cartesian product in term, stem, removestop, sim, weights order.
    pub fn configurations(&self) -> Vec<Configuration> {
        let mut out = Vec::new();
        for &scheme in &self.term {
            for &stem in &self.stem {
                for &remove_stopwords in &self.removestop {
                    for &similarity in &self.sim {
                        for &weights in &self.weights {
                            out.push(Configuration { scheme, stem, remove_stopwords, similarity, weights });
                        }
                    }
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Configuration {
    #[serde(rename = "term")]
    pub scheme: WeightingScheme,
    pub stem: bool,
    #[serde(rename = "removestop")]
    pub remove_stopwords: bool,
    #[serde(rename = "sim")]
    pub similarity: Similarity,
    #[serde(rename = "termweights")]
    pub weights: TermWeights,
}

impl Configuration {
    fn preprocess(&self) -> Preprocess { Preprocess { remove_stopwords: self.remove_stopwords, stem: self.stem } }
}

pub struct CollectionPaths {
    pub docs: PathBuf,
    pub queries: PathBuf,
    pub rels: PathBuf,
    pub stopwords: Option<PathBuf>,
}

/// Parsed documents, queries and judgments, read-only for the whole sweep.
pub struct Collection {
    pub docs: Vec<Document>,
    pub queries: Vec<Document>,
    pub rels: Judgments,
    pub stopwords: StopwordFilter,
    pub stemmer: Stemmer,
}

impl Collection {
    pub fn load(paths: &CollectionPaths) -> Result<Self> {
        let docs = read_docs_file(&paths.docs)?;
        let queries = read_docs_file(&paths.queries)?;
        let rels = read_rels_file(&paths.rels)?;
        let stopwords = match &paths.stopwords {
            Some(p) => read_stopwords_file(p)?,
            None => StopwordFilter::english(),
        };
        tracing::info!(num_docs = docs.len(), num_queries = queries.len(), judged = rels.len(), stopwords = stopwords.len(), "loaded collection");
        let collection = Self { docs, queries, rels, stopwords, stemmer: Stemmer::english() };
        if collection.judged_queries().next().is_none() {
            bail!("no query in {} has relevance judgments", paths.queries.display());
        }
        Ok(collection)
    }

    /// Queries with a non-empty relevance set.
    pub fn judged_queries(&self) -> impl Iterator<Item = &Document> + '_ {
        self.queries
            .iter()
            .filter(|q| self.rels.get(&q.doc_id).is_some_and(|r| !r.is_empty()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    #[serde(flatten)]
    pub config: Configuration,
    pub queries: usize,
    #[serde(flatten)]
    pub metrics: QueryMetrics,
}

/// Document vectors and preprocessed queries for one configuration.
struct Prepared {
    doc_vectors: Vec<SparseVector>,
    queries: Vec<Document>,
    doc_freqs: DocFreqTable,
}

fn prepare(collection: &Collection, config: &Configuration) -> Prepared {
    let pp = config.preprocess();
    let docs = pp.apply(&collection.docs, &collection.stopwords, &collection.stemmer);
    let queries = pp.apply(&collection.queries, &collection.stopwords, &collection.stemmer);
    let doc_freqs = DocFreqTable::build(&docs);
    let doc_vectors = docs.iter().map(|d| config.scheme.vectorize(d, &doc_freqs, &config.weights)).collect();
    Prepared { doc_vectors, queries, doc_freqs }
}

/// Ranks and evaluates every judged query under one configuration and averages the metrics.
pub fn evaluate_configuration(collection: &Collection, config: &Configuration) -> vsm::Result<ReportRow> {
    let prepared = prepare(collection, config);
    let mut per_query = Vec::new();
    for query in &prepared.queries {
        let Some(relevant) = collection.rels.get(&query.doc_id).filter(|r| !r.is_empty()) else {
            tracing::debug!(query = query.doc_id, "no relevance judgments; skipping");
            continue;
        };
        let qv = config.scheme.vectorize(query, &prepared.doc_freqs, &config.weights);
        let results = vsm::rank(&prepared.doc_vectors, &qv, |q, d| config.similarity.score(q, d));
        per_query.push(evaluate(&results, relevant).map_err(|e| e.for_query(query.doc_id))?);
    }
    let metrics = QueryMetrics::mean(&per_query).ok_or(EvalError::EmptyRelevance { query_id: None })?;
    Ok(ReportRow { config: *config, queries: per_query.len(), metrics })
}

/// Evaluates every configuration in parallel; results keep grid order.
pub fn run_sweep(collection: &Collection, sweep: &SweepConfig) -> Vec<(Configuration, vsm::Result<ReportRow>)> {
    let configs = sweep.configurations();
    tracing::info!(configurations = configs.len(), "starting sweep");
    configs
        .into_par_iter()
        .map(|config| {
            let row = evaluate_configuration(collection, &config);
            match &row {
                Ok(r) => tracing::info!(term = %config.scheme, sim = %config.similarity, stem = config.stem, removestop = config.remove_stopwords, weights = %config.weights, p_mean2 = r.metrics.p_mean2, "configuration done"),
                Err(e) => tracing::warn!(term = %config.scheme, sim = %config.similarity, weights = %config.weights, error = %e, "configuration skipped"),
            }
            (config, row)
        })
        .collect()
}

/// Top `k` scored documents for one query under `config`.
pub fn debug_query(collection: &Collection, config: &Configuration, query_id: u32, k: usize) -> Result<Vec<(DocId, f64)>> {
    let prepared = prepare(collection, config);
    let Some(query) = prepared.queries.iter().find(|q| q.doc_id == query_id) else {
        bail!("query {query_id} not found");
    };
    let qv = config.scheme.vectorize(query, &prepared.doc_freqs, &config.weights);
    let mut scored = vsm::rank_scored(&prepared.doc_vectors, &qv, |q, d| config.similarity.score(q, d));
    scored.truncate(k);
    Ok(scored)
}

pub const TABLE_HEADER: [&str; 5] = ["term", "stem", "removestop", "sim", "termweights"];

pub fn write_table<W: Write>(out: &mut W, rows: &[ReportRow]) -> Result<()> {
    let header: Vec<&str> = TABLE_HEADER.iter().chain(QueryMetrics::HEADER.iter()).copied().collect();
    writeln!(out, "{}", header.join("\t"))?;
    for row in rows {
        let c = &row.config;
        let metrics: Vec<String> = row.metrics.values().iter().map(|v| format!("{v:.4}")).collect();
        writeln!(out, "{}\t{}\t{}\t{}\t{}\t{}", c.scheme, c.stem, c.remove_stopwords, c.similarity, c.weights, metrics.join("\t"))?;
    }
    Ok(())
}

pub fn write_json_lines<W: Write>(out: &mut W, rows: &[ReportRow]) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut *out, row)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_matches_the_reference_sweep() {
        let configs = SweepConfig::default().configurations();
        assert_eq!(configs.len(), 3 * 2 * 2 * 4 * 3);
        assert_eq!(configs[0].scheme, WeightingScheme::Tf);
        assert_eq!(configs[0].similarity, Similarity::Cosine);
        assert_eq!(configs[1].weights.keyword, 4.0);
        assert_eq!(configs.last().map(|c| c.scheme), Some(WeightingScheme::Boolean));
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let sweep: SweepConfig = serde_json::from_str(r#"{"term": ["tfidf"], "sim": ["dice"]}"#).unwrap();
        assert_eq!(sweep.term, vec![WeightingScheme::TfIdf]);
        assert_eq!(sweep.weights.len(), 3);
        assert_eq!(sweep.configurations().len(), 2 * 2 * 3);
    }

    #[test]
    fn table_formats_four_decimals() {
        let row = ReportRow {
            config: SweepConfig::default().configurations()[1],
            queries: 2,
            metrics: QueryMetrics { p_025: 0.5, p_050: 0.25, p_075: 0.125, p_100: 1.0, p_mean1: 1.0 / 3.0, p_mean2: 0.0, r_norm: 0.8125, p_norm: 0.7 },
        };
        let mut out = Vec::new();
        write_table(&mut out, &[row]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("term\tstem\tremovestop\tsim\ttermweights\tp_0.25"));
        assert_eq!(lines[1], "tf\tfalse\tfalse\tcosine\t1,3,4,1\t0.5000\t0.2500\t0.1250\t1.0000\t0.3333\t0.0000\t0.8125\t0.7000");
    }
}
