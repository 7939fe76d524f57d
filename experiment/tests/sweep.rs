use experiment::{debug_query, evaluate_configuration, run_sweep, write_json_lines, Collection, CollectionPaths, SweepConfig};
use std::fs;
use tempfile::tempdir;
use vsm::{Similarity, TermWeights, WeightingScheme};

const DOCS: &str = "\
.I 1
.T
Sorting algorithms on tapes
.W
External sorting with magnetic tapes.
.I 2
.T
Matrix inversion
.W
Inverting a matrix by elimination.
.I 3
.T
Merge sorting
.K
sorting, merging
.I 4
.T
Compiler construction
.W
Parsing and code generation.
.I 5
.T
The analysis of hashing
.W
Hash tables and collisions.
";

const QUERIES: &str = "\
.I 1
.W
sorting of tapes
.I 2
.W
the inversion of a matrix
.I 3
.W
unjudged query about compilers
";

const RELS: &str = "01 1 0 0\n01 3 0 0\n02 2 0 0\n";

fn build_tiny_collection(dir: &std::path::Path) -> CollectionPaths {
    fs::write(dir.join("docs.raw"), DOCS).unwrap();
    fs::write(dir.join("query.raw"), QUERIES).unwrap();
    fs::write(dir.join("query.rels"), RELS).unwrap();
    fs::write(dir.join("common_words"), "the\nof\na\non\nwith\nby\n").unwrap();
    CollectionPaths {
        docs: dir.join("docs.raw"),
        queries: dir.join("query.raw"),
        rels: dir.join("query.rels"),
        stopwords: Some(dir.join("common_words")),
    }
}

#[test]
fn full_sweep_evaluates_every_configuration() {
    let dir = tempdir().unwrap();
    let collection = Collection::load(&build_tiny_collection(dir.path())).unwrap();
    assert_eq!(collection.judged_queries().count(), 2);

    let sweep = SweepConfig::default();
    let results = run_sweep(&collection, &sweep);
    assert_eq!(results.len(), sweep.configurations().len());
    for ((config, row), expected) in results.iter().zip(sweep.configurations()) {
        assert_eq!(*config, expected);
        let row = row.as_ref().unwrap();
        assert_eq!(row.queries, 2);
        for v in row.metrics.values() {
            assert!(v.is_finite() && (0.0..=1.0 + 1e-12).contains(&v), "{config:?}: {v}");
        }
    }
}

#[test]
fn relevant_documents_rank_first_for_easy_queries() {
    let dir = tempdir().unwrap();
    let collection = Collection::load(&build_tiny_collection(dir.path())).unwrap();
    let config = SweepConfig {
        term: vec![WeightingScheme::TfIdf],
        stem: vec![true],
        removestop: vec![true],
        sim: vec![Similarity::Cosine],
        weights: vec![TermWeights::UNIFORM],
    }
    .configurations()[0];

    let row = evaluate_configuration(&collection, &config).unwrap();
    assert_eq!(row.metrics.p_100, 1.0);
    assert_eq!(row.metrics.r_norm, 1.0);
    assert!((row.metrics.p_norm - 1.0).abs() < 1e-12);

    let top = debug_query(&collection, &config, 2, 3).unwrap();
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].0, 2);
    assert!(debug_query(&collection, &config, 99, 3).is_err());
}

#[test]
fn json_rows_carry_configuration_and_metrics() {
    let dir = tempdir().unwrap();
    let collection = Collection::load(&build_tiny_collection(dir.path())).unwrap();
    let config = SweepConfig::default().configurations()[0];
    let row = evaluate_configuration(&collection, &config).unwrap();

    let mut out = Vec::new();
    write_json_lines(&mut out, &[row]).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["term"], "tf");
    assert_eq!(json["sim"], "cosine");
    assert_eq!(json["termweights"]["abstract"], 1.0);
    assert_eq!(json["queries"], 2);
    assert!(json["p_mean2"].is_number());
}

#[test]
fn config_file_is_validated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sweep.json");
    fs::write(&path, r#"{"weights": [{"author": 1, "title": -1, "keyword": 1, "abstract": 1}]}"#).unwrap();
    assert!(SweepConfig::from_json_file(&path).is_err());

    fs::write(&path, r#"{"term": ["boolean"], "sim": []}"#).unwrap();
    assert!(SweepConfig::from_json_file(&path).is_err());

    fs::write(&path, r#"{"term": ["boolean"], "stem": [false]}"#).unwrap();
    assert_eq!(SweepConfig::from_json_file(&path).unwrap().configurations().len(), 2 * 4 * 3);
}

#[test]
fn collection_without_judgments_is_rejected() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_collection(dir.path());
    fs::write(&paths.rels, "").unwrap();
    assert!(Collection::load(&paths).is_err());
}
