use pretty_assertions::assert_eq;
use vsm::corpus::{read_docs, read_rels};
use vsm::metrics::{norm_precision, norm_recall, precision_at, rank_of_relevant};
use vsm::{evaluate, rank, rank_scored, DocFreqTable, RelevanceSet, Similarity, SparseVector, TermWeights, WeightingScheme};

fn v(pairs: &[(&str, f64)]) -> SparseVector { pairs.iter().copied().collect() }

#[test]
fn cosine_ranks_exact_match_first_and_keeps_ties_in_order() {
    let docs = vec![v(&[("a", 1.0), ("b", 1.0)]), v(&[("a", 1.0)]), v(&[("b", 1.0)])];
    let query = v(&[("a", 1.0), ("b", 1.0)]);
    let scored = rank_scored(&docs, &query, |q, d| Similarity::Cosine.score(q, d));
    assert_eq!(scored.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!((scored[0].1 - 1.0).abs() < 1e-12);
    assert!((scored[1].1 - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    assert!((scored[2].1 - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
}

#[test]
fn rank_based_metrics_for_known_ranking() {
    let results = vec![3, 2, 7, 5, 1, 4, 6, 8, 9, 10];
    let relevant = RelevanceSet::new([2, 5]);
    assert_eq!(rank_of_relevant(&results, &relevant).unwrap(), vec![2, 4]);

    let r_norm = norm_recall(&results, &relevant).unwrap();
    assert!((r_norm - 0.8125).abs() < 1e-12);

    let expected = 1.0 - 4f64.ln() / (10.0 * 10f64.ln() - 8.0 * 8f64.ln() - 2.0 * 2f64.ln());
    assert!((norm_precision(&results, &relevant).unwrap() - expected).abs() < 1e-12);
    assert_eq!(precision_at(1.0, &results, &relevant).unwrap(), 0.5);
}

const CORPUS: &str = "\
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
";

const QUERIES: &str = "\
.I 1
.W
sorting tapes
.I 2
.W
matrix elimination
";

#[test]
fn end_to_end_over_a_tiny_collection() {
    let docs = read_docs(CORPUS.as_bytes()).unwrap();
    let queries = read_docs(QUERIES.as_bytes()).unwrap();
    let rels = read_rels("1 1\n1 3\n2 2\n".as_bytes()).unwrap();

    let df = DocFreqTable::build(&docs);
    assert_eq!(df.get("sorting"), 2);

    for scheme in WeightingScheme::ALL {
        let doc_vectors: Vec<SparseVector> = docs.iter().map(|d| scheme.vectorize(d, &df, &TermWeights::UNIFORM)).collect();
        for sim in Similarity::ALL {
            let q1 = scheme.vectorize(&queries[0], &df, &TermWeights::UNIFORM);
            let results = rank(&doc_vectors, &q1, |q, d| sim.score(q, d));
            assert_eq!(results.len(), docs.len());
            assert_eq!(results[0], 1, "{scheme}/{sim}");

            let m = evaluate(&results, &rels[&1]).unwrap();
            assert_eq!(m.p_100, 1.0, "{scheme}/{sim}");
            assert_eq!(m.r_norm, 1.0, "{scheme}/{sim}");

            let q2 = scheme.vectorize(&queries[1], &df, &TermWeights::UNIFORM);
            let results = rank(&doc_vectors, &q2, |q, d| sim.score(q, d));
            assert_eq!(results[0], 2, "{scheme}/{sim}");
        }
    }
}

#[test]
fn field_weights_change_the_ranking() {
    let docs = read_docs(CORPUS.as_bytes()).unwrap();
    let df = DocFreqTable::build(&docs);
    let query = read_docs(".I 1\n.W\nsorting\n".as_bytes()).unwrap().remove(0);

    let keyword_heavy = TermWeights::new(1.0, 1.0, 10.0, 1.0).unwrap();
    let doc_vectors: Vec<SparseVector> = docs.iter().map(|d| WeightingScheme::Tf.vectorize(d, &df, &keyword_heavy)).collect();
    let q = WeightingScheme::Tf.vectorize(&query, &df, &keyword_heavy);
    let results = rank(&doc_vectors, &q, |q, d| Similarity::Overlap.score(q, d));
    // doc 3 carries "sorting" in title and keyword; doc 1 in title and abstract
    assert_eq!(&results[..2], &[3, 1]);
}
