//! Loaders for SMART-style tagged corpora, relevance judgments and stopword lists.

use crate::document::{DocId, Document, Field};
use crate::metrics::RelevanceSet;
use crate::tokenizer::{tokenize, StopwordFilter};
use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Relevance judgments keyed by query id.
pub type Judgments = BTreeMap<u32, RelevanceSet>;

fn field_for_tag(tag: char) -> Option<Field> {
    match tag {
        'A' => Some(Field::Author),
        'T' => Some(Field::Title),
        'K' => Some(Field::Keyword),
        'W' => Some(Field::Abstract),
        _ => None,
    }
}

/// Parses `.I` records. Documents are numbered 1..n in file order; `.A`, `.T`, `.K` and `.W`
/// sections are tokenized into their fields, every other section is skipped.
pub fn read_docs(reader: impl BufRead) -> Result<Vec<Document>> {
    let mut docs: Vec<Document> = Vec::new();
    let mut current: Option<Field> = None;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.starts_with(".I") {
            docs.push(Document::new(docs.len() as DocId + 1));
            current = None;
        } else if let Some(tag) = section_tag(line) {
            current = field_for_tag(tag);
        } else if !line.is_empty() {
            if let (Some(doc), Some(field)) = (docs.last_mut(), current) {
                doc.field_mut(field).extend(tokenize(line));
            }
        }
    }
    tracing::debug!(num_docs = docs.len(), "parsed corpus");
    Ok(docs)
}

fn section_tag(line: &str) -> Option<char> {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some('.'), Some(c)) if c.is_alphanumeric() || c == '_' => Some(c),
        _ => None,
    }
}

/// Parses `query_id doc_id` lines; extra columns are ignored.
pub fn read_rels(reader: impl BufRead) -> Result<Judgments> {
    let mut rels = Judgments::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let (qid, doc) = match (parts.next(), parts.next()) {
            (None, _) => continue,
            (Some(q), Some(d)) => (q, d),
            (Some(_), None) => bail!("line {}: expected 'query_id doc_id', got '{}'", lineno + 1, line.trim()),
        };
        let qid: u32 = qid.parse().with_context(|| format!("line {}: bad query id '{qid}'", lineno + 1))?;
        let doc: DocId = doc.parse().with_context(|| format!("line {}: bad document id '{doc}'", lineno + 1))?;
        rels.entry(qid).or_default().insert(doc);
    }
    Ok(rels)
}

/// One stopword per line.
pub fn read_stopwords(reader: impl BufRead) -> Result<StopwordFilter> {
    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let w = line.trim();
        if !w.is_empty() {
            words.push(w.to_string());
        }
    }
    Ok(StopwordFilter::new(words))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let f = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(f))
}

pub fn read_docs_file<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    read_docs(open(path)?).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn read_rels_file<P: AsRef<Path>>(path: P) -> Result<Judgments> {
    let path = path.as_ref();
    read_rels(open(path)?).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn read_stopwords_file<P: AsRef<Path>>(path: P) -> Result<StopwordFilter> {
    let path = path.as_ref();
    read_stopwords(open(path)?).with_context(|| format!("failed to parse {}", path.display()))
}
