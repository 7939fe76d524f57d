use anyhow::{bail, Result};
use clap::{ArgAction, Parser, ValueEnum};
use experiment::{debug_query, run_sweep, write_json_lines, write_table, Collection, CollectionPaths, SweepConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use vsm::{Similarity, TermWeights, WeightingScheme};

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "experiment")]
#[command(about = "Sweep term-weighting and similarity configurations and report precision/recall", long_about = None)]
struct Cli {
    /// Corpus file in .I/.T/.A/.K/.W format
    #[arg(long)]
    docs: PathBuf,
    /// Query file in the same format as the corpus
    #[arg(long)]
    queries: PathBuf,
    /// Relevance judgments, one `query_id doc_id` pair per line
    #[arg(long)]
    rels: PathBuf,
    /// Stopword list, one word per line (built-in English list if omitted)
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// JSON sweep definition; the flags below override its axes
    #[arg(long)]
    config: Option<PathBuf>,
    /// Weighting scheme: tf, tfidf, boolean (repeatable)
    #[arg(long = "term")]
    term: Vec<WeightingScheme>,
    /// Similarity: cosine, jaccard, dice, overlap (repeatable)
    #[arg(long = "sim")]
    sim: Vec<Similarity>,
    /// Stemming on/off (repeatable: --stem false --stem true)
    #[arg(long, action = ArgAction::Append, value_parser = clap::value_parser!(bool))]
    stem: Vec<bool>,
    /// Stopword removal on/off (repeatable)
    #[arg(long, action = ArgAction::Append, value_parser = clap::value_parser!(bool))]
    removestop: Vec<bool>,
    /// Field weights as author,title,keyword,abstract (repeatable)
    #[arg(long = "weights")]
    weights: Vec<TermWeights>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// Print the top 10 documents for this query under the first configuration and exit
    #[arg(long)]
    debug_query: Option<u32>,
    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,
}

impl Cli {
    fn sweep(&self) -> Result<SweepConfig> {
        let mut sweep = match &self.config {
            Some(path) => SweepConfig::from_json_file(path)?,
            None => SweepConfig::default(),
        };
        if !self.term.is_empty() { sweep.term = self.term.clone(); }
        if !self.sim.is_empty() { sweep.sim = self.sim.clone(); }
        if !self.stem.is_empty() { sweep.stem = self.stem.clone(); }
        if !self.removestop.is_empty() { sweep.removestop = self.removestop.clone(); }
        if !self.weights.is_empty() { sweep.weights = self.weights.clone(); }
        sweep.validate()?;
        Ok(sweep)
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    if let Some(n) = cli.threads {
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
    }

    let sweep = cli.sweep()?;
    let collection = Collection::load(&CollectionPaths {
        docs: cli.docs.clone(),
        queries: cli.queries.clone(),
        rels: cli.rels.clone(),
        stopwords: cli.stopwords.clone(),
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(qid) = cli.debug_query {
        let Some(config) = sweep.configurations().into_iter().next() else { bail!("empty sweep") };
        let relevant = collection.rels.get(&qid);
        writeln!(out, "query {qid} under {} / {} / {}", config.scheme, config.similarity, config.weights)?;
        for (doc_id, score) in debug_query(&collection, &config, qid, 10)? {
            let mark = if relevant.is_some_and(|r| r.contains(doc_id)) { "*" } else { " " };
            let title = collection.docs.get(doc_id as usize - 1).map(|d| d.title.join(" ")).unwrap_or_default();
            writeln!(out, "{mark} {doc_id:>5}  {score:.4}  {title}")?;
        }
        return Ok(());
    }

    let results = run_sweep(&collection, &sweep);
    let total = results.len();
    let rows: Vec<_> = results.into_iter().filter_map(|(_, row)| row.ok()).collect();
    match cli.format {
        OutputFormat::Table => write_table(&mut out, &rows)?,
        OutputFormat::Json => write_json_lines(&mut out, &rows)?,
    }
    if rows.len() < total {
        tracing::warn!(failed = total - rows.len(), total, "some configurations were skipped");
    }
    Ok(())
}
