use crate::document::{Document, Field};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::Algorithm;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}][\p{L}\p{N}_']*").expect("valid regex");
    static ref DEFAULT_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// NFKC-normalize, lowercase and split a line of text into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

/// A pure token-sequence transform applied to documents and queries before vectorization.
pub trait TokenFilter {
    fn apply(&self, tokens: &[String]) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    words: HashSet<String>,
}

impl StopwordFilter {
    pub fn new(words: impl IntoIterator<Item = String>) -> Self { Self { words: words.into_iter().collect() } }

    /// Built-in English list.
    pub fn english() -> Self { Self::new(DEFAULT_STOPWORDS.iter().map(|w| w.to_string())) }

    pub fn is_stopword(&self, token: &str) -> bool { self.words.contains(token) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

impl TokenFilter for StopwordFilter {
    fn apply(&self, tokens: &[String]) -> Vec<String> {
        tokens.iter().filter(|t| !self.is_stopword(t)).cloned().collect()
    }
}

/// Snowball English stemmer.
pub struct Stemmer {
    inner: rust_stemmers::Stemmer,
}

impl Stemmer {
    pub fn english() -> Self { Self { inner: rust_stemmers::Stemmer::create(Algorithm::English) } }

    pub fn stem(&self, token: &str) -> String { self.inner.stem(token).into_owned() }
}

impl Default for Stemmer {
    fn default() -> Self { Self::english() }
}

impl std::fmt::Debug for Stemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str("Stemmer(english)") }
}

impl TokenFilter for Stemmer {
    fn apply(&self, tokens: &[String]) -> Vec<String> { tokens.iter().map(|t| self.stem(t)).collect() }
}

impl Document {
    /// Copy of this document with every field passed through `filter`.
    pub fn map_tokens(&self, filter: &(impl TokenFilter + ?Sized)) -> Document {
        let mut out = Document::new(self.doc_id);
        for field in Field::ALL {
            *out.field_mut(field) = filter.apply(self.field(field));
        }
        out
    }
}

/// Stopword removal then stemming, each optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Preprocess {
    pub remove_stopwords: bool,
    pub stem: bool,
}

impl Preprocess {
    pub fn apply(&self, docs: &[Document], stopwords: &StopwordFilter, stemmer: &Stemmer) -> Vec<Document> {
        docs.iter()
            .map(|doc| {
                let doc = if self.remove_stopwords { doc.map_tokens(stopwords) } else { doc.clone() };
                if self.stem { doc.map_tokens(stemmer) } else { doc }
            })
            .collect()
    }
}
