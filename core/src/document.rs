use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based, dense within a corpus.
pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Author,
    Title,
    Keyword,
    Abstract,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Author, Field::Title, Field::Keyword, Field::Abstract];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Author => "author",
            Field::Title => "title",
            Field::Keyword => "keyword",
            Field::Abstract => "abstract",
        };
        f.write_str(s)
    }
}

/// A parsed document or query. Tokens are already normalized; nothing here re-tokenizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: DocId,
    pub author: Vec<String>,
    pub title: Vec<String>,
    pub keyword: Vec<String>,
    pub abstract_: Vec<String>,
}

impl Document {
    pub fn new(doc_id: DocId) -> Self { Self { doc_id, ..Self::default() } }

    pub fn field(&self, field: Field) -> &[String] {
        match field {
            Field::Author => &self.author,
            Field::Title => &self.title,
            Field::Keyword => &self.keyword,
            Field::Abstract => &self.abstract_,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut Vec<String> {
        match field {
            Field::Author => &mut self.author,
            Field::Title => &mut self.title,
            Field::Keyword => &mut self.keyword,
            Field::Abstract => &mut self.abstract_,
        }
    }

    /// Every (field, token) pair in author, title, keyword, abstract order.
    pub fn tokens(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL
            .into_iter()
            .flat_map(move |f| self.field(f).iter().map(move |t| (f, t.as_str())))
    }
}

/// Per-field multipliers used by the weighted term-frequency schemes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermWeights {
    pub author: f64,
    pub title: f64,
    pub keyword: f64,
    #[serde(rename = "abstract")]
    pub abstract_: f64,
}

impl TermWeights {
    pub const UNIFORM: TermWeights = TermWeights { author: 1.0, title: 1.0, keyword: 1.0, abstract_: 1.0 };

    pub fn new(author: f64, title: f64, keyword: f64, abstract_: f64) -> Result<Self> {
        let w = Self { author, title, keyword, abstract_ };
        w.validate()?;
        Ok(w)
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Author => self.author,
            Field::Title => self.title,
            Field::Keyword => self.keyword,
            Field::Abstract => self.abstract_,
        }
    }

    /// Rejects negative, infinite or NaN multipliers.
    pub fn validate(&self) -> Result<()> {
        for field in Field::ALL {
            let value = self.get(field);
            if value < 0.0 || !value.is_finite() {
                return Err(EvalError::InvalidWeight { field, value });
            }
        }
        Ok(())
    }
}

impl Default for TermWeights {
    fn default() -> Self { Self::UNIFORM }
}

impl fmt::Display for TermWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.author, self.title, self.keyword, self.abstract_)
    }
}

impl std::str::FromStr for TermWeights {
    type Err = String;

    /// Parses `author,title,keyword,abstract`, e.g. `1,3,4,1`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>().map_err(|e| format!("invalid weight '{p}': {e}")))
            .collect::<std::result::Result<_, _>>()?;
        match parts[..] {
            [a, t, k, w] => TermWeights::new(a, t, k, w).map_err(|e| e.to_string()),
            _ => Err(format!("expected 4 comma-separated weights, got {}", parts.len())),
        }
    }
}
