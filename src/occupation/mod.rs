//! Occupation catalog and free-text matcher.
//!
//! The catalog is defined in `catalog.toml` and compiled in with
//! `include_str!`, so lookups never touch the filesystem. Searching scores
//! every entry against the query's tokens and ranks the hits.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The built-in catalog, parsed on first use
static CATALOG: Lazy<OccupationCatalog> = Lazy::new(|| {
    OccupationCatalog::from_toml(include_str!("catalog.toml"))
        .expect("catalog.toml must be valid TOML")
});

/// Tokens shorter than this are ignored
const MIN_TOKEN_LETTERS: usize = 3;

const TITLE_WORD: u32 = 5;
const TITLE_PLURAL: u32 = 4;
const EXAMPLE_WORD: u32 = 4;
const EXAMPLE_PLURAL: u32 = 3;
const SUBSTRING: u32 = 2;
const DESCRIPTION_WORD: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMeta {
    pub version: String,
    pub description: String,
}

/// One classification entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupation {
    /// SOC code, `NN-NNNN.NN`
    pub code: String,
    pub title: String,
    pub description: String,
    /// Comma-separated job titles people commonly use for this occupation
    #[serde(default)]
    pub examples: Option<String>,
}

/// A scored search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupationMatch<'a> {
    pub occupation: &'a Occupation,
    /// Sum of every token's score
    pub score: u32,
    /// Number of query tokens that scored at all
    pub matched_tokens: u32,
}

impl OccupationMatch<'_> {
    /// Ordering key: score weighted by how many tokens contributed
    pub fn rank(&self) -> u32 {
        self.score * self.matched_tokens
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupationCatalog {
    pub meta: CatalogMeta,
    #[serde(rename = "occupation", default)]
    pub occupations: Vec<Occupation>,
}

/// Precompiled patterns for one query token
struct TokenPattern {
    token: String,
    word: Regex,
    plural: Regex,
}

impl TokenPattern {
    fn new(token: String) -> Option<Self> {
        let escaped = regex::escape(&token);
        let word = Regex::new(&format!(r"\b{}\b", escaped)).ok()?;
        let plural = Regex::new(&format!(r"\b{}s\b", escaped)).ok()?;
        Some(Self {
            token,
            word,
            plural,
        })
    }

    fn score(&self, title: &str, examples: Option<&str>, description: &str) -> u32 {
        let count = |re: &Regex, text: &str| re.find_iter(text).count() as u32;

        let mut score =
            TITLE_WORD * count(&self.word, title) + TITLE_PLURAL * count(&self.plural, title);
        if let Some(examples) = examples {
            score += EXAMPLE_WORD * count(&self.word, examples)
                + EXAMPLE_PLURAL * count(&self.plural, examples);
        }
        if title.contains(&self.token) || examples.is_some_and(|e| e.contains(&self.token)) {
            score += SUBSTRING;
        }
        if description.contains(&self.token) {
            score += DESCRIPTION_WORD * count(&self.word, description);
        }
        score
    }
}

impl OccupationCatalog {
    /// The embedded catalog
    pub fn load() -> &'static OccupationCatalog {
        &CATALOG
    }

    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn len(&self) -> usize {
        self.occupations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupations.is_empty()
    }

    /// Look up an entry by SOC code
    pub fn get(&self, code: &str) -> Option<&Occupation> {
        self.occupations.iter().find(|o| o.code == code)
    }

    /// Rank entries against a free-text query.
    ///
    /// Entries that score zero are left out. Equal ranks keep catalog order.
    pub fn search(&self, query: &str) -> Vec<OccupationMatch<'_>> {
        let patterns: Vec<TokenPattern> = tokenize(query)
            .into_iter()
            .filter_map(TokenPattern::new)
            .collect();
        if patterns.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<OccupationMatch<'_>> = self
            .occupations
            .iter()
            .filter_map(|occupation| {
                let title = occupation.title.to_lowercase();
                let examples = occupation.examples.as_deref().map(str::to_lowercase);
                let description = occupation.description.to_lowercase();

                let (score, matched_tokens) =
                    patterns.iter().fold((0, 0), |(score, matched), pattern| {
                        match pattern.score(&title, examples.as_deref(), &description) {
                            0 => (score, matched),
                            s => (score + s, matched + 1),
                        }
                    });

                (score > 0).then_some(OccupationMatch {
                    occupation,
                    score,
                    matched_tokens,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.rank().cmp(&a.rank()));
        tracing::debug!(query, hits = matches.len(), "Occupation search");
        matches
    }
}

/// Lowercased, deduplicated tokens with at least [`MIN_TOKEN_LETTERS`] letters
fn tokenize(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| {
            token.chars().filter(|c| c.is_alphabetic()).count() >= MIN_TOKEN_LETTERS
        })
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
