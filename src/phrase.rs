//! Phrase-level similarity via optimal word assignment.
//!
//! A phrase is an ordered sequence of one or more words. Two phrases
//! are compared by matching their words one-to-one so that the sum of
//! word-level distances is minimal (the assignment problem), with the
//! shorter phrase padded by empty placeholders.
//!
//! # Algorithm
//! 1. `cost(wᵢ, wⱼ) = (1 − WordSimilarity.score(wᵢ, wⱼ)) × max(|wᵢ|, |wⱼ|)`,
//!    0 for equal words, `|w|` against a placeholder
//! 2. Solve the minimum-cost assignment ([`assignment`]) to get `D`
//! 3. Score = `1 − D/L` with `L` the length of the longest phrase in
//!    characters (whitespace excluded); `D` is clamped to `L` first,
//!    since compound words on one side can otherwise push the summed
//!    partial costs past the phrase length
//!
//! A single word against a multi-word phrase is additionally tried as a
//! compound: the multi-word side is concatenated in every order and the
//! best word-level score wins when the assignment cannot do better.
//!
//! [`assignment`]: crate::assignment

use std::collections::HashMap;

use itertools::Itertools;
use parking_lot::Mutex;
use tracing::trace;

use crate::assignment::minimum_cost_assignment;
use crate::error::{Result, SpsimError};
use crate::word::{LearnEvent, WordConfig, WordSimilarity};

/// A phrase input: raw text (split on whitespace) or a pre-tokenized
/// word sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phrase {
    Text(String),
    Tokens(Vec<String>),
}

impl Phrase {
    /// Resolve to a validated token sequence.
    ///
    /// Text splits on whitespace and cannot fail; explicit token
    /// sequences are rejected if a token is empty or contains
    /// whitespace.
    fn into_tokens(self) -> Result<Vec<String>> {
        match self {
            Phrase::Text(text) => Ok(text.split_whitespace().map(String::from).collect()),
            Phrase::Tokens(tokens) => {
                for token in &tokens {
                    if token.is_empty() || token.chars().any(char::is_whitespace) {
                        return Err(SpsimError::InvalidPhrase(format!(
                            "token {token:?} is empty or contains whitespace"
                        )));
                    }
                }
                Ok(tokens)
            }
        }
    }
}

impl From<&str> for Phrase {
    fn from(s: &str) -> Self {
        Phrase::Text(s.to_string())
    }
}

impl From<String> for Phrase {
    fn from(s: String) -> Self {
        Phrase::Text(s)
    }
}

impl From<Vec<String>> for Phrase {
    fn from(tokens: Vec<String>) -> Self {
        Phrase::Tokens(tokens)
    }
}

impl From<Vec<&str>> for Phrase {
    fn from(tokens: Vec<&str>) -> Self {
        Phrase::Tokens(tokens.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Phrase {
    fn from(tokens: &[&str]) -> Self {
        Phrase::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }
}

/// Learned spelling similarity between phrases.
///
/// Wraps one [`WordSimilarity`] and caches word-pair distances; the
/// cache is cleared on every `learn` since learning changes word-level
/// scores.
///
/// # Example
/// ```
/// use spsim::PhraseSimilarity;
///
/// let mut sim = PhraseSimilarity::default();
/// sim.learn([("photo", "foto"), ("alpha", "alfa"), ("pangea", "pangeia")]);
/// assert_eq!(sim.score("phenomenal idea", "ideia fenomenal").unwrap(), 1.0);
/// ```
pub struct PhraseSimilarity {
    word: WordSimilarity,
    cache: Mutex<HashMap<(String, String), f64>>,
}

impl Default for PhraseSimilarity {
    fn default() -> Self {
        Self::new(WordConfig::default())
    }
}

impl PhraseSimilarity {
    pub fn new(config: WordConfig) -> Self {
        Self {
            word: WordSimilarity::new(config),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Construct and immediately learn an initial batch of examples.
    pub fn with_examples<I, S>(config: WordConfig, examples: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut sim = Self::new(config);
        sim.learn(examples);
        sim
    }

    /// The underlying word-level scorer (for diff-table inspection).
    pub fn word(&self) -> &WordSimilarity {
        &self.word
    }

    /// Learn spelling differences from example pairs.
    ///
    /// Invalidates the distance cache.
    pub fn learn<I, S>(&mut self, examples: I)
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        self.word.learn(examples);
        self.cache.lock().clear();
    }

    /// Learn with a per-difference trace callback.
    pub fn learn_traced<I, S, F>(&mut self, examples: I, trace: F)
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
        F: FnMut(LearnEvent<'_>),
    {
        self.word.learn_traced(examples, trace);
        self.cache.lock().clear();
    }

    /// Similarity of two phrases in `[0, 1]`.
    ///
    /// Fails with [`SpsimError::InvalidPhrase`] if an explicit token
    /// sequence contains an empty or whitespace-bearing token.
    pub fn score(&self, a: impl Into<Phrase>, b: impl Into<Phrase>) -> Result<f64> {
        let a = a.into().into_tokens()?;
        let b = b.into().into_tokens()?;

        // identical sequences, including empty vs empty
        if a == b {
            return Ok(1.0);
        }
        if a.is_empty() || b.is_empty() {
            return Ok(0.0);
        }
        if a.len() == 1 && b.len() == 1 {
            return Ok(self.word.score(&a[0], &b[0]));
        }
        if a.len() == 1 || b.len() == 1 {
            // single word vs multi-word: try the multi side as a
            // compound before falling back to the assignment
            let best = if a.len() == 1 {
                self.best_compound_score(&a[0], &b, true)
            } else {
                self.best_compound_score(&b[0], &a, false)
            };
            if best >= 1.0 {
                return Ok(best);
            }
            return Ok(best.max(self.assignment_score(&a, &b)));
        }
        Ok(self.assignment_score(&a, &b))
    }

    /// Best word-level score of `single` against every concatenation
    /// order of `words`.
    ///
    /// Factorial in the number of words; phrases are expected to be
    /// short.
    fn best_compound_score(&self, single: &str, words: &[String], single_is_left: bool) -> f64 {
        words
            .iter()
            .permutations(words.len())
            .map(|permutation| {
                let compound: String = permutation.into_iter().map(String::as_str).collect();
                if single_is_left {
                    self.word.score(single, &compound)
                } else {
                    self.word.score(&compound, single)
                }
            })
            .fold(0.0, f64::max)
    }

    /// General multi-word score: minimum-cost one-to-one word
    /// assignment, normalized by the longest phrase length.
    fn assignment_score(&self, a: &[String], b: &[String]) -> f64 {
        let char_len = |words: &[String]| -> usize {
            words.iter().map(|w| w.chars().count()).sum()
        };
        // longest phrase in characters, separators excluded; both
        // sides are non-empty here so this is at least 1
        let longest = char_len(a).max(char_len(b)) as f64;

        let n = a.len().max(b.len());
        let mut rows = a.to_vec();
        let mut cols = b.to_vec();
        rows.resize(n, String::new());
        cols.resize(n, String::new());

        let costs: Vec<Vec<f64>> = rows
            .iter()
            .map(|p| cols.iter().map(|q| self.word_distance(p, q)).collect())
            .collect();
        let (total, _) = minimum_cost_assignment(&costs);

        // a compound word on one side can cost more than the phrase is
        // long; cap the distance at the phrase length
        let distance = total.min(longest);
        trace!(distance, longest, "phrase assignment solved");
        1.0 - distance / longest
    }

    /// Word-pair distance `(1 − score) × max(|a|, |b|)`, cached.
    ///
    /// Equal words and placeholder comparisons are obvious cases and
    /// skip the cache.
    fn word_distance(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 0.0;
        }
        if a.is_empty() {
            return b.chars().count() as f64;
        }
        if b.is_empty() {
            return a.chars().count() as f64;
        }

        let key = (a.to_string(), b.to_string());
        if let Some(&cached) = self.cache.lock().get(&key) {
            return cached;
        }
        let max_len = a.chars().count().max(b.chars().count()) as f64;
        let distance = (1.0 - self.word.score(a, b)) * max_len;
        self.cache.lock().insert(key, distance);
        distance
    }
}
