//! Word-level learned spelling similarity.
//!
//! Reference: Gomes, L. & Pereira Lopes, J. G. (2011). "Measuring
//!            Spelling Similarity for Cognate Identification"
//!
//! # Algorithm
//! 1. Normalize both words (case folding, diacritic stripping)
//! 2. Wrap them in `^`/`$` sentinels and align them character by
//!    character ([`align`])
//! 3. Extract each maximal mismatching region as a *difference*: the
//!    two mismatching spans plus one character of context on each side
//! 4. `learn` records differences in a table, generalizing contexts to
//!    wildcards when a second, different context shows up for the same
//!    difference; `score` charges each difference the table does not
//!    recognize and returns `1 − d / max(1, |a|, |b|)`
//!
//! The table only ever grows and contexts only ever generalize, so
//! learning is monotonic and idempotent.
//!
//! [`align`]: crate::align

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use crate::align::{align, Alignment, Column};
use crate::normalize::{group_vowel, normalize};

/// Start-of-word sentinel used for alignment padding.
const START: char = '^';

/// End-of-word sentinel used for alignment padding.
const END: char = '$';

/// Configuration for a [`WordSimilarity`] instance.
///
/// Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordConfig {
    /// Lowercase both words before alignment (default true).
    pub ignore_case: bool,
    /// Strip diacritics before alignment (default true).
    pub ignore_accents: bool,
    /// Collapse vowel context characters to one symbol (default false).
    pub group_vowels: bool,
    /// Forbid differences with an empty side by widening the span to
    /// include the adjacent left context character (default false).
    pub no_empty_differences: bool,
}

impl Default for WordConfig {
    fn default() -> Self {
        Self {
            ignore_case: true,
            ignore_accents: true,
            group_vowels: false,
            no_empty_differences: false,
        }
    }
}

/// A minimal substitution discovered by alignment, e.g. `ph → f`.
///
/// Either side may be empty (pure insertion/deletion) unless
/// `no_empty_differences` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffKey {
    pub source: String,
    pub target: String,
}

impl fmt::Display for DiffKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.source, self.target)
    }
}

/// One side of a learned context: a literal character or the wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSide {
    Literal(char),
    Any,
}

impl ContextSide {
    #[inline]
    fn matches(self, observed: char) -> bool {
        match self {
            ContextSide::Any => true,
            ContextSide::Literal(c) => c == observed,
        }
    }

    /// Generalization is one-way: a literal that sees a different
    /// character becomes `Any` and stays `Any`.
    #[inline]
    fn generalize(self, observed: char) -> Self {
        match self {
            ContextSide::Any => ContextSide::Any,
            ContextSide::Literal(c) if c == observed => self,
            ContextSide::Literal(_) => ContextSide::Any,
        }
    }

    #[inline]
    fn as_char(self) -> char {
        match self {
            ContextSide::Any => '*',
            ContextSide::Literal(c) => c,
        }
    }
}

/// The single-character neighborhoods under which a [`DiffKey`] has
/// been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextPattern {
    pub left: ContextSide,
    pub right: ContextSide,
}

impl ContextPattern {
    fn literal(context: (char, char)) -> Self {
        Self {
            left: ContextSide::Literal(context.0),
            right: ContextSide::Literal(context.1),
        }
    }

    /// True if this learned pattern admits the observed context.
    pub fn matches(&self, context: (char, char)) -> bool {
        self.left.matches(context.0) && self.right.matches(context.1)
    }

    fn generalize(&self, context: (char, char)) -> Self {
        Self {
            left: self.left.generalize(context.0),
            right: self.right.generalize(context.1),
        }
    }
}

impl fmt::Display for ContextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.left.as_char(), self.right.as_char())
    }
}

/// One mismatching region extracted from an alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Column length of the region in the alignment (context excluded).
    /// This is the region's contribution to the distance when the
    /// difference is not recognized.
    pub chars: usize,
    pub key: DiffKey,
    /// Observed (left, right) context characters, vowel-grouped when
    /// the instance is configured to do so.
    pub context: (char, char),
}

/// One table update, as reported to the `learn_traced` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnEvent<'a> {
    /// Normalized source word of the example being learned.
    pub source: &'a str,
    /// Normalized target word of the example being learned.
    pub target: &'a str,
    pub key: &'a DiffKey,
    /// Pattern previously stored for this key, if any.
    pub prior: Option<ContextPattern>,
    /// Pattern stored after this observation.
    pub learned: ContextPattern,
}

/// Learned spelling similarity between words.
///
/// # Example
/// ```
/// use spsim::WordSimilarity;
///
/// let mut sim = WordSimilarity::default();
/// sim.learn([("alpha", "alfa")]);
/// let table = sim.diff_table();
/// assert_eq!(table.get("ph\tf").map(String::as_str), Some("la"));
/// ```
pub struct WordSimilarity {
    config: WordConfig,
    diffs: HashMap<DiffKey, ContextPattern>,
}

impl Default for WordSimilarity {
    fn default() -> Self {
        Self::new(WordConfig::default())
    }
}

impl WordSimilarity {
    pub fn new(config: WordConfig) -> Self {
        Self {
            config,
            diffs: HashMap::new(),
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

    pub fn config(&self) -> &WordConfig {
        &self.config
    }

    /// Number of learned differences.
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Learn spelling differences from example pairs of equivalent
    /// words.
    pub fn learn<I, S>(&mut self, examples: I)
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        self.learn_traced(examples, |_| {});
    }

    /// Learn, invoking `trace` once per observed difference.
    ///
    /// The callback is diagnostic only; its effects are not consumed
    /// internally.
    pub fn learn_traced<I, S, F>(&mut self, examples: I, mut trace: F)
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
        F: FnMut(LearnEvent<'_>),
    {
        for (a, b) in examples {
            let na = self.normalize(a.as_ref());
            let nb = self.normalize(b.as_ref());
            for diff in self.extract_differences(&na, &nb) {
                let prior = self.diffs.get(&diff.key).copied();
                let learned = match prior {
                    Some(pattern) => pattern.generalize(diff.context),
                    None => ContextPattern::literal(diff.context),
                };
                self.diffs.insert(diff.key.clone(), learned);
                debug!(key = %diff.key, pattern = %learned, "learned spelling difference");
                trace(LearnEvent {
                    source: &na,
                    target: &nb,
                    key: &diff.key,
                    prior,
                    learned,
                });
            }
        }
    }

    /// Similarity of two words in `[0, 1]`.
    ///
    /// `1.0` means every spelling difference between the words is a
    /// learned, context-admissible replacement (identical words
    /// trivially score `1.0`).
    pub fn score(&self, a: &str, b: &str) -> f64 {
        self.score_with_diffs(a, b, None, None)
    }

    /// Like [`score`](Self::score), also collecting the recognized
    /// differences into `known` and the unrecognized ones into
    /// `unknown`, when provided.
    pub fn score_with_diffs(
        &self,
        a: &str,
        b: &str,
        mut known: Option<&mut Vec<Difference>>,
        mut unknown: Option<&mut Vec<Difference>>,
    ) -> f64 {
        let na = self.normalize(a);
        let nb = self.normalize(b);
        let len_a = na.chars().count();
        let len_b = nb.chars().count();

        let mut distance = 0usize;
        for diff in self.extract_differences(&na, &nb) {
            let recognized = self
                .diffs
                .get(&diff.key)
                .is_some_and(|pattern| pattern.matches(diff.context));
            if recognized {
                if let Some(out) = known.as_mut() {
                    out.push(diff);
                }
            } else {
                distance += diff.chars;
                if let Some(out) = unknown.as_mut() {
                    out.push(diff);
                }
            }
        }

        let denominator = len_a.max(len_b).max(1) as f64;
        (1.0 - distance as f64 / denominator).clamp(0.0, 1.0)
    }

    /// Read access to the learned table, keyed `"source\ttarget"` with
    /// the two context characters (`*` = wildcard) as value.
    pub fn diff_table(&self) -> BTreeMap<String, String> {
        self.diffs
            .iter()
            .map(|(key, pattern)| (key.to_string(), pattern.to_string()))
            .collect()
    }

    fn normalize(&self, s: &str) -> String {
        normalize(s, self.config.ignore_case, self.config.ignore_accents)
    }

    /// Pad, align and scan for maximal mismatching regions.
    fn extract_differences(&self, a: &str, b: &str) -> Vec<Difference> {
        // One extra sentinel on each side keeps a fresh context
        // character available when an empty-sided span gets widened.
        let width = if self.config.no_empty_differences { 2 } else { 1 };
        let pa = Self::pad(a, width);
        let pb = Self::pad(b, width);
        let alignment = align(&pa, &pb);
        let columns = &alignment.columns;

        let mut differences = Vec::new();
        let mut i = 0;
        while i < columns.len() {
            if !Alignment::is_mismatch(&columns[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < columns.len() && Alignment::is_mismatch(&columns[i]) {
                i += 1;
            }
            let chars = i - start;
            let mut source: String = columns[start..i].iter().filter_map(|c| c.0).collect();
            let mut target: String = columns[start..i].iter().filter_map(|c| c.1).collect();

            let mut left_boundary = start;
            if self.config.no_empty_differences && (source.is_empty() || target.is_empty()) {
                // Pull the nearest left source character into the span
                // (left preference); in the common case that is the
                // adjacent match column, so both spans gain the same
                // character.
                if let Some((index, absorbed)) = source_char_before(columns, start) {
                    source.insert(0, absorbed);
                    target.insert(0, absorbed);
                    left_boundary = index;
                }
            }

            // Context comes from the source side with gap columns
            // skipped. A run can touch either end of the alignment
            // when the input itself contains sentinel characters;
            // those runs take the sentinels as context.
            let mut left = source_char_before(columns, left_boundary).map_or(START, |(_, c)| c);
            let mut right = source_char_from(columns, i).unwrap_or(END);
            if self.config.group_vowels {
                left = group_vowel(left);
                right = group_vowel(right);
            }

            differences.push(Difference {
                chars,
                key: DiffKey { source, target },
                context: (left, right),
            });
        }
        differences
    }

    fn pad(s: &str, width: usize) -> Vec<char> {
        let mut padded = Vec::with_capacity(s.len() + 2 * width);
        padded.extend(std::iter::repeat(START).take(width));
        padded.extend(s.chars());
        padded.extend(std::iter::repeat(END).take(width));
        padded
    }
}

/// Nearest source-side character strictly before `index`, skipping gap
/// columns, together with its column index.
fn source_char_before(columns: &[Column], index: usize) -> Option<(usize, char)> {
    columns[..index]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, col)| col.0.map(|c| (i, c)))
}

/// Nearest source-side character at or after `index`, skipping gap
/// columns.
fn source_char_from(columns: &[Column], index: usize) -> Option<char> {
    columns[index..].iter().find_map(|col| col.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal() {
        let sim = WordSimilarity::default();
        assert_eq!(sim.score("", ""), 1.0);
        assert_eq!(sim.score("abc", "abc"), 1.0);
    }

    #[test]
    fn test_unrelated() {
        let sim = WordSimilarity::default();
        assert_eq!(sim.score("abc", ""), 0.0);
        assert_eq!(sim.score("", "abc"), 0.0);
        assert_eq!(sim.score("abc", "def"), 0.0);
    }

    #[test]
    fn test_learning_ph() {
        let mut sim = WordSimilarity::default();
        assert_eq!(sim.score("telephone", "telefone"), 1.0 - 2.0 / 9.0);
        sim.learn([("telephone", "telefone")]);
        assert_eq!(sim.score("telephone", "telefone"), 1.0);

        // constructor with examples gives the same table
        let other =
            WordSimilarity::with_examples(WordConfig::default(), [("telephone", "telefone")]);
        assert_eq!(sim.diff_table(), other.diff_table());

        // has learned "ph -> f" between 'e' and 'o', not at word start
        assert_eq!(sim.score("phase", "fase"), 1.0 - 2.0 / 5.0);
        sim.learn([("phase", "fase")]);
        assert_eq!(sim.score("phase", "fase"), 1.0);
        assert_eq!(sim.score("Daphnias", "Dafnias"), 1.0);
    }

    #[test]
    fn test_context_generalization() {
        let mut sim = WordSimilarity::default();

        sim.learn([("alpha", "alfa")]);
        assert_eq!(sim.diff_table().get("ph\tf").unwrap(), "la");

        sim.learn([("phase", "fase")]);
        assert_eq!(sim.diff_table().get("ph\tf").unwrap(), "*a");

        sim.learn([("photo", "foto")]);
        assert_eq!(sim.diff_table().get("ph\tf").unwrap(), "**");

        assert_eq!(sim.score("phenomenal", "fenomenal"), 1.0);
    }

    #[test]
    fn test_learning_is_monotonic_and_idempotent() {
        let mut sim = WordSimilarity::default();
        sim.learn([("alpha", "alfa"), ("phase", "fase"), ("photo", "foto")]);
        let table = sim.diff_table();
        assert_eq!(table.get("ph\tf").unwrap(), "**");

        // a fully generalized pattern stays fully generalized, and
        // re-learning changes nothing
        sim.learn([("alpha", "alfa"), ("graph", "grafo")]);
        assert_eq!(sim.diff_table().get("ph\tf").unwrap(), "**");

        let mut twice = WordSimilarity::default();
        twice.learn([("alpha", "alfa"), ("alpha", "alfa")]);
        let mut once = WordSimilarity::default();
        once.learn([("alpha", "alfa")]);
        assert_eq!(twice.diff_table(), once.diff_table());
    }

    #[test]
    fn test_case_sensitivity_toggle() {
        let config = WordConfig {
            ignore_case: false,
            ..WordConfig::default()
        };
        let mut sim = WordSimilarity::new(config);
        sim.learn([("telephone", "telefone")]);
        // lowercase rule does not cover the uppercase spelling
        assert_eq!(sim.score("TELEPHONE", "TELEFONE"), 1.0 - 2.0 / 9.0);
        sim.learn([("TELEPHONE", "TELEFONE")]);
        assert_eq!(sim.score("TELEPHONE", "TELEFONE"), 1.0);
    }

    #[test]
    fn test_accents() {
        let sim = WordSimilarity::default();
        assert_eq!(sim.score("ação", "acao"), 1.0);

        let config = WordConfig {
            ignore_accents: false,
            ..WordConfig::default()
        };
        let strict = WordSimilarity::new(config);
        assert!(strict.score("ação", "acao") < 1.0);
    }

    #[test]
    fn test_group_vowels() {
        let config = WordConfig {
            group_vowels: true,
            ..WordConfig::default()
        };
        let mut sim = WordSimilarity::new(config);
        sim.learn([("alpha", "alfa")]);
        // right context 'a' was stored as a grouped vowel, so 'o'
        // qualifies too
        assert_eq!(sim.score("alpho", "alfo"), 1.0);
        // the left context 'l' stays literal
        assert_eq!(sim.score("aspha", "asfa"), 1.0 - 2.0 / 5.0);
    }

    #[test]
    fn test_no_empty_differences() {
        let config = WordConfig {
            no_empty_differences: true,
            ..WordConfig::default()
        };
        let mut sim = WordSimilarity::new(config);
        sim.learn([("pangea", "pangeia")]);
        let table = sim.diff_table();
        // the bare insertion "" -> "i" widened to "e" -> "ei"
        assert_eq!(table.get("e\tei").unwrap(), "ga");
        assert!(!table.contains_key("\ti"));
        assert_eq!(sim.score("pangea", "pangeia"), 1.0);

        // no learned key has an empty side
        for key in table.keys() {
            let (source, target) = key.split_once('\t').unwrap();
            assert!(!source.is_empty());
            assert!(!target.is_empty());
        }
    }

    #[test]
    fn test_known_unknown_lists() {
        let mut sim = WordSimilarity::default();
        let mut known = Vec::new();
        let mut unknown = Vec::new();
        sim.score_with_diffs(
            "telephone",
            "telefone",
            Some(&mut known),
            Some(&mut unknown),
        );
        assert!(known.is_empty());
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].chars, 2);
        assert_eq!(unknown[0].key.source, "ph");
        assert_eq!(unknown[0].key.target, "f");
        assert_eq!(unknown[0].context, ('e', 'o'));

        sim.learn([("telephone", "telefone")]);
        known.clear();
        unknown.clear();
        sim.score_with_diffs(
            "telephone",
            "telefone",
            Some(&mut known),
            Some(&mut unknown),
        );
        assert_eq!(known.len(), 1);
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_trace_callback() {
        let mut sim = WordSimilarity::default();
        let mut events = Vec::new();
        sim.learn_traced([("alpha", "alfa")], |event| {
            events.push((
                event.key.to_string(),
                event.prior,
                event.learned.to_string(),
            ));
        });
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "ph\tf");
        assert!(events[0].1.is_none());
        assert_eq!(events[0].2, "la");

        events.clear();
        sim.learn_traced([("phase", "fase")], |event| {
            events.push((
                event.key.to_string(),
                event.prior,
                event.learned.to_string(),
            ));
        });
        assert_eq!(events.len(), 1);
        assert!(events[0].1.is_some());
        assert_eq!(events[0].2, "*a");
    }

    #[test]
    fn test_sentinel_characters_in_input() {
        // inputs may legitimately contain the padding characters; a
        // mismatch run may then touch the alignment boundary
        let mut sim = WordSimilarity::default();
        assert_eq!(sim.score("^", ""), 0.0);
        assert_eq!(sim.score("x^", ""), 0.0);
        assert_eq!(sim.score("", "$y"), 0.0);
        assert_eq!(sim.score("a$", "a$"), 1.0);
        sim.learn([("x^", ""), ("a$b", "ab")]);
    }

    #[test]
    fn test_widened_context_skips_gap_columns() {
        let config = WordConfig {
            no_empty_differences: true,
            ..WordConfig::default()
        };
        let mut sim = WordSimilarity::new(config);
        sim.learn([("bea", "bxeia")]);
        let table = sim.diff_table();
        // the re-taken left context of "e -> ei" is the nearest source
        // character 'b' two columns over, not a word-start sentinel:
        // the adjacent column belongs to the "b -> bx" run and has a
        // gap on the source side
        assert_eq!(table.get("e\tei").unwrap(), "ba");
        assert_eq!(table.get("b\tbx").unwrap(), "^e");
    }

    #[test]
    fn test_score_is_clamped() {
        let sim = WordSimilarity::default();
        // reordered strings can accumulate more mismatch columns than
        // max(|a|, |b|); the clamp keeps the score at 0 instead of
        // letting it go negative
        assert!(sim.score("ab", "ba") >= 0.0);
        assert!(sim.score("abcd", "dcba") >= 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn score_is_reflexive(word in "[a-z]{0,12}") {
                let sim = WordSimilarity::default();
                prop_assert_eq!(sim.score(&word, &word), 1.0);
            }

            #[test]
            fn score_stays_in_range(a in "[a-z]{0,10}", b in "[a-z]{0,10}") {
                let sim = WordSimilarity::default();
                let score = sim.score(&a, &b);
                prop_assert!((0.0..=1.0).contains(&score));
            }

            #[test]
            fn learning_is_idempotent(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
                let mut once = WordSimilarity::default();
                once.learn([(&a, &b)]);
                let mut twice = WordSimilarity::default();
                twice.learn([(&a, &b), (&a, &b)]);
                prop_assert_eq!(once.diff_table(), twice.diff_table());
            }
        }
    }
}
