//! String normalization applied before alignment.
//!
//! Three independent transforms, each gated by a [`WordConfig`] flag:
//! case folding, diacritic stripping and vowel grouping. The first two
//! run on whole strings before alignment; vowel grouping applies only
//! to the single context characters stored in learned patterns.
//!
//! [`WordConfig`]: crate::word::WordConfig

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters treated as vowels by the `group_vowels` option.
///
/// Accented vowels are expected to have been stripped to their base
/// forms already; extending the set for languages with other vowel
/// letters is a known limitation.
pub const VOWELS: &str = "aeiouAEIOU";

/// Representative symbol that grouped vowels collapse to.
///
/// Distinct from the `*` context wildcard and from any literal letter.
pub const GROUPED_VOWEL: char = '@';

/// Strip diacritics by NFD-decomposing and dropping combining marks.
///
/// # Example
/// ```
/// use spsim::normalize::strip_diacritics;
///
/// assert_eq!(strip_diacritics("ação"), "acao");
/// assert_eq!(strip_diacritics("café"), "cafe");
/// ```
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Collapse a character to [`GROUPED_VOWEL`] if it is a vowel.
#[inline]
pub fn group_vowel(c: char) -> char {
    if VOWELS.contains(c) {
        GROUPED_VOWEL
    } else {
        c
    }
}

/// Normalize a string for alignment: lowercase and/or strip accents.
pub fn normalize(s: &str, ignore_case: bool, ignore_accents: bool) -> String {
    let s = if ignore_accents {
        strip_diacritics(s)
    } else {
        s.to_string()
    };
    if ignore_case {
        s.to_lowercase()
    } else {
        s
    }
}
