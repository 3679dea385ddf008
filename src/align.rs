//! Global character alignment (LCS-style).
//!
//! Reference: Needleman, S. & Wunsch, C. (1970). "A general method
//!            applicable to the search for similarities in the amino
//!            acid sequence of two proteins"
//!
//! # Time Complexity
//! O(m × n) table fill plus O(m + n) traceback
//!
//! # Space Complexity
//! O(m × n) (the full table is kept for traceback)
//!
//! Scoring is match = 1, mismatch = 0, gap = 0 (plain LCS). The
//! traceback prefers diagonal steps - including mismatch substitutions
//! when they are optimal - then a gap in the second string, then a gap
//! in the first. This makes the alignment deterministic and keeps
//! mismatching regions compact: two fully unrelated strings align
//! column against column instead of deletion-block against
//! insertion-block, which the difference extraction in [`word`] relies
//! on.
//!
//! [`word`]: crate::word

/// One column of an alignment: a character from each string, or `None`
/// where that string has a gap.
pub type Column = (Option<char>, Option<char>);

/// An aligned pair of strings as a sequence of columns.
///
/// Transient: produced for a single learn/score call and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub columns: Vec<Column>,
}

impl Alignment {
    /// True if the column pairs a character against a different
    /// character or against a gap.
    #[inline]
    pub fn is_mismatch(col: &Column) -> bool {
        col.0 != col.1
    }
}

/// Align two character sequences.
///
/// # Example
/// ```
/// use spsim::align::align;
///
/// let a: Vec<char> = "alpha".chars().collect();
/// let b: Vec<char> = "alfa".chars().collect();
/// let alignment = align(&a, &b);
/// // a:  a l p h a
/// // b:  a l _ f a
/// assert_eq!(alignment.columns.len(), 5);
/// ```
pub fn align(a: &[char], b: &[char]) -> Alignment {
    let m = a.len();
    let n = b.len();

    // LCS table: dp[i][j] = LCS length of a[..i] and b[..j]
    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            let eq = usize::from(a[i - 1] == b[j - 1]);
            dp[i][j] = (dp[i - 1][j - 1] + eq)
                .max(dp[i - 1][j])
                .max(dp[i][j - 1]);
        }
    }

    // Traceback, diagonal first.
    let mut columns: Vec<Column> = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        let eq = usize::from(a[i - 1] == b[j - 1]);
        if dp[i][j] == dp[i - 1][j - 1] + eq {
            columns.push((Some(a[i - 1]), Some(b[j - 1])));
            i -= 1;
            j -= 1;
        } else if dp[i][j] == dp[i - 1][j] {
            columns.push((Some(a[i - 1]), None));
            i -= 1;
        } else {
            columns.push((None, Some(b[j - 1])));
            j -= 1;
        }
    }
    while i > 0 {
        columns.push((Some(a[i - 1]), None));
        i -= 1;
    }
    while j > 0 {
        columns.push((None, Some(b[j - 1])));
        j -= 1;
    }
    columns.reverse();

    Alignment { columns }
}
