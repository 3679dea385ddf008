//! SpSim - Learned spelling similarity for cognate identification
//!
//! SpSim scores the spelling similarity of two words (or two phrases)
//! after *learning* which spelling differences are admissible between a
//! pair of related languages. Key design principles:
//!
//! - **Alignment-based**: differences are minimal mismatching spans found
//!   by a longest-common-subsequence alignment, not raw edit counts
//! - **Contextual learning**: each difference carries one character of
//!   context on each side; contexts generalize to wildcards as more
//!   examples are seen, never the other way around
//! - **In-process model**: the learned table lives inside the scorer
//!   instance, nothing is persisted
//!
//! # Example
//!
//! ```
//! use spsim::WordSimilarity;
//!
//! let mut sim = WordSimilarity::default();
//! assert_eq!(sim.score("phase", "fase"), 0.6);
//!
//! sim.learn([("alpha", "alfa"), ("phase", "fase"), ("photo", "foto")]);
//! assert_eq!(sim.score("phenomenal", "fenomenal"), 1.0);
//! ```

pub mod align;
pub mod assignment;
pub mod error;
pub mod normalize;
pub mod phrase;
pub mod word;

pub use error::{Result, SpsimError};
pub use phrase::{Phrase, PhraseSimilarity};
pub use word::{
    ContextPattern, ContextSide, DiffKey, Difference, LearnEvent, WordConfig, WordSimilarity,
};
