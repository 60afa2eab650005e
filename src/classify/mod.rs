//! Line classification.
//!
//! Each trimmed, non-empty line of a text block is mapped to a [`Role`]
//! by a fixed-priority chain of keyword and punctuation heuristics tuned
//! for lecture notes and exercise sheets. Font metadata is not consulted.

mod classifier;
mod rules;

pub use classifier::{ClassifiedLine, LineClassifier, Role};
pub use rules::ClassifierRules;
