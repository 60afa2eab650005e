//! Classifier rule sets.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Keyword and character sets driving [`LineClassifier`](super::LineClassifier).
///
/// Matching lowercases the line, never the rules, so keywords are expected
/// in lowercase. Fields omitted from a JSON rules file keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    /// Substrings that mark a short line as a heading.
    pub heading_keywords: Vec<String>,

    /// Lines with this many characters or more are never headings.
    pub heading_max_chars: usize,

    /// Ordinal prefixes that mark a sub-heading (e.g. "01.").
    pub subheading_prefixes: Vec<String>,

    /// Leading words that mark a sub-heading.
    pub subheading_words: Vec<String>,

    /// Characters that mark code or list content.
    pub code_chars: Vec<char>,

    /// Leading indentation markers that mark code content.
    pub code_indents: Vec<String>,

    /// Substrings that mark code or list content.
    pub code_keywords: Vec<String>,
}

impl ClassifierRules {
    /// Create the default rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse rules from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load rules from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize rules as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace the heading keywords.
    pub fn with_heading_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.heading_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the sub-heading words.
    pub fn with_subheading_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subheading_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the code keywords.
    pub fn with_code_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.code_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            heading_keywords: to_strings(&["lab", "sheet", "exercise", "practical", "assignment"]),
            heading_max_chars: 100,
            subheading_prefixes: (1..=10).map(|n| format!("{:02}.", n)).collect(),
            subheading_words: to_strings(&["exercise", "question"]),
            code_chars: vec!['[', ']', '=', '(', ')', '"'],
            code_indents: to_strings(&["    ", "\t"]),
            code_keywords: to_strings(&["color_list", "sample list", "lists:"]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
