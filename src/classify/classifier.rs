//! Priority-ordered line classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ClassifierRules;

/// Semantic role of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Level-1 heading (lab, sheet or assignment title)
    Heading,
    /// Level-2 heading (numbered exercise or question)
    Subheading,
    /// Code or list content, rendered monospace and indented
    CodeOrList,
    /// Regular prose
    Paragraph,
}

impl Role {
    /// All roles, in classification priority order.
    pub const ALL: [Role; 4] = [
        Role::Heading,
        Role::Subheading,
        Role::CodeOrList,
        Role::Paragraph,
    ];

    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Heading => "heading",
            Role::Subheading => "subheading",
            Role::CodeOrList => "code",
            Role::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trimmed line tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedLine {
    /// Trimmed line text
    pub text: String,
    /// Assigned role
    pub role: Role,
}

/// The views of one line every predicate may inspect.
struct LineView<'a> {
    /// Line as split from the (trimmed) block text
    raw: &'a str,
    trimmed: &'a str,
    lower: String,
    first_in_block: bool,
}

type Predicate = fn(&ClassifierRules, &LineView<'_>) -> bool;

/// Evaluated in order; the first matching predicate decides the role.
/// [`Role::Paragraph`] is the fall-through and has no predicate.
const CHAIN: &[(Role, Predicate)] = &[
    (Role::Heading, is_heading),
    (Role::Subheading, is_subheading),
    (Role::CodeOrList, is_code_or_list),
];

fn is_heading(rules: &ClassifierRules, line: &LineView<'_>) -> bool {
    line.trimmed.chars().count() < rules.heading_max_chars
        && rules
            .heading_keywords
            .iter()
            .any(|k| line.lower.contains(k.as_str()))
}

fn is_subheading(rules: &ClassifierRules, line: &LineView<'_>) -> bool {
    rules
        .subheading_prefixes
        .iter()
        .any(|p| line.trimmed.starts_with(p.as_str()))
        || rules
            .subheading_words
            .iter()
            .any(|w| line.lower.starts_with(w.as_str()))
}

fn is_code_or_list(rules: &ClassifierRules, line: &LineView<'_>) -> bool {
    if line.trimmed.chars().any(|c| rules.code_chars.contains(&c)) {
        return true;
    }

    // The first line of a block lost its indentation to block trimming.
    if !line.first_in_block
        && rules
            .code_indents
            .iter()
            .any(|i| line.raw.starts_with(i.as_str()))
    {
        return true;
    }

    rules
        .code_keywords
        .iter()
        .any(|k| line.lower.contains(k.as_str()))
}

/// Pure, total line classifier.
///
/// # Example
///
/// ```
/// use pdf2docx::classify::{LineClassifier, Role};
///
/// let classifier = LineClassifier::default();
/// assert_eq!(classifier.classify("Lab 3", true), Role::Heading);
/// assert_eq!(classifier.classify("01. Compute the average", true), Role::Subheading);
/// assert_eq!(classifier.classify("color_list = [1, 2, 3]", false), Role::CodeOrList);
/// assert_eq!(classifier.classify("This is intro text.", false), Role::Paragraph);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    rules: ClassifierRules,
}

impl LineClassifier {
    /// Create a classifier with the given rules.
    pub fn new(rules: ClassifierRules) -> Self {
        Self { rules }
    }

    /// The rules in use.
    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    /// Classify one line.
    ///
    /// `line` is the line as split from the block text: leading indentation
    /// is kept so the indentation heuristic can see it. Callers filter out
    /// lines that are blank after trimming; a blank line classifies as
    /// [`Role::Paragraph`].
    pub fn classify(&self, line: &str, first_in_block: bool) -> Role {
        let trimmed = line.trim();
        let view = LineView {
            raw: line,
            trimmed,
            lower: trimmed.to_lowercase(),
            first_in_block,
        };

        CHAIN
            .iter()
            .find(|(_, matches)| matches(&self.rules, &view))
            .map(|(role, _)| *role)
            .unwrap_or(Role::Paragraph)
    }

    /// Classify one line and keep its trimmed text.
    pub fn classify_line(&self, line: &str, first_in_block: bool) -> ClassifiedLine {
        ClassifiedLine {
            text: line.trim().to_string(),
            role: self.classify(line, first_in_block),
        }
    }

    /// Classify every non-blank line of a text block.
    ///
    /// The block is trimmed first, so only lines after the first keep their
    /// leading indentation.
    pub fn classify_block(&self, block: &str) -> Vec<ClassifiedLine> {
        block
            .trim()
            .split('\n')
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| self.classify_line(line, i == 0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> Role {
        LineClassifier::default().classify(line, false)
    }

    #[test]
    fn test_heading_keywords() {
        assert_eq!(classify("Lab 3"), Role::Heading);
        assert_eq!(classify("Worksheet for week 2"), Role::Heading);
        assert_eq!(classify("Practical Session"), Role::Heading);
        assert_eq!(classify("Assignment 1: Loops"), Role::Heading);
    }

    #[test]
    fn test_heading_is_case_insensitive() {
        assert_eq!(classify("Lab 3"), classify("LAB 3"));
        assert_eq!(classify("lab 3"), Role::Heading);
    }

    #[test]
    fn test_heading_matches_substrings() {
        // "label" contains "lab"; the heuristic is substring based.
        assert_eq!(classify("Add a label to the chart"), Role::Heading);
    }

    #[test]
    fn test_heading_wins_over_code() {
        assert_eq!(classify("Lab (part 2)"), Role::Heading);
    }

    #[test]
    fn test_long_exercise_line_is_subheading() {
        let line = format!("Exercise {}", "x".repeat(100));
        assert!(line.chars().count() >= 100);
        assert_eq!(classify(&line), Role::Subheading);
    }

    #[test]
    fn test_long_keyword_line_not_heading() {
        let line = format!("This sentence mentions the lab {}", "y".repeat(90));
        assert!(line.chars().count() >= 100);
        assert_eq!(classify(&line), Role::Paragraph);
    }

    #[test]
    fn test_heading_length_counts_chars() {
        // 99 two-byte characters plus "lab" is over the limit in chars.
        let line = format!("lab{}", "é".repeat(97));
        assert_eq!(line.chars().count(), 100);
        assert_ne!(classify(&line), Role::Heading);

        let line = format!("lab{}", "é".repeat(96));
        assert_eq!(classify(&line), Role::Heading);
    }

    #[test]
    fn test_numbered_subheadings() {
        assert_eq!(classify("01. Compute the average"), Role::Subheading);
        assert_eq!(classify("10. Final task"), Role::Subheading);
        assert_eq!(classify("11. Not in the list"), Role::Paragraph);
        assert_eq!(classify("1. Single digit"), Role::Paragraph);
    }

    #[test]
    fn test_question_subheading() {
        assert_eq!(classify("Question 4"), Role::Subheading);
        assert_eq!(classify("QUESTION four"), Role::Subheading);
    }

    #[test]
    fn test_code_characters() {
        assert_eq!(classify("color_list = [1, 2, 3]"), Role::CodeOrList);
        assert_eq!(classify("print(x)"), Role::CodeOrList);
        assert_eq!(classify("say \"hi\""), Role::CodeOrList);
        assert_eq!(classify("x = 5"), Role::CodeOrList);
    }

    #[test]
    fn test_code_keywords() {
        assert_eq!(classify("Sample List of fruits"), Role::CodeOrList);
        assert_eq!(classify("Two lists: a and b"), Role::CodeOrList);
    }

    #[test]
    fn test_indentation_only_after_first_line() {
        let classifier = LineClassifier::default();
        assert_eq!(classifier.classify("    return total", false), Role::CodeOrList);
        assert_eq!(classifier.classify("\treturn total", false), Role::CodeOrList);
        assert_eq!(classifier.classify("    return total", true), Role::Paragraph);
        assert_eq!(classifier.classify("  return total", false), Role::Paragraph);
    }

    #[test]
    fn test_paragraph_fallthrough() {
        assert_eq!(classify("This is intro text."), Role::Paragraph);
        assert_eq!(classify("Plain words only"), Role::Paragraph);
    }

    #[test]
    fn test_custom_rules() {
        let rules = ClassifierRules::new().with_heading_keywords(["chapter"]);
        let classifier = LineClassifier::new(rules);
        assert_eq!(classifier.classify("Chapter 2", true), Role::Heading);
        assert_eq!(classifier.classify("Lab 3", true), Role::Paragraph);
    }

    #[test]
    fn test_classify_line_trims() {
        let line = LineClassifier::default().classify_line("  01. Start  ", false);
        assert_eq!(line.text, "01. Start");
        assert_eq!(line.role, Role::Subheading);
    }

    #[test]
    fn test_classify_block() {
        let lines =
            LineClassifier::default().classify_block("\n    Lab 3\n\n    x := 1\nIntro\n");
        let roles: Vec<Role> = lines.iter().map(|l| l.role).collect();
        assert_eq!(roles, vec![Role::Heading, Role::CodeOrList, Role::Paragraph]);
        assert_eq!(lines[1].text, "x := 1");
        assert!(LineClassifier::default().classify_block(" \n \n").is_empty());
    }
}
