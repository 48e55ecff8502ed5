//! Ordered rule tables and the classifiers built on them.
//!
//! A [`RuleTable`] is a sequence of `(pattern, label)` pairs. Lookup walks the
//! table in definition order and the first pattern found anywhere in the value
//! wins, so the order of entries is part of the table's meaning.

pub mod rule_set;
pub mod vocabulary;

use regex::Regex;
use std::collections::BTreeSet;

use crate::constants::NA;
use crate::error::{CleanerError, Result};

pub use rule_set::{BrandRules, CpuRules, GpuRules, RuleSet};
pub use vocabulary::{Color, Feature, GraphicsClass, OperatingSystem, Vocabulary};

/// Compile a pattern, naming the table it belongs to on failure.
pub(crate) fn compile_pattern(table: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| CleanerError::InvalidPattern {
        table: table.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct Rule<L> {
    pub pattern: Regex,
    pub label: L,
}

/// Ordered `(pattern, label)` table. Immutable once compiled.
#[derive(Debug, Clone)]
pub struct RuleTable<L> {
    name: String,
    rules: Vec<Rule<L>>,
}

impl<L> RuleTable<L> {
    pub fn compile<I, S>(name: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, L)>,
        S: AsRef<str>,
    {
        let rules = entries
            .into_iter()
            .map(|(pattern, label)| {
                Ok(Rule {
                    pattern: compile_pattern(name, pattern.as_ref())?,
                    label,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Label of the first rule whose pattern occurs in `value`.
    pub fn first_match(&self, value: &str) -> Option<&L> {
        if value.is_empty() || value == NA {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(value))
            .map(|rule| &rule.label)
    }
}

impl<L: Vocabulary> RuleTable<L> {
    /// Total: unmatched input, including the empty string, yields the sentinel.
    pub fn classify(&self, value: &str) -> L {
        self.first_match(value).copied().unwrap_or(L::NA)
    }
}

/// Free-function form of [`RuleTable::classify`].
pub fn classify<L: Vocabulary>(value: &str, table: &RuleTable<L>) -> L {
    table.classify(value)
}

/// Split on any delimiter, trim, and drop empty tokens.
pub fn split_tokens<'a>(raw: &'a str, delimiters: &[char]) -> Vec<&'a str> {
    raw.split(|c: char| delimiters.contains(&c))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Classify every token of a delimited list independently; duplicates collapse.
pub fn split_and_classify<L: Vocabulary>(
    raw: &str,
    delimiters: &[char],
    table: &RuleTable<L>,
) -> BTreeSet<L> {
    split_tokens(raw, delimiters)
        .into_iter()
        .map(|token| table.classify(token))
        .collect()
}

/// Ordered regex substitutions, each applied to the output of the previous one.
#[derive(Debug, Clone)]
pub struct RewriteTable {
    name: String,
    rules: Vec<(Regex, String)>,
}

impl RewriteTable {
    pub fn compile<I, S, R>(name: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, R)>,
        S: AsRef<str>,
        R: Into<String>,
    {
        let rules = entries
            .into_iter()
            .map(|(pattern, replacement)| Ok((compile_pattern(name, pattern.as_ref())?, replacement.into())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every substitution in order and collapse the resulting whitespace.
    pub fn apply(&self, value: &str) -> String {
        let rewritten = self
            .rules
            .iter()
            .fold(value.to_string(), |acc, (pattern, replacement)| {
                pattern.replace_all(&acc, replacement.as_str()).into_owned()
            });
        collapse_whitespace(&rewritten)
    }
}

/// Unordered set of indicator patterns; matches if any pattern occurs.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    name: String,
    patterns: Vec<Regex>,
}

impl KeywordSet {
    pub fn compile<I, S>(name: &str, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| compile_pattern(name, pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, value: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(value))
    }
}

pub(crate) fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
