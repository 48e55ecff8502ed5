//! Brand/model decomposition of free-text component descriptors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::rules::{compile_pattern, RuleTable};
use crate::constants::NA;
use crate::error::{CleanerError, Result};
use crate::types::Compound;

static MODEL_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-_/,()]+").unwrap());

/// What an extractor returns when none of its patterns match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// `(raw, "NA")`: unmapped vendor text still carries information
    KeepRaw,
    /// `("NA", "NA")`
    Sentinel,
}

/// Ordered capture patterns with optional `brand` and `model` groups.
#[derive(Debug, Clone)]
pub struct CompoundExtractor {
    name: String,
    patterns: Vec<Regex>,
    brand_keywords: Option<RuleTable<String>>,
    unmatched: UnmatchedPolicy,
}

impl CompoundExtractor {
    pub fn new<S: AsRef<str>>(
        name: &str,
        patterns: &[S],
        brand_keywords: Option<RuleTable<String>>,
        unmatched: UnmatchedPolicy,
    ) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let regex = compile_pattern(name, pattern.as_ref())?;
                let has_group = regex
                    .capture_names()
                    .flatten()
                    .any(|group| group == "brand" || group == "model");
                if !has_group {
                    return Err(CleanerError::Config(format!(
                        "Pattern {:?} in '{}' captures neither a brand nor a model group",
                        pattern.as_ref(),
                        name
                    )));
                }
                Ok(regex)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            patterns,
            brand_keywords,
            unmatched,
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

    /// Split `raw` into `(brand, model)` using the first pattern that matches.
    ///
    /// A match that captured no brand falls back to the brand keyword table; a
    /// match that captured no model yields a model of `"NA"`.
    pub fn extract(&self, raw: &str) -> Compound {
        let raw = raw.trim();
        if raw.is_empty() || raw == NA {
            return Compound::na();
        }

        for pattern in &self.patterns {
            let Some(captures) = pattern.captures(raw) else {
                continue;
            };

            let brand = captures
                .name("brand")
                .map(|m| m.as_str().trim())
                .filter(|brand| !brand.is_empty());
            let model = captures
                .name("model")
                .map(|m| normalize_model(m.as_str()))
                .filter(|model| !model.is_empty());

            // Optional groups can let a pattern match an empty span
            if brand.is_none() && model.is_none() {
                continue;
            }

            let brand = match brand {
                Some(brand) => brand.to_string(),
                None => self.infer_brand(raw).unwrap_or_else(|| NA.to_string()),
            };

            return Compound {
                brand,
                model: model.unwrap_or_else(|| NA.to_string()),
            };
        }

        match self.unmatched {
            UnmatchedPolicy::KeepRaw => Compound::new(raw, NA),
            UnmatchedPolicy::Sentinel => Compound::na(),
        }
    }

    fn infer_brand(&self, raw: &str) -> Option<String> {
        self.brand_keywords
            .as_ref()
            .and_then(|keywords| keywords.first_match(raw))
            .cloned()
    }
}

/// Lower-case, turn internal delimiters into spaces and collapse whitespace.
pub fn normalize_model(model: &str) -> String {
    MODEL_DELIMITERS
        .replace_all(&model.to_lowercase(), " ")
        .trim()
        .to_string()
}
