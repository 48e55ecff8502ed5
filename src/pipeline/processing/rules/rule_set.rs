use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::vocabulary::{Color, Feature, OperatingSystem, Vocabulary};
use super::{KeywordSet, RewriteTable, RuleTable};
use crate::error::{CleanerError, Result};
use crate::pipeline::processing::extract::{CompoundExtractor, UnmatchedPolicy};

/// Built-in rule tables, shipped as data alongside the crate.
pub const DEFAULT_RULES: &str = include_str!("../../../../config/rules.toml");

#[derive(Debug, Deserialize)]
struct LabelRule<L> {
    pattern: String,
    label: L,
}

#[derive(Debug, Deserialize)]
struct RewriteRule {
    pattern: String,
    #[serde(default)]
    replace: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    color: Vec<LabelRule<Color>>,
    os: Vec<LabelRule<OperatingSystem>>,
    feature: Vec<LabelRule<Feature>>,
    gpu: GpuRuleFile,
    cpu: CpuRuleFile,
    brand: BrandRuleFile,
}

#[derive(Debug, Deserialize)]
struct GpuRuleFile {
    #[serde(default)]
    rewrite: Vec<RewriteRule>,
    integrated: Vec<String>,
    dedicated: Vec<String>,
    #[serde(default)]
    qualifiers: Vec<String>,
    patterns: Vec<String>,
    #[serde(default = "sentinel_policy")]
    unmatched: UnmatchedPolicy,
}

#[derive(Debug, Deserialize)]
struct CpuRuleFile {
    #[serde(default)]
    rewrite: Vec<RewriteRule>,
    patterns: Vec<String>,
    #[serde(default)]
    brand_keywords: Vec<LabelRule<String>>,
    #[serde(default = "keep_raw_policy")]
    unmatched: UnmatchedPolicy,
}

#[derive(Debug, Deserialize)]
struct BrandRuleFile {
    #[serde(default)]
    aliases: Vec<RewriteRule>,
    #[serde(default)]
    keywords: Vec<LabelRule<String>>,
}

fn sentinel_policy() -> UnmatchedPolicy {
    UnmatchedPolicy::Sentinel
}

fn keep_raw_policy() -> UnmatchedPolicy {
    UnmatchedPolicy::KeepRaw
}

/// Rules for reconciling and splitting the two graphics columns.
#[derive(Debug, Clone)]
pub struct GpuRules {
    /// Canonicalises vendor synonyms before anything else looks at the descriptor
    pub rewrite: RewriteTable,
    pub integrated: KeywordSet,
    pub dedicated: KeywordSet,
    /// Removes class words once the class has been derived
    pub qualifiers: RewriteTable,
    pub extractor: CompoundExtractor,
}

#[derive(Debug, Clone)]
pub struct CpuRules {
    pub rewrite: RewriteTable,
    pub extractor: CompoundExtractor,
}

#[derive(Debug, Clone)]
pub struct BrandRules {
    pub aliases: RewriteTable,
    /// Leading-word patterns of the model column that identify a brand
    pub keywords: RuleTable<String>,
}

/// Every compiled table the pipeline consults.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub color: RuleTable<Color>,
    pub os: RuleTable<OperatingSystem>,
    pub feature: RuleTable<Feature>,
    pub gpu: GpuRules,
    pub cpu: CpuRules,
    pub brand: BrandRules,
}

impl RuleSet {
    /// Compile the built-in tables.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(DEFAULT_RULES)
    }

    /// Compile a rule file; it replaces the built-in tables wholesale.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CleanerError::Config(format!("Failed to read rule file '{}': {}", path.display(), e))
        })?;
        let rules = Self::from_toml(&content)?;
        info!(path = %path.display(), "Loaded rule tables");
        Ok(rules)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(content)?;
        let rules = Self::compile(file)?;
        debug!(
            color = rules.color.len(),
            os = rules.os.len(),
            feature = rules.feature.len(),
            gpu_patterns = rules.gpu.extractor.len(),
            cpu_patterns = rules.cpu.extractor.len(),
            "Compiled rule tables"
        );
        Ok(rules)
    }

    fn compile(file: RuleFile) -> Result<Self> {
        let cpu_brand_keywords =
            RuleTable::compile("cpu.brand_keywords", file.cpu.brand_keywords.into_iter().map(|r| (r.pattern, r.label)))?;

        Ok(Self {
            color: labelled_table("color", file.color)?,
            os: labelled_table("os", file.os)?,
            feature: labelled_table("feature", file.feature)?,
            gpu: GpuRules {
                rewrite: rewrite_table("gpu.rewrite", file.gpu.rewrite)?,
                integrated: KeywordSet::compile("gpu.integrated", &file.gpu.integrated)?,
                dedicated: KeywordSet::compile("gpu.dedicated", &file.gpu.dedicated)?,
                qualifiers: RewriteTable::compile(
                    "gpu.qualifiers",
                    file.gpu.qualifiers.iter().map(|pattern| (pattern.as_str(), " ")),
                )?,
                extractor: CompoundExtractor::new("gpu", &file.gpu.patterns, None, file.gpu.unmatched)?,
            },
            cpu: CpuRules {
                rewrite: rewrite_table("cpu.rewrite", file.cpu.rewrite)?,
                extractor: CompoundExtractor::new(
                    "cpu",
                    &file.cpu.patterns,
                    Some(cpu_brand_keywords),
                    file.cpu.unmatched,
                )?,
            },
            brand: BrandRules {
                aliases: rewrite_table("brand.aliases", file.brand.aliases)?,
                keywords: RuleTable::compile(
                    "brand.keywords",
                    file.brand.keywords.into_iter().map(|r| (r.pattern, r.label)),
                )?,
            },
        })
    }
}

fn labelled_table<L: Vocabulary>(name: &str, rules: Vec<LabelRule<L>>) -> Result<RuleTable<L>> {
    if let Some(rule) = rules.iter().find(|rule| rule.label.is_na()) {
        return Err(CleanerError::Config(format!(
            "Rule table '{}' maps pattern {:?} to the reserved NA label",
            name, rule.pattern
        )));
    }
    RuleTable::compile(name, rules.into_iter().map(|r| (r.pattern, r.label)))
}

fn rewrite_table(name: &str, rules: Vec<RewriteRule>) -> Result<RewriteTable> {
    RewriteTable::compile(name, rules.into_iter().map(|r| (r.pattern, r.replace)))
}
