//! Per-record transforms that read more than one column: CPU extraction and
//! the brand/model cross-fixups.

use super::rules::{collapse_whitespace, BrandRules, CpuRules};
use crate::constants::NA;
use crate::types::Listing;

/// Split every listing's CPU descriptor into `(brand, model)`.
pub fn extract_cpu(listings: Vec<Listing>, rules: &CpuRules) -> Vec<Listing> {
    listings
        .into_iter()
        .map(|mut listing| {
            let descriptor = rules.rewrite.apply(&listing.source.cpu);
            listing.cpu = rules.extractor.extract(&descriptor);
            listing
        })
        .collect()
}

/// Cross-fix brand and model of one listing.
///
/// Brand aliases are canonicalised, a missing brand is inferred from the
/// model's leading word, and a model that repeats the brand loses it. A model
/// that ends up empty becomes `NA`.
pub fn fix_brand_model(listing: &Listing, rules: &BrandRules) -> Listing {
    let mut brand = rules.aliases.apply(&listing.brand);
    let mut model = rules.aliases.apply(&listing.model);

    if brand.is_empty() || brand == NA {
        brand = rules
            .keywords
            .first_match(&model)
            .cloned()
            .unwrap_or_else(|| NA.to_string());
    }

    if brand != NA {
        if let Some(rest) = strip_leading_word(&model, &brand) {
            model = collapse_whitespace(rest);
        }
    }
    if model.is_empty() {
        model = NA.to_string();
    }

    Listing {
        brand,
        model,
        ..listing.clone()
    }
}

/// `value` without a leading `word` token, or `None` if it does not start with one.
fn strip_leading_word<'a>(value: &'a str, word: &str) -> Option<&'a str> {
    let rest = value.strip_prefix(word)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

pub fn fix_brands_and_models(listings: Vec<Listing>, rules: &BrandRules) -> Vec<Listing> {
    listings
        .iter()
        .map(|listing| fix_brand_model(listing, rules))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::rules::RuleSet;
    use crate::types::{Compound, RawFields};

    fn listing(brand: &str, model: &str) -> Listing {
        let mut listing = Listing::from_source(RawFields::default());
        listing.brand = brand.to_string();
        listing.model = model.to_string();
        listing
    }

    #[test]
    fn test_alias_and_leading_brand() {
        let rules = RuleSet::builtin().unwrap();
        let fixed = fix_brand_model(&listing("hewlett packard", "hp pavilion 15"), &rules.brand);
        assert_eq!(fixed.brand, "hp");
        assert_eq!(fixed.model, "pavilion 15");
    }

    #[test]
    fn test_brand_inferred_from_model() {
        let rules = RuleSet::builtin().unwrap();
        let fixed = fix_brand_model(&listing(NA, "thinkpad x1 carbon"), &rules.brand);
        assert_eq!(fixed.brand, "lenovo");
        assert_eq!(fixed.model, "thinkpad x1 carbon");

        let unknown = fix_brand_model(&listing(NA, "gizmo 3000"), &rules.brand);
        assert_eq!(unknown.brand, NA);
        assert_eq!(unknown.model, "gizmo 3000");
    }

    #[test]
    fn test_model_that_is_only_the_brand_becomes_na() {
        let rules = RuleSet::builtin().unwrap();
        let fixed = fix_brand_model(&listing("dell", "dell"), &rules.brand);
        assert_eq!(fixed.model, NA);
    }

    #[test]
    fn test_brand_prefix_must_be_a_whole_word() {
        let rules = RuleSet::builtin().unwrap();
        let fixed = fix_brand_model(&listing("lg", "lgram 17"), &rules.brand);
        assert_eq!(fixed.model, "lgram 17");
    }

    #[test]
    fn test_input_record_is_left_untouched() {
        let rules = RuleSet::builtin().unwrap();
        let original = listing("hewlett packard", "hp envy");
        let _ = fix_brand_model(&original, &rules.brand);
        assert_eq!(original.brand, "hewlett packard");
    }

    #[test]
    fn test_extract_cpu_stage() {
        let rules = RuleSet::builtin().unwrap();
        let mut row = Listing::from_source(RawFields::default());
        row.source.cpu = "intel core i7-10750h cpu".to_string();
        let mut unknown = row.clone();
        unknown.source.cpu = "unknown".to_string();

        let rows = extract_cpu(vec![row, unknown], &rules.cpu);
        assert_eq!(rows[0].cpu, Compound::new("intel", "core i7 10750h"));
        assert_eq!(rows[1].cpu, Compound::na());
    }
}
