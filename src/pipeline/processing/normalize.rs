//! Text clean-up for categorical columns and unit conversion for numeric ones.

use once_cell::sync::Lazy;
use regex::Regex;

use super::rules::RuleSet;
use crate::constants::{CPU_SPEED_MHZ_THRESHOLD, HARDDISK_BIN_EDGES, HARDDISK_TB_THRESHOLD, NA};
use crate::types::Listing;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-+]?\d*\.?\d+").unwrap());

/// Case-fold and trim; missing text becomes `"NA"`.
pub fn clean_text(value: &str) -> String {
    let cleaned = value.trim().to_lowercase();
    if cleaned.is_empty() {
        NA.to_string()
    } else {
        cleaned
    }
}

/// First number in `value` with thousands separators removed; `0.0` when there is none.
pub fn clean_num(value: &str) -> f64 {
    let without_commas = value.replace(',', "");
    NUMBER
        .find(&without_commas)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Small capacities are terabytes.
pub fn tb_to_gb(value: f64) -> f64 {
    if value <= HARDDISK_TB_THRESHOLD {
        value * 1024.0
    } else {
        value
    }
}

/// Large clock speeds are megahertz; the result has one decimal.
pub fn mhz_to_ghz(value: f64) -> f64 {
    if value > CPU_SPEED_MHZ_THRESHOLD {
        round1(value / 1000.0)
    } else {
        round1(value)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Bucket label for a capacity in GB over right-closed bins; `"NA"` below the first edge.
pub fn harddisk_range(gb: f64) -> String {
    let (first, last) = match (HARDDISK_BIN_EDGES.first(), HARDDISK_BIN_EDGES.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return NA.to_string(),
    };
    if gb <= f64::from(first) {
        return NA.to_string();
    }
    if gb > f64::from(last) {
        return format!("{}+", last);
    }
    HARDDISK_BIN_EDGES
        .windows(2)
        .find(|edges| gb <= f64::from(edges[1]))
        .map(|edges| format!("{}-{}", edges[0], edges[1]))
        .unwrap_or_else(|| NA.to_string())
}

/// Clean the text columns and classify the operating system.
pub fn classify_categoricals(listings: Vec<Listing>, rules: &RuleSet) -> Vec<Listing> {
    listings
        .into_iter()
        .map(|mut listing| {
            let source = &mut listing.source;
            for field in [
                &mut source.brand,
                &mut source.model,
                &mut source.color,
                &mut source.cpu,
                &mut source.os,
                &mut source.special_features,
                &mut source.graphics,
                &mut source.graphics_coprocessor,
            ] {
                *field = clean_text(field);
            }

            listing.brand = listing.source.brand.clone();
            listing.model = listing.source.model.clone();
            listing.os = rules.os.classify(&listing.source.os);
            listing
        })
        .collect()
}

/// Parse the numeric columns and bring them to common units.
pub fn clean_numerics(listings: Vec<Listing>) -> Vec<Listing> {
    listings
        .into_iter()
        .map(|mut listing| {
            let source = &listing.source;
            listing.screen_size_in = clean_num(&source.screen_size);
            listing.harddisk_gb = tb_to_gb(clean_num(&source.harddisk));
            listing.ram_gb = clean_num(&source.ram).round_ties_even();
            listing.cpu_speed_ghz = mhz_to_ghz(clean_num(&source.cpu_speed));
            listing.rating = clean_num(&source.rating);
            listing.price_dollar = clean_num(&source.price);
            listing
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::rules::OperatingSystem;
    use crate::types::RawFields;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Windows 11 HOME "), "windows 11 home");
        assert_eq!(clean_text(""), NA);
        assert_eq!(clean_text("   "), NA);
    }

    #[test]
    fn test_clean_num_extracts_first_number() {
        assert_eq!(clean_num("$1,299.99"), 1299.99);
        assert_eq!(clean_num("15.6 Inches"), 15.6);
        assert_eq!(clean_num("1 TB"), 1.0);
        assert_eq!(clean_num(".5"), 0.5);
        assert_eq!(clean_num("-3 dB"), -3.0);
        assert_eq!(clean_num("n/a"), 0.0);
        assert_eq!(clean_num(""), 0.0);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(tb_to_gb(4.0), 4096.0);
        assert_eq!(tb_to_gb(8.0), 8192.0);
        assert_eq!(tb_to_gb(512.0), 512.0);
        assert_eq!(mhz_to_ghz(2400.0), 2.4);
        assert_eq!(mhz_to_ghz(3.5), 3.5);
        assert_eq!(mhz_to_ghz(1.83), 1.8);
    }

    #[test]
    fn test_harddisk_range_bins_are_right_closed() {
        assert_eq!(harddisk_range(0.0), NA);
        assert_eq!(harddisk_range(16.0), NA);
        assert_eq!(harddisk_range(32.0), "16-32");
        assert_eq!(harddisk_range(33.0), "32-64");
        assert_eq!(harddisk_range(1024.0), "512-1024");
        assert_eq!(harddisk_range(2048.0), "1024-2048");
        assert_eq!(harddisk_range(4096.0), "2048+");
    }

    #[test]
    fn test_stages_fill_typed_fields() {
        let rules = RuleSet::builtin().unwrap();
        let listing = Listing::from_source(RawFields {
            brand: " Dell ".to_string(),
            model: "XPS 13".to_string(),
            os: "Windows 11 Pro".to_string(),
            harddisk: "1 TB".to_string(),
            ram: "8.0".to_string(),
            cpu_speed: "2400 MHz".to_string(),
            price: "$1,049.00".to_string(),
            ..RawFields::default()
        });

        let listings = clean_numerics(classify_categoricals(vec![listing], &rules));
        let listing = &listings[0];

        assert_eq!(listing.brand, "dell");
        assert_eq!(listing.model, "xps 13");
        assert_eq!(listing.os, OperatingSystem::Windows11Pro);
        assert_eq!(listing.source.color, NA);
        assert_eq!(listing.harddisk_gb, 1024.0);
        assert_eq!(listing.ram_gb, 8.0);
        assert_eq!(listing.cpu_speed_ghz, 2.4);
        assert_eq!(listing.price_dollar, 1049.0);
        assert_eq!(listing.screen_size_in, 0.0);
    }
}
