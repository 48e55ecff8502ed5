//! Delimited multi-value columns: colors explode into rows, features aggregate into a set.

use super::rules::{split_and_classify, split_tokens, Color, Feature, RuleTable};
use crate::constants::MULTI_VALUE_DELIMITERS;
use crate::types::Listing;

/// One listing per color token, identical except for the color.
///
/// A listing with no tokens at all is kept once with color `NA`.
pub fn explode_colors(listings: Vec<Listing>, table: &RuleTable<Color>) -> Vec<Listing> {
    let mut exploded = Vec::with_capacity(listings.len());
    for listing in listings {
        let colors: Vec<Color> = split_tokens(&listing.source.color, &MULTI_VALUE_DELIMITERS)
            .into_iter()
            .map(|token| table.classify(token))
            .collect();

        match colors.split_last() {
            None => exploded.push(Listing {
                color: Color::Na,
                ..listing
            }),
            Some((last, rest)) => {
                for color in rest {
                    exploded.push(Listing {
                        color: *color,
                        ..listing.clone()
                    });
                }
                exploded.push(Listing {
                    color: *last,
                    ..listing
                });
            }
        }
    }
    exploded
}

/// Aggregate the feature tokens of each listing into one set.
///
/// Unmatched tokens are dropped; a listing with no matching token keeps an
/// empty set, which is written out as `NA`.
pub fn classify_features(listings: Vec<Listing>, table: &RuleTable<Feature>) -> Vec<Listing> {
    listings
        .into_iter()
        .map(|mut listing| {
            let mut features =
                split_and_classify(&listing.source.special_features, &MULTI_VALUE_DELIMITERS, table);
            features.remove(&Feature::Na);
            listing.special_features = features;
            listing
        })
        .collect()
}
