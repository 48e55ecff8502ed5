//! Reconciles the graphics class column with the graphics coprocessor column.
//!
//! The two columns overlap: sellers put model names in the class column, class
//! words in the descriptor, or both in one. Reconciliation turns each pair into
//! a class from the closed vocabulary plus a `(brand, model)` compound.

use tracing::trace;

use super::rules::{GpuRules, GraphicsClass, Vocabulary};
use crate::constants::NA;
use crate::types::{Compound, Listing};

/// Parse the class column; `None` means it holds descriptive text instead.
pub fn parse_class(text: &str) -> Option<GraphicsClass> {
    let text = text.trim();
    if text.is_empty() {
        return Some(GraphicsClass::Na);
    }
    GraphicsClass::from_label(text)
}

/// Move descriptive text out of the class column when the descriptor is empty.
///
/// Returns the `(class, descriptor)` pair to reconcile.
pub fn promote<'a>(class_text: &'a str, descriptor: &'a str) -> (&'a str, &'a str) {
    if parse_class(class_text).is_none() && is_missing(descriptor) {
        (NA, class_text)
    } else {
        (class_text, descriptor)
    }
}

/// Resolve one `(class, descriptor)` pair.
pub fn reconcile(class_text: &str, descriptor: &str, rules: &GpuRules) -> (GraphicsClass, Compound) {
    let (class_text, descriptor) = promote(class_text, descriptor);
    let mut class = parse_class(class_text).unwrap_or(GraphicsClass::Na);

    if is_missing(descriptor) {
        return (class, Compound::na());
    }

    let canonical = rules.rewrite.apply(descriptor);
    if rules.integrated.matches(&canonical) {
        class = GraphicsClass::Integrated;
    }
    // Dedicated is checked second and wins when both sets match
    if rules.dedicated.matches(&canonical) {
        class = GraphicsClass::Dedicated;
    }

    let stripped = rules.qualifiers.apply(&canonical);
    if stripped.is_empty() {
        return (GraphicsClass::Na, Compound::na());
    }

    let compound = rules.extractor.extract(&stripped);
    trace!(descriptor, canonical = %canonical, class = %class, brand = %compound.brand, "Reconciled graphics");
    (class, compound)
}

fn is_missing(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == NA
}

/// Reconcile every listing's graphics columns.
pub fn reconcile_graphics(listings: Vec<Listing>, rules: &GpuRules) -> Vec<Listing> {
    listings
        .into_iter()
        .map(|mut listing| {
            let (class, gpu) = reconcile(
                &listing.source.graphics,
                &listing.source.graphics_coprocessor,
                rules,
            );
            listing.graphics = class;
            listing.gpu = gpu;
            listing
        })
        .collect()
}
