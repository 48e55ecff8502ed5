// Pipeline processing: rule tables, column classifiers and cross-column fixups

pub mod coverage;
pub mod extract;
pub mod fixups;
pub mod multivalue;
pub mod normalize;
pub mod reconcile;
pub mod rules;

pub use coverage::{CoverageReport, StageCount};
pub use extract::{CompoundExtractor, UnmatchedPolicy};
pub use rules::RuleSet;
