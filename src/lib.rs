pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod storage;
pub mod types;

pub use error::{CleanerError, Result};
pub use pipeline::processing::rules::RuleSet;
pub use pipeline::{Pipeline, PipelineResult, Stage};
