// Cleaning pipeline: table-level stages, column processing and the driver

pub mod processing;
pub mod table;

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::constants::{COL_MODEL, NA};
use crate::error::Result;
use crate::metrics::PipelineMetrics;
use crate::storage;
use crate::types::{Listing, OutputRow};
use processing::coverage::{CoverageReport, StageCount};
use processing::rules::RuleSet;
use processing::{fixups, multivalue, normalize, reconcile};
use table::RawTable;

/// The fixed, linear sequence of pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    DropEmptyColumns,
    DropRowsMissingModel,
    Dedupe,
    NormalizeColumnNames,
    ClassifyCategoricals,
    CleanNumerics,
    ExplodeColor,
    ClassifyFeatures,
    ReconcileGraphics,
    ExtractCpu,
    BrandModelFixups,
    DedupeClassified,
    DropUnknownModel,
    Emit,
}

impl Stage {
    pub const ALL: [Stage; 15] = [
        Stage::Load,
        Stage::DropEmptyColumns,
        Stage::DropRowsMissingModel,
        Stage::Dedupe,
        Stage::NormalizeColumnNames,
        Stage::ClassifyCategoricals,
        Stage::CleanNumerics,
        Stage::ExplodeColor,
        Stage::ClassifyFeatures,
        Stage::ReconcileGraphics,
        Stage::ExtractCpu,
        Stage::BrandModelFixups,
        Stage::DedupeClassified,
        Stage::DropUnknownModel,
        Stage::Emit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::DropEmptyColumns => "drop_empty_columns",
            Stage::DropRowsMissingModel => "drop_rows_missing_model",
            Stage::Dedupe => "dedupe",
            Stage::NormalizeColumnNames => "normalize_column_names",
            Stage::ClassifyCategoricals => "classify_categoricals",
            Stage::CleanNumerics => "clean_numerics",
            Stage::ExplodeColor => "explode_color",
            Stage::ClassifyFeatures => "classify_features",
            Stage::ReconcileGraphics => "reconcile_graphics",
            Stage::ExtractCpu => "extract_cpu",
            Stage::BrandModelFixups => "brand_model_fixups",
            Stage::DedupeClassified => "dedupe_classified",
            Stage::DropUnknownModel => "drop_unknown_model",
            Stage::Emit => "emit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub rows: Vec<OutputRow>,
    pub coverage: CoverageReport,
}

/// Tracks row counts between stages and reports drops and growth.
#[derive(Debug, Default)]
struct StageLog {
    counts: Vec<StageCount>,
}

impl StageLog {
    fn record(&mut self, stage: Stage, rows: usize) {
        let before = self.counts.last().map(|count| count.rows).unwrap_or(rows);
        info!(stage = %stage, before, after = rows, "Stage complete");

        if rows < before {
            PipelineMetrics::record_rows_dropped(stage.as_str(), before - rows);
        } else if rows > before {
            PipelineMetrics::record_rows_exploded(rows - before);
        }

        self.counts.push(StageCount {
            stage: stage.to_string(),
            rows,
        });
    }

    fn into_counts(self) -> Vec<StageCount> {
        self.counts
    }
}

pub struct Pipeline {
    rules: RuleSet,
}

impl Pipeline {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Clean a loaded table. Only a table without a `model` column fails.
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn run(&self, table: RawTable) -> Result<PipelineResult> {
        let mut log = StageLog::default();
        log.record(Stage::Load, table.len());

        let table = table.drop_empty_columns();
        log.record(Stage::DropEmptyColumns, table.len());

        let table = table.drop_rows_missing(COL_MODEL)?;
        log.record(Stage::DropRowsMissingModel, table.len());

        let table = table.dedupe();
        log.record(Stage::Dedupe, table.len());

        let table = table.normalize_column_names();
        log.record(Stage::NormalizeColumnNames, table.len());

        let listings = normalize::classify_categoricals(table.into_listings(), &self.rules);
        log.record(Stage::ClassifyCategoricals, listings.len());

        let listings = normalize::clean_numerics(listings);
        log.record(Stage::CleanNumerics, listings.len());

        let listings = multivalue::explode_colors(listings, &self.rules.color);
        log.record(Stage::ExplodeColor, listings.len());

        let listings = multivalue::classify_features(listings, &self.rules.feature);
        log.record(Stage::ClassifyFeatures, listings.len());

        let listings = reconcile::reconcile_graphics(listings, &self.rules.gpu);
        log.record(Stage::ReconcileGraphics, listings.len());

        let listings = fixups::extract_cpu(listings, &self.rules.cpu);
        log.record(Stage::ExtractCpu, listings.len());

        let listings = fixups::fix_brands_and_models(listings, &self.rules.brand);
        log.record(Stage::BrandModelFixups, listings.len());

        let listings = dedupe_listings(listings);
        log.record(Stage::DedupeClassified, listings.len());

        let listings: Vec<Listing> = listings
            .into_iter()
            .filter(|listing| listing.model != NA)
            .collect();
        log.record(Stage::DropUnknownModel, listings.len());

        let rows: Vec<OutputRow> = listings.iter().map(OutputRow::from).collect();
        log.record(Stage::Emit, rows.len());

        let coverage = CoverageReport::new(log.into_counts(), &rows);
        for (field, count) in &coverage.unmatched {
            PipelineMetrics::record_unmatched(field, *count);
            debug!(field = %field, unmatched = count, "Coverage");
        }
        PipelineMetrics::record_output_rows(rows.len());

        Ok(PipelineResult { rows, coverage })
    }

    /// Load `input`, clean it and write the result to `output`.
    pub fn run_file(&self, input: &Path, output: &Path) -> Result<PipelineResult> {
        let table = storage::load_table(input)?;
        let result = self.run(table)?;
        storage::write_rows(output, &result.rows)?;
        Ok(result)
    }
}

/// Keep the first of every set of listings with identical cleaned values.
fn dedupe_listings(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|listing| seen.insert(listing.dedup_key()))
        .collect()
}
