use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::NA;
use crate::types::OutputRow;

/// Row count observed after a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: String,
    pub rows: usize,
}

/// How much of the cleaned table the rule tables managed to classify
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Rows remaining after each stage, in pipeline order
    pub stages: Vec<StageCount>,
    /// Number of `NA` cells per output column
    pub unmatched: BTreeMap<String, usize>,
    pub total_rows: usize,
}

impl CoverageReport {
    pub fn new(stages: Vec<StageCount>, rows: &[OutputRow]) -> Self {
        let mut unmatched: BTreeMap<String, usize> = BTreeMap::new();
        for row in rows {
            for (column, value) in classified_cells(row) {
                let count = unmatched.entry(column.to_string()).or_insert(0);
                if value == NA {
                    *count += 1;
                }
            }
        }

        Self {
            generated_at: Utc::now(),
            stages,
            unmatched,
            total_rows: rows.len(),
        }
    }

    /// Share of rows with a classified (non-`NA`) value in `column`.
    pub fn coverage(&self, column: &str) -> Option<f64> {
        if self.total_rows == 0 {
            return None;
        }
        let missing = *self.unmatched.get(column)?;
        Some(1.0 - missing as f64 / self.total_rows as f64)
    }
}

fn classified_cells(row: &OutputRow) -> [(&'static str, &str); 11] {
    [
        ("brand", row.brand.as_str()),
        ("color", row.color.as_str()),
        ("harddisk_range_gb", row.harddisk_range_gb.as_str()),
        ("cpu_brand", row.cpu_brand.as_str()),
        ("cpu_model", row.cpu_model.as_str()),
        ("os", row.os.as_str()),
        ("special_features", row.special_features.as_str()),
        ("graphics", row.graphics.as_str()),
        ("gpu_brand", row.gpu_brand.as_str()),
        ("gpu_model", row.gpu_model.as_str()),
        ("model", row.model.as_str()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Listing, RawFields};

    #[test]
    fn test_counts_na_cells_per_column() {
        let mut classified = Listing::from_source(RawFields::default());
        classified.brand = "dell".to_string();
        classified.model = "xps 13".to_string();
        let unclassified = Listing {
            brand: NA.to_string(),
            ..classified.clone()
        };

        let rows: Vec<OutputRow> = [&classified, &unclassified].into_iter().map(OutputRow::from).collect();
        let report = CoverageReport::new(
            vec![StageCount {
                stage: "emit".to_string(),
                rows: 2,
            }],
            &rows,
        );

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.unmatched["brand"], 1);
        assert_eq!(report.unmatched["model"], 0);
        assert_eq!(report.unmatched["color"], 2);
        assert_eq!(report.coverage("brand"), Some(0.5));
        assert_eq!(report.coverage("price"), None);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = CoverageReport::new(Vec::new(), &[]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_rows"], 0);
        assert!(json["unmatched"].as_object().unwrap().is_empty());
    }
}
