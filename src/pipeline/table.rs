//! Table-level stages that run before any listing is typed.

use std::collections::HashSet;
use tracing::debug;

use crate::constants::*;
use crate::error::{CleanerError, Result};
use crate::types::{Listing, RawFields};

/// The loaded spreadsheet: a header row and string cells, `""` meaning missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column, compared case- and whitespace-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| normalize_column_name(header) == name)
    }

    /// Remove columns in which every cell is missing.
    pub fn drop_empty_columns(self) -> Self {
        if self.rows.is_empty() {
            return self;
        }
        let keep: Vec<bool> = (0..self.headers.len())
            .map(|col| self.rows.iter().any(|row| has_value(row, col)))
            .collect();

        let dropped: Vec<&str> = self
            .headers
            .iter()
            .zip(&keep)
            .filter(|(_, keep)| !**keep)
            .map(|(header, _)| header.as_str())
            .collect();
        if !dropped.is_empty() {
            debug!(?dropped, "Dropping all-empty columns");
        }

        let headers = filter_by(&self.headers, &keep);
        let rows = self.rows.iter().map(|row| filter_by(row, &keep)).collect();
        Self { headers, rows }
    }

    /// Remove rows whose `column` cell is missing. A table without the column is an error.
    pub fn drop_rows_missing(self, column: &str) -> Result<Self> {
        let index = self
            .column_index(column)
            .ok_or_else(|| CleanerError::MissingColumn(column.to_string()))?;

        let rows = self
            .rows
            .into_iter()
            .filter(|row| has_value(row, index))
            .collect();
        Ok(Self {
            headers: self.headers,
            rows,
        })
    }

    /// Keep the first of every set of identical rows.
    pub fn dedupe(self) -> Self {
        let mut seen = HashSet::new();
        let rows = self
            .rows
            .into_iter()
            .filter(|row| seen.insert(row.clone()))
            .collect();
        Self {
            headers: self.headers,
            rows,
        }
    }

    pub fn normalize_column_names(self) -> Self {
        Self {
            headers: self.headers.iter().map(|h| normalize_column_name(h)).collect(),
            rows: self.rows,
        }
    }

    /// Type every row as a [`Listing`]; absent input columns read as missing.
    pub fn into_listings(self) -> Vec<Listing> {
        let column = |name: &str| self.column_index(name);
        let indices = [
            column(COL_BRAND),
            column(COL_MODEL),
            column(COL_SCREEN_SIZE),
            column(COL_COLOR),
            column(COL_HARDDISK),
            column(COL_CPU),
            column(COL_RAM),
            column(COL_OS),
            column(COL_SPECIAL_FEATURES),
            column(COL_GRAPHICS),
            column(COL_GRAPHICS_COPROCESSOR),
            column(COL_CPU_SPEED),
            column(COL_RATING),
            column(COL_PRICE),
        ];

        self.rows
            .iter()
            .map(|row| {
                let cell = |slot: usize| {
                    indices[slot]
                        .and_then(|index| row.get(index))
                        .cloned()
                        .unwrap_or_default()
                };
                Listing::from_source(RawFields {
                    brand: cell(0),
                    model: cell(1),
                    screen_size: cell(2),
                    color: cell(3),
                    harddisk: cell(4),
                    cpu: cell(5),
                    ram: cell(6),
                    os: cell(7),
                    special_features: cell(8),
                    graphics: cell(9),
                    graphics_coprocessor: cell(10),
                    cpu_speed: cell(11),
                    rating: cell(12),
                    price: cell(13),
                })
            })
            .collect()
    }
}

pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Short rows read as missing in the columns they lack.
fn has_value(row: &[String], index: usize) -> bool {
    row.get(index).is_some_and(|cell| !cell.trim().is_empty())
}

fn filter_by(cells: &[String], keep: &[bool]) -> Vec<String> {
    cells
        .iter()
        .zip(keep)
        .filter(|(_, keep)| **keep)
        .map(|(cell, _)| cell.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_drop_empty_columns() {
        let t = table(&["brand", "Unnamed: 3", "model"], &[&["dell", "", "xps"], &["hp", " ", ""]]);
        let t = t.drop_empty_columns();
        assert_eq!(t.headers, vec!["brand", "model"]);
        assert_eq!(t.rows[1], vec!["hp", ""]);
    }

    #[test]
    fn test_drop_empty_columns_keeps_headers_of_empty_table() {
        let t = table(&["brand", "model"], &[]).drop_empty_columns();
        assert_eq!(t.headers, vec!["brand", "model"]);
    }

    #[test]
    fn test_drop_rows_missing_model() {
        let t = table(&["brand", " Model "], &[&["dell", "xps"], &["hp", ""]]);
        let t = t.drop_rows_missing(COL_MODEL).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows[0][0], "dell");
    }

    #[test]
    fn test_short_rows_read_as_missing() {
        let t = table(&["brand", "model", "color"], &[&["dell", "xps"], &["hp"], &["acer", "aspire", "black"]]);
        let t = t.drop_empty_columns();
        assert_eq!(t.headers, vec!["brand", "model", "color"]);

        let t = t.drop_rows_missing(COL_MODEL).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0], vec!["dell", "xps"]);
        assert_eq!(t.rows[1], vec!["acer", "aspire", "black"]);
    }

    #[test]
    fn test_drop_rows_missing_requires_column() {
        let t = table(&["brand"], &[&["dell"]]);
        assert!(matches!(t.drop_rows_missing(COL_MODEL), Err(CleanerError::MissingColumn(_))));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let t = table(&["model", "ram"], &[&["a", "8"], &["b", "8"], &["a", "8"], &["a", "16"]]);
        let t = t.dedupe();
        assert_eq!(t.len(), 3);
        assert_eq!(t.rows[2], vec!["a", "16"]);
    }

    #[test]
    fn test_into_listings_reads_columns_by_normalized_name() {
        let t = table(&[" OS", "MODEL", "Price"], &[&["Windows 11", "XPS 13", "$999"]]).normalize_column_names();
        assert_eq!(t.headers, vec!["os", "model", "price"]);

        let listings = t.into_listings();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].source.os, "Windows 11");
        assert_eq!(listings[0].source.model, "XPS 13");
        assert_eq!(listings[0].source.price, "$999");
        assert_eq!(listings[0].source.color, "");
    }
}
