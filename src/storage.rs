//! Spreadsheet I/O: the raw listing table in, the cleaned table out.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::constants::MISSING_MARKERS;
use crate::error::Result;
use crate::pipeline::table::RawTable;
use crate::types::OutputRow;

/// Load a CSV listing export. An unreadable file is the one fatal input error;
/// callers attach the path when reporting it.
pub fn load_table(path: &Path) -> Result<RawTable> {
    let file = File::open(path)?;
    let table = read_table(file)?;
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        columns = table.headers.len(),
        "Loaded input table"
    );
    Ok(table)
}

/// Read a CSV table; ragged rows are padded or truncated to the header width.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().take(width).map(missing_to_empty).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn missing_to_empty(cell: &str) -> String {
    if MISSING_MARKERS.contains(&cell.trim()) {
        String::new()
    } else {
        cell.to_string()
    }
}

/// Write the cleaned rows, creating parent directories as needed.
pub fn write_rows(path: &Path, rows: &[OutputRow]) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)?;
    write_rows_to(file, rows)?;
    info!(path = %path.display(), rows = rows.len(), "Wrote cleaned table");
    Ok(())
}

pub fn write_rows_to<W: Write>(writer: W, rows: &[OutputRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON sidecar (coverage report and the like).
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "Wrote JSON report");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanerError;
    use tempfile::tempdir;

    #[test]
    fn test_read_table_maps_missing_markers_and_pads_rows() {
        let csv = "Brand,Model,Color\nDell,Inspiron,NA\nHP,,Black\nAcer\n";
        let table = read_table(csv.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["Brand", "Model", "Color"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["Dell", "Inspiron", ""]);
        assert_eq!(table.rows[1], vec!["HP", "", "Black"]);
        assert_eq!(table.rows[2], vec!["Acer", "", ""]);
    }

    #[test]
    fn test_only_default_missing_markers_are_blanked() {
        let csv = "Brand,Model,Color\nDell,-,#N/A\nHP,N/A, -\n";
        let table = read_table(csv.as_bytes()).unwrap();

        assert_eq!(table.rows[0], vec!["Dell", "-", ""]);
        assert_eq!(table.rows[1], vec!["HP", "", " -"]);
    }

    #[test]
    fn test_missing_input_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = load_table(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(CleanerError::Io(_))));
    }

    #[test]
    fn test_write_rows_uses_output_column_order() {
        let row = OutputRow {
            brand: "dell".to_string(),
            model: "inspiron".to_string(),
            screen_size_in: 15.6,
            color: "black".to_string(),
            harddisk_gb: 512,
            harddisk_range_gb: "256-512".to_string(),
            cpu_brand: "intel".to_string(),
            cpu_model: "core i5".to_string(),
            ram_gb: 8,
            os: "windows 11 home".to_string(),
            special_features: "NA".to_string(),
            graphics: "integrated".to_string(),
            gpu_brand: "intel".to_string(),
            gpu_model: "uhd".to_string(),
            rating: 4.5,
            price_dollar: 499.99,
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("cleaned.csv");
        write_rows(&path, &[row]).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "brand,model,screen_size_in,color,harddisk_gb,harddisk_range_gb,cpu_brand,cpu_model,ram_gb,os,special_features,graphics,gpu_brand,gpu_model,rating,price_dollar"
        );
        assert_eq!(
            lines.next().unwrap(),
            "dell,inspiron,15.6,black,512,256-512,intel,core i5,8,windows 11 home,NA,integrated,intel,uhd,4.5,499.99"
        );
    }
}
