use anyhow::Result;
use std::fs;
use tempfile::tempdir;

use laptop_cleaner::pipeline::processing::rules::rule_set::DEFAULT_RULES;
use laptop_cleaner::storage;
use laptop_cleaner::types::OutputRow;
use laptop_cleaner::{Pipeline, RuleSet};

const HEADER: &str = "Brand,Model,Screen_Size,Color,Harddisk,CPU,RAM,OS,Special_Features,Graphics,Graphics_Coprocessor,CPU_Speed,Rating,Price,Unnamed: 14";

fn write_input(dir: &std::path::Path, rows: &[&str]) -> Result<std::path::PathBuf> {
    let path = dir.join("listings.csv");
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(&path, content)?;
    Ok(path)
}

fn read_output(path: &std::path::Path) -> Result<Vec<OutputRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<OutputRow>, _>>()?;
    Ok(rows)
}

#[test]
fn test_multi_color_listing_end_to_end() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = write_input(
        temp_dir.path(),
        &[
            r#"Dell,Inspiron 15 3520,15.6 Inches,"Black, Silver/Grey",1 TB,Intel Core i7-10750H CPU,8.0,Windows 11 Home,"Backlit Keyboard, Fingerprint Reader",NA,NVIDIA GeForce RTX 3060,2.6 GHz,4.5,"$1,099.99","#,
            // No model: dropped before classification
            r#"HP,,14 Inches,Silver,256 GB,Intel Celeron N4020,4 GB,Windows 11 S,,integrated,Intel UHD Graphics 600,1.1 GHz,3.9,$229.00,"#,
        ],
    )?;
    let output = temp_dir.path().join("out").join("cleaned.csv");

    let pipeline = Pipeline::new(RuleSet::builtin()?);
    let result = pipeline.run_file(&input, &output)?;

    assert_eq!(result.rows.len(), 3);
    let rows = read_output(&output)?;
    assert_eq!(rows, result.rows);

    let colors: Vec<&str> = rows.iter().map(|row| row.color.as_str()).collect();
    assert_eq!(colors, vec!["black", "silver", "grey"]);

    for row in &rows {
        assert_eq!(row.brand, "dell");
        assert_eq!(row.model, "inspiron 15 3520");
        assert_eq!(row.screen_size_in, 15.6);
        assert_eq!(row.harddisk_gb, 1024);
        assert_eq!(row.harddisk_range_gb, "512-1024");
        assert_eq!(row.ram_gb, 8);
        assert_eq!(row.cpu_brand, "intel");
        assert_eq!(row.cpu_model, "core i7 10750h");
        assert_eq!(row.os, "windows 11 home");
        assert_eq!(row.special_features, "backlit keyboard, fingerprint reader");
        assert_eq!(row.graphics, "dedicated");
        assert_eq!(row.gpu_brand, "nvidia");
        assert_eq!(row.gpu_model, "rtx 3060");
        assert_eq!(row.rating, 4.5);
        assert_eq!(row.price_dollar, 1099.99);
    }

    Ok(())
}

#[test]
fn test_duplicates_and_unclassified_values() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = write_input(
        temp_dir.path(),
        &[
            "Lenovo,IdeaPad 3,15.6,Mauve,512,AMD Ryzen 5 3500U,8,Chrome OS,,Intel UHD Graphics,NA,2.1,4.2,$499,",
            "Lenovo,IdeaPad 3,15.6,Mauve,512,AMD Ryzen 5 3500U,8,Chrome OS,,Intel UHD Graphics,NA,2.1,4.2,$499,",
            ",ThinkPad X1 Carbon,14,Black,2,Unknown,16,Windows 10 Pro,,NA,NA,2400,,,",
        ],
    )?;
    let output = temp_dir.path().join("cleaned.csv");

    let result = Pipeline::new(RuleSet::builtin()?).run_file(&input, &output)?;
    assert_eq!(result.rows.len(), 2);

    let ideapad = &result.rows[0];
    assert_eq!(ideapad.brand, "lenovo");
    assert_eq!(ideapad.color, "NA");
    assert_eq!(ideapad.os, "chromeos");
    assert_eq!(ideapad.cpu_brand, "amd");
    assert_eq!(ideapad.cpu_model, "ryzen 5 3500u");
    assert_eq!(ideapad.graphics, "integrated");
    assert_eq!(ideapad.gpu_brand, "intel");
    assert_eq!(ideapad.gpu_model, "uhd");
    assert_eq!(ideapad.special_features, "NA");

    let thinkpad = &result.rows[1];
    assert_eq!(thinkpad.brand, "lenovo");
    assert_eq!(thinkpad.harddisk_gb, 2048);
    assert_eq!(thinkpad.harddisk_range_gb, "1024-2048");
    assert_eq!(thinkpad.cpu_brand, "NA");
    assert_eq!(thinkpad.cpu_model, "NA");
    assert_eq!(thinkpad.graphics, "NA");
    assert_eq!(thinkpad.gpu_brand, "NA");
    assert_eq!(thinkpad.rating, 0.0);

    let coverage = &result.coverage;
    assert_eq!(coverage.total_rows, 2);
    assert_eq!(coverage.unmatched["cpu_brand"], 1);
    assert_eq!(coverage.unmatched["color"], 1);
    assert_eq!(coverage.stages.first().map(|s| s.rows), Some(3));
    assert_eq!(coverage.stages.iter().find(|s| s.stage == "dedupe").map(|s| s.rows), Some(2));

    let report = temp_dir.path().join("report.json");
    storage::write_json(&report, coverage)?;
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report)?)?;
    assert_eq!(json["total_rows"], 2);
    assert_eq!(json["stages"][0]["stage"], "load");

    Ok(())
}

#[test]
fn test_missing_input_file_fails() -> Result<()> {
    let temp_dir = tempdir()?;
    let pipeline = Pipeline::new(RuleSet::builtin()?);

    let result = pipeline.run_file(&temp_dir.path().join("absent.csv"), &temp_dir.path().join("out.csv"));
    assert!(result.is_err());
    assert!(!temp_dir.path().join("out.csv").exists());
    Ok(())
}

#[test]
fn test_rule_file_replaces_builtin_tables() -> Result<()> {
    let temp_dir = tempdir()?;
    let rules_path = temp_dir.path().join("rules.toml");
    let custom = DEFAULT_RULES.replacen("pattern = 'black", "pattern = 'mauve|black", 1);
    fs::write(&rules_path, custom)?;

    let input = write_input(
        temp_dir.path(),
        &["Acer,Aspire 5,15.6,Mauve,512,Intel Core i5,8,Windows 11,,integrated,NA,2.4,4.0,$549,"],
    )?;
    let output = temp_dir.path().join("cleaned.csv");

    let result = Pipeline::new(RuleSet::load(&rules_path)?).run_file(&input, &output)?;
    assert_eq!(result.rows[0].color, "black");

    let builtin = Pipeline::new(RuleSet::builtin()?).run_file(&input, &output)?;
    assert_eq!(builtin.rows[0].color, "NA");
    Ok(())
}
