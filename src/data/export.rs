use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::ElectricityRecord;

/// Write detail rows to `path`, as CSV or records-oriented JSON depending on
/// the extension.
pub fn export_rows(path: &Path, columns: &[String], rows: &[&ElectricityRecord]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(path, columns, rows),
        "json" => write_json(path, columns, rows),
        other => bail!("Unsupported export extension: .{other}"),
    }
}

fn write_csv(path: &Path, columns: &[String], rows: &[&ElectricityRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(columns).context("writing CSV header")?;
    for rec in rows {
        writer
            .write_record(rec.cells.iter().map(|c| c.to_string()))
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_json(path: &Path, columns: &[String], rows: &[&ElectricityRecord]) -> Result<()> {
    let records: Vec<serde_json::Map<String, serde_json::Value>> = rows
        .iter()
        .map(|rec| {
            columns
                .iter()
                .zip(&rec.cells)
                .map(|(col, cell)| serde_json::to_value(cell).map(|v| (col.clone(), v)))
                .collect::<Result<serde_json::Map<_, _>, _>>()
        })
        .collect::<Result<_, _>>()
        .context("serialising rows")?;

    let text = serde_json::to_string_pretty(&records).context("serialising rows")?;
    std::fs::write(path, text).context("writing JSON file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_file, parse_csv};

    const CSV: &str = "\
Year,US_State,Residential Price,Note
2020,CA,10.5,
2021,CA,30,peak
";

    #[test]
    fn csv_export_reloads_identically() {
        let ds = parse_csv(CSV.as_bytes()).unwrap();
        let rows: Vec<&ElectricityRecord> = ds.records.iter().collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");

        export_rows(&path, &ds.columns, &rows).unwrap();
        let back = load_file(&path).unwrap();
        assert_eq!(back.columns, ds.columns);
        assert_eq!(back.records, ds.records);
    }

    #[test]
    fn json_export_is_records_oriented() {
        let ds = parse_csv(CSV.as_bytes()).unwrap();
        let rows: Vec<&ElectricityRecord> = ds.records.iter().skip(1).collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");

        export_rows(&path, &ds.columns, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let key_positions: Vec<usize> = ds
            .columns
            .iter()
            .map(|col| text.find(&format!("\"{col}\"")).unwrap())
            .collect();
        assert!(key_positions.windows(2).all(|w| w[0] < w[1]), "{text}");

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"Year": 2021, "US_State": "CA", "Residential Price": 30, "Note": "peak"}
            ])
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_rows(&dir.path().join("rows.txt"), &[], &[]).is_err());
    }
}
