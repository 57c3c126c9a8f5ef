use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{
    CellValue, Dataset, ElectricityRecord, RESIDENTIAL_PRICE_COLUMN, STATE_COLUMN, YEAR_COLUMN,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why the dataset could not be loaded. Always fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] ParquetError),
    #[error("reading parquet record batch: {0}")]
    Arrow(#[from] ArrowError),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        /// 1-based data row, not counting the header.
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Structure(String),
    #[error("dataset has no rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// Anything starting with `http://` or `https://` is a URL, everything
    /// else a local path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the dataset from a URL (always CSV) or a local file.
pub fn load_source(source: &DataSource, options: &FetchOptions) -> Result<Dataset, LoadError> {
    match source {
        DataSource::Url(url) => fetch_csv(url, options),
        DataSource::File(path) => load_file(path),
    }
}

/// Load a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "Year": 2020, "US_State": "CA", ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    match ext.as_str() {
        "csv" => parse_csv(std::fs::File::open(path).map_err(io_err)?),
        "json" => parse_json(&std::fs::read_to_string(path).map_err(io_err)?),
        "parquet" | "pq" => load_parquet(std::fs::File::open(path).map_err(io_err)?),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Remote CSV
// ---------------------------------------------------------------------------

fn fetch_csv(url: &str, options: &FetchOptions) -> Result<Dataset, LoadError> {
    let agent = ureq::AgentBuilder::new().timeout(options.timeout).build();
    let response = agent.get(url).call().map_err(|e| LoadError::Fetch {
        url: url.to_string(),
        source: Box::new(e),
    })?;
    log::debug!("{url} answered {} {}", response.status(), response.status_text());
    parse_csv(response.into_reader())
}

// ---------------------------------------------------------------------------
// Row assembly shared by all formats
// ---------------------------------------------------------------------------

/// Positions of the columns the dashboard interprets.
struct RequiredColumns {
    year: usize,
    state: usize,
    price: usize,
}

impl RequiredColumns {
    fn locate(columns: &[String]) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        Ok(RequiredColumns {
            year: find(YEAR_COLUMN)?,
            state: find(STATE_COLUMN)?,
            price: find(RESIDENTIAL_PRICE_COLUMN)?,
        })
    }

    /// `index` is the 0-based position of the row among the data rows.
    fn build(&self, index: usize, cells: Vec<CellValue>) -> Result<ElectricityRecord, LoadError> {
        let row = index + 1;
        let cell = |idx: usize| cells.get(idx).unwrap_or(&CellValue::Null);
        let invalid = |column: &'static str, value: &CellValue| LoadError::InvalidValue {
            row,
            column,
            value: value.to_string(),
        };

        let year_cell = cell(self.year);
        let year = year_cell
            .as_i64()
            .ok_or_else(|| invalid(YEAR_COLUMN, year_cell))?;

        let state = match cell(self.state) {
            CellValue::Null => return Err(invalid(STATE_COLUMN, &CellValue::Null)),
            other => other.to_string(),
        };

        let price_cell = cell(self.price);
        let residential_price = price_cell
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(RESIDENTIAL_PRICE_COLUMN, price_cell))?;

        Ok(ElectricityRecord {
            year,
            state,
            residential_price,
            cells,
        })
    }
}

fn finish(columns: Vec<String>, records: Vec<ElectricityRecord>) -> Result<Dataset, LoadError> {
    Dataset::from_records(columns, records).ok_or(LoadError::Empty)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse a CSV table with a header row. Every column is kept; cell types
/// are guessed per cell.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let required = RequiredColumns::locate(&columns)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let raw = result?;
        let cells = raw.iter().map(CellValue::guess).collect();
        records.push(required.build(row_no, cells)?);
    }

    finish(columns, records)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "Year": 2020, "US_State": "CA", "Residential Price": 20.45 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all keys in order of first appearance; keys
/// missing from a row are null.
pub fn parse_json(text: &str) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Structure("expected a top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::Structure(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    let required = RequiredColumns::locate(&columns)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let cells = columns
            .iter()
            .map(|col| row.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        records.push(required.build(i, cells)?);
    }

    finish(columns, records)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns, as written by
/// `df.to_parquet()` from Pandas or `df.write_parquet()` from Polars.
fn load_parquet(file: std::fs::File) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let required = RequiredColumns::locate(&columns)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect();
            records.push(required.build(records.len(), cells)?);
        }
    }

    finish(columns, records)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row))),
        other => Some(CellValue::String(format!("{other:?}"))),
    };
    cell.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CSV: &str = "\
Year,Month,US_State,Residential Price,Commercial Price
2020,1,CA,10.0,8.5
2020,2,CA,20.0,
2021,1,TX,11.25,9.0
";

    #[test]
    fn csv_keeps_every_column_and_row_order() {
        let ds = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(
            ds.columns,
            vec!["Year", "Month", "US_State", "Residential Price", "Commercial Price"]
        );
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].state, "CA");
        assert_eq!(ds.records[2].residential_price, 11.25);
        assert_eq!(ds.records[1].cells[4], CellValue::Null);
        assert_eq!(ds.records[2].cells[1], CellValue::Integer(1));
    }

    #[test]
    fn csv_year_bounds() {
        let ds = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!((ds.year_min, ds.year_max), (2020, 2021));
    }

    #[test]
    fn integer_prices_are_accepted() {
        let ds = parse_csv("Year,US_State,Residential Price\n2020,CA,12\n".as_bytes()).unwrap();
        assert_eq!(ds.records[0].residential_price, 12.0);
    }

    #[test]
    fn missing_required_column() {
        let err = parse_csv("Year,US_State\n2020,CA\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Residential Price")));
    }

    #[test]
    fn unparsable_year() {
        let csv = "Year,US_State,Residential Price\n2020,CA,1.0\nlate,CA,2.0\n";
        match parse_csv(csv.as_bytes()).unwrap_err() {
            LoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Year");
                assert_eq!(value, "late");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparsable_price() {
        let csv = "Year,US_State,Residential Price\n2020,CA,n/a\n";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(LoadError::InvalidValue { column: "Residential Price", .. })
        ));
    }

    #[test]
    fn missing_prices_are_rejected_in_every_spelling() {
        for price in ["", "NaN", "nan", "inf", "-inf"] {
            let csv = format!("Year,US_State,Residential Price\n2020,CA,10.0\n2020,CA,{price}\n");
            match parse_csv(csv.as_bytes()) {
                Err(LoadError::InvalidValue { row, column, .. }) => {
                    assert_eq!(row, 2, "{price:?}");
                    assert_eq!(column, "Residential Price");
                }
                other => panic!("{price:?} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn first_data_row_is_row_one() {
        let csv = "Year,US_State,Residential Price\n,CA,1.0\n";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(LoadError::InvalidValue { row: 1, column: "Year", .. })
        ));
    }

    #[test]
    fn unreachable_url_is_fetch_error() {
        let source = DataSource::Url("http://127.0.0.1:1/x.csv".into());
        let options = FetchOptions {
            timeout: Duration::from_secs(2),
        };
        let err = load_source(&source, &options).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { ref url, .. } if url == "http://127.0.0.1:1/x.csv"));
    }

    #[test]
    fn ragged_csv_is_malformed() {
        let csv = "Year,US_State,Residential Price\n2020,CA\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn header_only_csv_is_empty() {
        let csv = "Year,US_State,Residential Price\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(LoadError::Empty)));
    }

    #[test]
    fn json_records() {
        let json = r#"[
            {"Year": 2019, "US_State": "NY", "Residential Price": 17.5, "Note": "a"},
            {"Year": 2020, "US_State": "NY", "Residential Price": 18.0}
        ]"#;
        let ds = parse_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.columns, vec!["Year", "US_State", "Residential Price", "Note"]);
        assert_eq!(ds.records[1].cells[3], CellValue::Null);
        assert_eq!((ds.year_min, ds.year_max), (2019, 2020));
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(matches!(parse_json("{}"), Err(LoadError::Structure(_))));
    }

    #[test]
    fn data_source_parsing() {
        assert_eq!(
            DataSource::parse("https://example.com/a.csv"),
            DataSource::Url("https://example.com/a.csv".into())
        );
        assert_eq!(
            DataSource::parse("data/prices.csv"),
            DataSource::File(PathBuf::from("data/prices.csv"))
        );
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("prices.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn csv_file_through_load_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, CSV).unwrap();
        let ds = load_source(&DataSource::File(path), &FetchOptions::default()).unwrap();
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn parquet_file() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Year", DataType::Int64, false),
            Field::new("US_State", DataType::Utf8, false),
            Field::new("Residential Price", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![2020, 2021])),
                Arc::new(StringArray::from(vec!["WA", "WA"])),
                Arc::new(Float64Array::from(vec![9.5, 10.5])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.columns, vec!["Year", "US_State", "Residential Price"]);
        assert_eq!(ds.records[1].year, 2021);
        assert_eq!(ds.records[1].residential_price, 10.5);
    }
}
