use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names the dashboard depends on
// ---------------------------------------------------------------------------

pub const YEAR_COLUMN: &str = "Year";
pub const STATE_COLUMN: &str = "US_State";
pub const RESIDENTIAL_PRICE_COLUMN: &str = "Residential Price";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, kept so that columns the dashboard does not
/// interpret are still shown verbatim in the detail table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw text cell.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ElectricityRecord – one row of the table
// ---------------------------------------------------------------------------

/// One row of the price table.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricityRecord {
    pub year: i64,
    /// Two-letter postal code, used as the map location key.
    pub state: String,
    pub residential_price: f64,
    /// Every column of the row, in [`Dataset::columns`] order.
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table. Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<ElectricityRecord>,
    pub year_min: i64,
    pub year_max: i64,
}

impl Dataset {
    /// Compute the year bounds. Returns `None` for an empty record list.
    pub fn from_records(columns: Vec<String>, records: Vec<ElectricityRecord>) -> Option<Self> {
        let year_min = records.iter().map(|r| r.year).min()?;
        let year_max = records.iter().map(|r| r.year).max()?;
        Some(Dataset {
            columns,
            records,
            year_min,
            year_max,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full year range of the data, the default slider selection.
    pub fn full_range(&self) -> YearRange {
        YearRange::new(self.year_min, self.year_max)
    }
}

// ---------------------------------------------------------------------------
// YearRange – inclusive year selection
// ---------------------------------------------------------------------------

/// Inclusive range of years. A range with `lo > hi` contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
    pub lo: i64,
    pub hi: i64,
}

impl YearRange {
    pub fn new(lo: i64, hi: i64) -> Self {
        YearRange { lo, hi }
    }

    pub fn contains(&self, year: i64) -> bool {
        self.lo <= year && year <= self.hi
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lo == self.hi {
            write!(f, "{}", self.lo)
        } else {
            write!(f, "{}–{}", self.lo, self.hi)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_cell_types() {
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("2020"), CellValue::Integer(2020));
        assert_eq!(CellValue::guess("12.5"), CellValue::Float(12.5));
        assert_eq!(CellValue::guess("true"), CellValue::Bool(true));
        assert_eq!(CellValue::guess("CA"), CellValue::String("CA".into()));
    }

    #[test]
    fn year_range_is_inclusive() {
        let r = YearRange::new(2001, 2003);
        assert!(r.contains(2001));
        assert!(r.contains(2003));
        assert!(!r.contains(2000));
        assert!(!r.contains(2004));
    }

    #[test]
    fn inverted_range_contains_nothing() {
        let r = YearRange::new(2005, 2001);
        assert!(r.is_empty());
        assert!(!(2000..2010).any(|y| r.contains(y)));
    }

    #[test]
    fn empty_record_list_has_no_bounds() {
        assert!(Dataset::from_records(vec!["Year".into()], Vec::new()).is_none());
    }

    #[test]
    fn loaded_dataset_is_never_empty() {
        let rec = ElectricityRecord {
            year: 2020,
            state: "CA".into(),
            residential_price: 10.0,
            cells: Vec::new(),
        };
        let ds = Dataset::from_records(Vec::new(), vec![rec]).unwrap();
        assert_eq!(ds.len(), 1);
        assert!(!ds.is_empty());
    }
}
