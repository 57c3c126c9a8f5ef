use std::collections::BTreeMap;

use super::model::{Dataset, ElectricityRecord, YearRange};

// ---------------------------------------------------------------------------
// Map aggregation: mean residential price per state
// ---------------------------------------------------------------------------

/// Mean residential price per state over a year range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateAverages {
    /// state → (mean price, number of rows averaged)
    means: BTreeMap<String, (f64, usize)>,
}

impl StateAverages {
    pub fn get(&self, state: &str) -> Option<f64> {
        self.means.get(state).map(|(mean, _)| *mean)
    }

    pub fn row_count(&self, state: &str) -> usize {
        self.means.get(state).map(|(_, n)| *n).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.means.iter().map(|(s, (mean, _))| (s.as_str(), *mean))
    }

    pub fn min(&self) -> Option<f64> {
        self.iter().map(|(_, v)| v).reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.iter().map(|(_, v)| v).reduce(f64::max)
    }
}

/// Group the records inside `years` by state and average their residential
/// price. An empty or inverted range yields an empty result.
pub fn average_price_by_state(dataset: &Dataset, years: YearRange) -> StateAverages {
    if years.is_empty() {
        return StateAverages::default();
    }
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for rec in dataset.records.iter().filter(|r| years.contains(r.year)) {
        let entry = sums.entry(rec.state.as_str()).or_insert((0.0, 0));
        entry.0 += rec.residential_price;
        entry.1 += 1;
    }

    let means = sums
        .into_iter()
        .map(|(state, (sum, n))| (state.to_string(), (sum / n as f64, n)))
        .collect();
    StateAverages { means }
}

// ---------------------------------------------------------------------------
// Table detail: raw rows of one state
// ---------------------------------------------------------------------------

/// Rows of `state` inside `years`, in source order. No state selected means
/// no rows.
pub fn state_detail_rows<'a>(
    dataset: &'a Dataset,
    state: Option<&str>,
    years: YearRange,
) -> Vec<&'a ElectricityRecord> {
    let Some(state) = state.filter(|_| !years.is_empty()) else {
        return Vec::new();
    };
    dataset
        .records
        .iter()
        .filter(|r| years.contains(r.year) && r.state == state)
        .collect()
}

// ---------------------------------------------------------------------------
// Trend: yearly mean for one state
// ---------------------------------------------------------------------------

/// Mean residential price of `state` for each year in `years`, ascending by
/// year. Years without rows are skipped.
pub fn yearly_average_for_state(dataset: &Dataset, state: &str, years: YearRange) -> Vec<(i64, f64)> {
    let mut sums: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for rec in state_detail_rows(dataset, Some(state), years) {
        let entry = sums.entry(rec.year).or_insert((0.0, 0));
        entry.0 += rec.residential_price;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(year, (sum, n))| (year, sum / n as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    const EPS: f64 = 1e-9;

    fn record(year: i64, state: &str, price: f64) -> ElectricityRecord {
        ElectricityRecord {
            year,
            state: state.to_string(),
            residential_price: price,
            cells: vec![
                CellValue::Integer(year),
                CellValue::String(state.to_string()),
                CellValue::Float(price),
            ],
        }
    }

    fn dataset(records: Vec<ElectricityRecord>) -> Dataset {
        let columns = vec!["Year".into(), "US_State".into(), "Residential Price".into()];
        Dataset::from_records(columns, records).unwrap()
    }

    fn fixture() -> Dataset {
        dataset(vec![
            record(2020, "CA", 10.0),
            record(2020, "CA", 20.0),
            record(2021, "CA", 30.0),
        ])
    }

    fn mixed() -> Dataset {
        dataset(vec![
            record(2018, "TX", 9.0),
            record(2019, "CA", 16.0),
            record(2019, "TX", 11.0),
            record(2020, "CA", 18.0),
            record(2020, "NY", 17.5),
            record(2021, "TX", 100.0),
            record(2021, "NY", 18.5),
        ])
    }

    #[test]
    fn mean_of_single_year() {
        let avg = average_price_by_state(&fixture(), YearRange::new(2020, 2020));
        assert_eq!(avg.len(), 1);
        assert!((avg.get("CA").unwrap() - 15.0).abs() < EPS);
        assert_eq!(avg.row_count("CA"), 2);
    }

    #[test]
    fn mean_over_full_range() {
        let ds = fixture();
        let avg = average_price_by_state(&ds, ds.full_range());
        assert!((avg.get("CA").unwrap() - 20.0).abs() < EPS);
    }

    #[test]
    fn rows_outside_range_do_not_influence_means() {
        let ds = mixed();
        let avg = average_price_by_state(&ds, YearRange::new(2019, 2020));
        assert!((avg.get("CA").unwrap() - 17.0).abs() < EPS);
        assert!((avg.get("TX").unwrap() - 11.0).abs() < EPS);
        assert!((avg.get("NY").unwrap() - 17.5).abs() < EPS);
        assert_eq!(avg.len(), 3);
    }

    #[test]
    fn means_match_manual_computation_per_state() {
        let ds = mixed();
        let years = YearRange::new(2018, 2021);
        let avg = average_price_by_state(&ds, years);
        for (state, mean) in avg.iter() {
            let prices: Vec<f64> = ds
                .records
                .iter()
                .filter(|r| r.state == state && years.contains(r.year))
                .map(|r| r.residential_price)
                .collect();
            let expected = prices.iter().sum::<f64>() / prices.len() as f64;
            assert!((mean - expected).abs() < EPS, "{state}: {mean} != {expected}");
        }
    }

    #[test]
    fn aggregation_is_idempotent() {
        let ds = mixed();
        let years = YearRange::new(2019, 2021);
        assert_eq!(
            average_price_by_state(&ds, years),
            average_price_by_state(&ds, years)
        );
    }

    #[test]
    fn min_and_max_of_means() {
        let ds = mixed();
        let avg = average_price_by_state(&ds, YearRange::new(2019, 2020));
        assert_eq!(avg.min(), Some(11.0));
        assert_eq!(avg.max(), Some(17.5));
        assert_eq!(StateAverages::default().min(), None);
    }

    #[test]
    fn no_clicked_state_yields_no_rows() {
        let ds = mixed();
        assert!(state_detail_rows(&ds, None, ds.full_range()).is_empty());
        assert!(state_detail_rows(&ds, None, YearRange::new(2020, 2020)).is_empty());
        assert!(state_detail_rows(&ds, None, YearRange::new(2030, 2010)).is_empty());
    }

    #[test]
    fn detail_rows_for_clicked_state() {
        let ds = fixture();
        let rows = state_detail_rows(&ds, Some("CA"), YearRange::new(2021, 2021));
        assert_eq!(rows, vec![&record(2021, "CA", 30.0)]);
    }

    #[test]
    fn detail_rows_keep_source_order() {
        let ds = mixed();
        let rows = state_detail_rows(&ds, Some("TX"), ds.full_range());
        let years: Vec<i64> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2018, 2019, 2021]);
    }

    #[test]
    fn detail_rows_for_unknown_state_are_empty() {
        let ds = mixed();
        assert!(state_detail_rows(&ds, Some("ZZ"), ds.full_range()).is_empty());
    }

    #[test]
    fn range_past_year_max_is_empty() {
        let ds = mixed();
        let past = YearRange::new(ds.year_max + 1, ds.year_max + 1);
        assert!(average_price_by_state(&ds, past).is_empty());
        for state in ["CA", "TX", "NY"] {
            assert!(state_detail_rows(&ds, Some(state), past).is_empty());
        }
    }

    #[test]
    fn inverted_range_is_empty() {
        let ds = mixed();
        let inverted = YearRange::new(2021, 2018);
        assert!(average_price_by_state(&ds, inverted).is_empty());
        assert!(state_detail_rows(&ds, Some("TX"), inverted).is_empty());
        assert!(yearly_average_for_state(&ds, "TX", inverted).is_empty());
    }

    #[test]
    fn yearly_average_is_sorted_by_year() {
        let ds = dataset(vec![
            record(2021, "CA", 30.0),
            record(2020, "CA", 10.0),
            record(2020, "CA", 20.0),
            record(2020, "NY", 99.0),
        ]);
        let trend = yearly_average_for_state(&ds, "CA", ds.full_range());
        assert_eq!(trend, vec![(2020, 15.0), (2021, 30.0)]);
    }
}
