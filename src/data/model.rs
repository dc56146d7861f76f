use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column – the fixed set of source columns
// ---------------------------------------------------------------------------

/// The columns the dashboard reads from the joined vehicle table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    VehicleType,
    FuelSource,
    ModelYear,
    Status,
    CompanyName,
    WheelchairAccessible,
    Make,
    Model,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::VehicleType,
        Column::FuelSource,
        Column::ModelYear,
        Column::Status,
        Column::CompanyName,
        Column::WheelchairAccessible,
        Column::Make,
        Column::Model,
    ];

    /// Header name as it appears in the source file.
    pub fn header(self) -> &'static str {
        match self {
            Column::VehicleType => "Vehicle Type",
            Column::FuelSource => "Vehicle Fuel Source",
            Column::ModelYear => "Vehicle Model Year",
            Column::Status => "Status",
            Column::CompanyName => "Company Name",
            Column::WheelchairAccessible => "Wheelchair Accessible",
            Column::Make => "Vehicle Make",
            Column::Model => "Vehicle Model",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// YearRange – inclusive model-year interval
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` model-year range. Serialised as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// An inverted range (`min > max`) contains nothing.
    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

impl From<[i32; 2]> for YearRange {
    fn from([min, max]: [i32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<YearRange> for [i32; 2] {
    fn from(range: YearRange) -> Self {
        [range.min, range.max]
    }
}

// ---------------------------------------------------------------------------
// VehicleRecord – one row of the joined table
// ---------------------------------------------------------------------------

/// A single licensed vehicle. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VehicleRecord {
    pub vehicle_type: Option<String>,
    pub fuel_source: Option<String>,
    pub model_year: Option<i32>,
    pub status: Option<String>,
    pub company_name: Option<String>,
    pub wheelchair_accessible: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
}

impl VehicleRecord {
    /// Categorical value for `column`. `ModelYear` is numeric and always
    /// yields `None` here; use [`VehicleRecord::model_year`] instead.
    pub fn category(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::VehicleType => &self.vehicle_type,
            Column::FuelSource => &self.fuel_source,
            Column::Status => &self.status,
            Column::CompanyName => &self.company_name,
            Column::WheelchairAccessible => &self.wheelchair_accessible,
            Column::Make => &self.make,
            Column::Model => &self.model,
            Column::ModelYear => return None,
        };
        value.as_deref()
    }
}

// ---------------------------------------------------------------------------
// FleetDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The immutable vehicle table with pre-computed filter options.
#[derive(Debug, Clone, Default)]
pub struct FleetDataset {
    records: Vec<VehicleRecord>,
    vehicle_types: Vec<String>,
    fuel_sources: Vec<String>,
    year_bounds: Option<YearRange>,
}

impl FleetDataset {
    /// Build option lists and year bounds from the loaded records.
    pub fn from_records(records: Vec<VehicleRecord>) -> Self {
        let vehicle_types = distinct_values(&records, Column::VehicleType);
        let fuel_sources = distinct_values(&records, Column::FuelSource);
        let year_bounds = records
            .iter()
            .filter_map(|r| r.model_year)
            .fold(None, |acc: Option<YearRange>, year| match acc {
                None => Some(YearRange::new(year, year)),
                Some(range) => Some(YearRange::new(range.min.min(year), range.max.max(year))),
            });

        FleetDataset {
            records,
            vehicle_types,
            fuel_sources,
            year_bounds,
        }
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&VehicleRecord> {
        self.records.get(index)
    }

    /// Distinct non-blank values of a categorical column, in first-seen order.
    pub fn distinct(&self, column: Column) -> Vec<String> {
        match column {
            Column::VehicleType => self.vehicle_types.clone(),
            Column::FuelSource => self.fuel_sources.clone(),
            other => distinct_values(&self.records, other),
        }
    }

    /// Options for the vehicle-type selector.
    pub fn vehicle_types(&self) -> &[String] {
        &self.vehicle_types
    }

    /// Options for the fuel-source selector.
    pub fn fuel_sources(&self) -> &[String] {
        &self.fuel_sources
    }

    /// Smallest and largest model year, `None` if no record carries a year.
    pub fn year_bounds(&self) -> Option<YearRange> {
        self.year_bounds
    }

    /// Number of vehicles.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn distinct_values(records: &[VehicleRecord], column: Column) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.category(column))
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(vehicle_type: &str, fuel: &str, year: Option<i32>) -> VehicleRecord {
        VehicleRecord {
            vehicle_type: Some(vehicle_type.to_string()),
            fuel_source: Some(fuel.to_string()),
            model_year: year,
            ..Default::default()
        }
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let ds = FleetDataset::from_records(vec![
            record("Taxi", "Gasoline", Some(2015)),
            record("Pedicab", "Human", None),
            record("Taxi", "Hybrid", Some(2020)),
            record("Livery", "Gasoline", Some(2011)),
        ]);

        assert_eq!(ds.vehicle_types(), ["Taxi", "Pedicab", "Livery"]);
        assert_eq!(ds.fuel_sources(), ["Gasoline", "Human", "Hybrid"]);
        assert_eq!(ds.year_bounds(), Some(YearRange::new(2011, 2020)));
    }

    #[test]
    fn year_bounds_absent_without_years() {
        let ds = FleetDataset::from_records(vec![record("Taxi", "Gasoline", None)]);
        assert_eq!(ds.year_bounds(), None);
        assert!(FleetDataset::default().year_bounds().is_none());
    }

    #[test]
    fn year_range_serialises_as_pair() {
        let range = YearRange::new(1980, 2025);
        assert_eq!(serde_json::to_string(&range).unwrap(), "[1980,2025]");
        let back: YearRange = serde_json::from_str("[2001,1999]").unwrap();
        assert!(back.is_inverted());
        assert!(!back.contains(2000));
    }

    #[test]
    fn model_year_is_not_categorical() {
        let r = record("Taxi", "Gasoline", Some(2015));
        assert_eq!(r.category(Column::ModelYear), None);
        assert_eq!(r.category(Column::VehicleType), Some("Taxi"));
    }
}
