use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{FleetDataset, VehicleRecord, YearRange};

// ---------------------------------------------------------------------------
// Filter predicate: selected types, fuels and model-year range
// ---------------------------------------------------------------------------

/// The current filter controls. An empty type or fuel set selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub vehicle_types: BTreeSet<String>,
    pub fuel_sources: BTreeSet<String>,
    pub year_range: YearRange,
}

impl FilterSelection {
    /// Every option selected, year range spanning the whole dataset.
    pub fn all(dataset: &FleetDataset) -> Self {
        FilterSelection {
            vehicle_types: dataset.vehicle_types().iter().cloned().collect(),
            fuel_sources: dataset.fuel_sources().iter().cloned().collect(),
            year_range: full_year_range(dataset),
        }
    }

    /// Preferred defaults intersected with the options present. A column whose
    /// intersection is empty falls back to all of its options.
    pub fn initial(
        dataset: &FleetDataset,
        preferred_types: &[String],
        preferred_fuels: &[String],
    ) -> Self {
        FilterSelection {
            vehicle_types: preferred_or_all(dataset.vehicle_types(), preferred_types),
            fuel_sources: preferred_or_all(dataset.fuel_sources(), preferred_fuels),
            year_range: full_year_range(dataset),
        }
    }

    /// Conjunctive predicate over type, fuel and model year.
    /// Blank cells never match.
    pub fn matches(&self, record: &VehicleRecord) -> bool {
        let type_ok = record
            .vehicle_type
            .as_ref()
            .is_some_and(|t| self.vehicle_types.contains(t));
        let fuel_ok = record
            .fuel_source
            .as_ref()
            .is_some_and(|f| self.fuel_sources.contains(f));
        let year_ok = record
            .model_year
            .is_some_and(|y| self.year_range.contains(y));
        type_ok && fuel_ok && year_ok
    }

    /// Whether the selection can only ever produce an empty view.
    pub fn is_vacant(&self) -> bool {
        self.vehicle_types.is_empty() || self.fuel_sources.is_empty() || self.year_range.is_inverted()
    }
}

fn full_year_range(dataset: &FleetDataset) -> YearRange {
    // A dataset without years gets an inverted range so nothing passes.
    dataset.year_bounds().unwrap_or(YearRange::new(1, 0))
}

fn preferred_or_all(options: &[String], preferred: &[String]) -> BTreeSet<String> {
    let picked: BTreeSet<String> = options
        .iter()
        .filter(|o| preferred.contains(*o))
        .cloned()
        .collect();
    if picked.is_empty() {
        options.iter().cloned().collect()
    } else {
        picked
    }
}

/// Return indices of vehicles that pass the selection, in dataset order.
pub fn filtered_indices(dataset: &FleetDataset, selection: &FilterSelection) -> Vec<usize> {
    if selection.is_vacant() {
        return Vec::new();
    }
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subset of the dataset
// ---------------------------------------------------------------------------

/// The vehicles passing a selection. Recomputed from scratch on every change.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a FleetDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a FleetDataset, selection: &FilterSelection) -> Self {
        FilteredView {
            dataset,
            indices: filtered_indices(dataset, selection),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a VehicleRecord> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(vehicle_type: &str, fuel: &str, year: i32) -> VehicleRecord {
        VehicleRecord {
            vehicle_type: Some(vehicle_type.to_string()),
            fuel_source: Some(fuel.to_string()),
            model_year: Some(year),
            ..Default::default()
        }
    }

    fn sample() -> FleetDataset {
        FleetDataset::from_records(vec![
            record("Taxi", "Gasoline", 2012),
            record("Taxi", "Hybrid", 2018),
            record("Pedicab", "Electric", 2021),
            record("Livery", "Gasoline", 2005),
            VehicleRecord {
                vehicle_type: Some("Taxi".into()),
                fuel_source: Some("Gasoline".into()),
                model_year: None,
                ..Default::default()
            },
        ])
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn conjunctive_predicate() {
        let ds = sample();
        let sel = FilterSelection {
            vehicle_types: set(&["Taxi"]),
            fuel_sources: set(&["Gasoline", "Hybrid"]),
            year_range: YearRange::new(2010, 2020),
        };
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 1]);
    }

    #[test]
    fn blank_year_never_matches() {
        let ds = sample();
        let sel = FilterSelection::all(&ds);
        assert!(!filtered_indices(&ds, &sel).contains(&4));
        assert_eq!(filtered_indices(&ds, &sel).len(), 4);
    }

    #[test]
    fn empty_sets_and_inverted_range_select_nothing() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.vehicle_types.clear();
        assert!(filtered_indices(&ds, &sel).is_empty());

        let mut sel = FilterSelection::all(&ds);
        sel.fuel_sources.clear();
        assert!(FilteredView::new(&ds, &sel).is_empty());

        let mut sel = FilterSelection::all(&ds);
        sel.year_range = YearRange::new(2020, 2010);
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn single_year_range() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.year_range = YearRange::new(2018, 2018);
        let view = FilteredView::new(&ds, &sel);
        assert_eq!(view.len(), 1);
        assert!(view.iter().all(|r| r.model_year == Some(2018)));
    }

    #[test]
    fn initial_selection_falls_back_to_all() {
        let ds = sample();
        let preferred_types = vec!["Taxi".to_string(), "Shuttle".to_string()];
        let preferred_fuels = vec!["Diesel".to_string()];
        let sel = FilterSelection::initial(&ds, &preferred_types, &preferred_fuels);
        assert_eq!(sel.vehicle_types, set(&["Taxi"]));
        assert_eq!(sel.fuel_sources, set(&["Gasoline", "Hybrid", "Electric"]));
        assert_eq!(sel.year_range, YearRange::new(2005, 2021));
    }

    #[test]
    fn dataset_without_years_selects_nothing() {
        let ds = FleetDataset::from_records(vec![VehicleRecord {
            vehicle_type: Some("Taxi".into()),
            fuel_source: Some("Gasoline".into()),
            ..Default::default()
        }]);
        let sel = FilterSelection::all(&ds);
        assert!(sel.is_vacant());
        assert!(filtered_indices(&ds, &sel).is_empty());
    }
}
