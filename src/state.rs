use std::sync::Arc;

use crate::config::{ChartLimits, DashboardConfig};
use crate::dashboard::Dashboard;
use crate::data::filter::FilterSelection;
use crate::data::model::FleetDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, shared and never mutated.
    pub dataset: Arc<FleetDataset>,

    /// Current filter controls.
    pub selection: FilterSelection,

    /// Result of the last render pass.
    pub dashboard: Dashboard,

    /// Selection restored by [`AppState::reset`].
    initial: FilterSelection,

    limits: ChartLimits,
}

impl AppState {
    pub fn new(dataset: Arc<FleetDataset>, config: &DashboardConfig) -> Self {
        let initial =
            FilterSelection::initial(&dataset, &config.default_types, &config.default_fuels);
        let dashboard = Dashboard::build(&dataset, &initial, &config.limits);
        Self {
            dataset,
            selection: initial.clone(),
            dashboard,
            initial,
            limits: config.limits,
        }
    }

    /// Recompute the dashboard from the current selection.
    pub fn refresh(&mut self) {
        self.dashboard = Dashboard::build(&self.dataset, &self.selection, &self.limits);
    }

    /// Toggle a single vehicle type.
    pub fn toggle_type(&mut self, value: &str) {
        toggle(&mut self.selection.vehicle_types, value);
        self.refresh();
    }

    /// Toggle a single fuel source.
    pub fn toggle_fuel(&mut self, value: &str) {
        toggle(&mut self.selection.fuel_sources, value);
        self.refresh();
    }

    pub fn select_all_types(&mut self) {
        self.selection.vehicle_types = self.dataset.vehicle_types().iter().cloned().collect();
        self.refresh();
    }

    pub fn select_no_types(&mut self) {
        self.selection.vehicle_types.clear();
        self.refresh();
    }

    pub fn select_all_fuels(&mut self) {
        self.selection.fuel_sources = self.dataset.fuel_sources().iter().cloned().collect();
        self.refresh();
    }

    pub fn select_no_fuels(&mut self) {
        self.selection.fuel_sources.clear();
        self.refresh();
    }

    /// Move the lower year handle. The upper handle is pushed along so the
    /// slider never crosses itself.
    pub fn set_year_min(&mut self, year: i32) {
        self.selection.year_range.min = year;
        if self.selection.year_range.max < year {
            self.selection.year_range.max = year;
        }
        self.refresh();
    }

    /// Move the upper year handle, pushing the lower one if needed.
    pub fn set_year_max(&mut self, year: i32) {
        self.selection.year_range.max = year;
        if self.selection.year_range.min > year {
            self.selection.year_range.min = year;
        }
        self.refresh();
    }

    /// Restore the selection the dashboard opened with.
    pub fn reset(&mut self) {
        self.selection = self.initial.clone();
        self.refresh();
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}
