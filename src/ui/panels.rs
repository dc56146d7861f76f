use std::sync::Arc;

use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // The option lists live in the shared dataset; hold our own handle so the
    // state can be mutated while we iterate them.
    let dataset = Arc::clone(&state.dataset);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Vehicle types ----
            let header = format!(
                "Vehicle Type  ({}/{})",
                state.selection.vehicle_types.len(),
                dataset.vehicle_types().len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("vehicle_type_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_types();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_types();
                        }
                    });
                    for value in dataset.vehicle_types() {
                        let mut checked = state.selection.vehicle_types.contains(value);
                        if ui.checkbox(&mut checked, value.as_str()).changed() {
                            state.toggle_type(value);
                        }
                    }
                });

            // ---- Fuel sources ----
            let header = format!(
                "Fuel Source  ({}/{})",
                state.selection.fuel_sources.len(),
                dataset.fuel_sources().len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("fuel_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_fuels();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_fuels();
                        }
                    });
                    for value in dataset.fuel_sources() {
                        let mut checked = state.selection.fuel_sources.contains(value);
                        if ui.checkbox(&mut checked, value.as_str()).changed() {
                            state.toggle_fuel(value);
                        }
                    }
                });

            ui.separator();

            // ---- Model year range ----
            ui.strong("Model Year");
            let Some(bounds) = dataset.year_bounds() else {
                ui.label("No model years in this dataset.");
                return;
            };
            let mut from = state.selection.year_range.min;
            if ui
                .add(egui::Slider::new(&mut from, bounds.min..=bounds.max).text("from"))
                .changed()
            {
                state.set_year_min(from);
            }
            let mut to = state.selection.year_range.max;
            if ui
                .add(egui::Slider::new(&mut to, bounds.min..=bounds.max).text("to"))
                .changed()
            {
                state.set_year_max(to);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with load/visible counts.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.heading("Illinois Public Passenger Vehicle Analytics");

        ui.separator();

        ui.label(format!(
            "{} vehicles loaded, {} visible",
            state.dashboard.total, state.dashboard.visible
        ));

        ui.separator();

        if ui.button("Reset filters").clicked() {
            state.reset();
        }
    });
}
