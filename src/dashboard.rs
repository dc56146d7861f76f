//! The reactive pipeline: `(dataset, selection) → seven chart specifications`.
//!
//! Every function here is pure. Callers recompute the whole dashboard on each
//! filter change; nothing is cached between passes.

use serde::Serialize;

use crate::charts::aggregate::{histogram, hierarchy, top_n, value_counts};
use crate::charts::{
    Bar, BarSeries, ChartId, ChartKind, ChartSpec, HistogramSeries, Orientation, PieSeries,
    Slice,
};
use crate::color::ColorScale;
use crate::config::ChartLimits;
use crate::data::filter::{FilterSelection, FilteredView};
use crate::data::model::{Column, FleetDataset, VehicleRecord};
use crate::insights::Insights;

/// Render the seven charts with the default limits.
pub fn render(dataset: &FleetDataset, selection: &FilterSelection) -> Vec<ChartSpec> {
    render_with(dataset, selection, &ChartLimits::default())
}

/// Render the seven charts, in [`ChartId::ALL`] order.
pub fn render_with(
    dataset: &FleetDataset,
    selection: &FilterSelection,
    limits: &ChartLimits,
) -> Vec<ChartSpec> {
    let view = FilteredView::new(dataset, selection);
    charts_for(&view, limits)
}

fn charts_for(view: &FilteredView<'_>, limits: &ChartLimits) -> Vec<ChartSpec> {
    ChartId::ALL
        .iter()
        .map(|&id| build_chart(id, view, limits))
        .collect()
}

/// Build a single chart from a filtered view.
pub fn build_chart(id: ChartId, view: &FilteredView<'_>, limits: &ChartLimits) -> ChartSpec {
    match id {
        ChartId::TypeFuelComposition => ChartSpec {
            id,
            title: "Fleet Composition by Type & Fuel".to_string(),
            kind: ChartKind::Treemap(hierarchy(
                view.iter(),
                &[Column::VehicleType, Column::FuelSource],
            )),
        },
        ChartId::StatusFuelDistribution => ChartSpec {
            id,
            title: "Operational Status & Fuel Distribution".to_string(),
            kind: ChartKind::Sunburst(hierarchy(
                view.iter(),
                &[Column::Status, Column::FuelSource],
            )),
        },
        ChartId::TopCompanies => ChartSpec {
            id,
            title: format!("Top {} Fleet Operators", limits.top_companies),
            kind: ChartKind::Bar(ranked_bars(
                view,
                Column::CompanyName,
                limits.top_companies,
                Orientation::Horizontal,
                false,
            )),
        },
        ChartId::WheelchairAccess => ChartSpec {
            id,
            title: "Wheelchair Accessibility".to_string(),
            kind: ChartKind::Pie(proportions(view.iter(), Column::WheelchairAccessible, 0.4)),
        },
        ChartId::AgeDistribution => ChartSpec {
            id,
            title: "Vehicle Age Distribution".to_string(),
            kind: ChartKind::Histogram(HistogramSeries {
                axis: Column::ModelYear.header().to_string(),
                bins: histogram(view.iter().filter_map(|r| r.model_year), limits.histogram_bins),
            }),
        },
        ChartId::TopMakes => ChartSpec {
            id,
            title: format!("Top {} Vehicle Makes", limits.top_makes),
            kind: ChartKind::Bar(ranked_bars(
                view,
                Column::Make,
                limits.top_makes,
                Orientation::Vertical,
                true,
            )),
        },
        ChartId::TopModels => ChartSpec {
            id,
            title: format!("Top {} Vehicle Models", limits.top_models),
            kind: ChartKind::Bar(ranked_bars(
                view,
                Column::Model,
                limits.top_models,
                Orientation::Vertical,
                true,
            )),
        },
    }
}

fn ranked_bars(
    view: &FilteredView<'_>,
    column: Column,
    n: usize,
    orientation: Orientation,
    color_by_count: bool,
) -> BarSeries {
    let ranked = top_n(view.iter().map(|r| r.category(column)), n);
    let color_scale = if color_by_count {
        ColorScale::spanning(ranked.iter().map(|(_, count)| *count as f64))
    } else {
        None
    };

    let bars = ranked
        .into_iter()
        .map(|(label, count)| Bar {
            label,
            count,
            color: color_scale.map(|scale| scale.color_for(count as f64)),
        })
        .collect();

    BarSeries {
        orientation,
        category_axis: column.header().to_string(),
        value_axis: "count".to_string(),
        bars,
        color_scale,
    }
}

fn proportions<'a>(
    records: impl IntoIterator<Item = &'a VehicleRecord>,
    column: Column,
    hole: f64,
) -> PieSeries {
    let counts = value_counts(records.into_iter().map(|r| r.category(column)));
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let slices = counts
        .into_iter()
        .map(|(label, count)| Slice {
            label,
            count,
            fraction: count as f64 / total as f64,
        })
        .collect();
    PieSeries { hole, slices }
}

// ---------------------------------------------------------------------------
// Dashboard – one complete render pass
// ---------------------------------------------------------------------------

/// Everything a surface shows after a filter change.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub selection: FilterSelection,
    pub visible: usize,
    pub total: usize,
    pub charts: Vec<ChartSpec>,
    pub insights: Insights,
    /// `insights` rendered as sentences; both surfaces show these verbatim.
    pub highlights: Vec<String>,
}

impl Dashboard {
    pub fn build(dataset: &FleetDataset, selection: &FilterSelection, limits: &ChartLimits) -> Self {
        let view = FilteredView::new(dataset, selection);
        let insights = Insights::compute(view.iter());
        let dashboard = Dashboard {
            selection: selection.clone(),
            visible: view.len(),
            total: dataset.len(),
            charts: charts_for(&view, limits),
            highlights: insights.lines(),
            insights,
        };
        log::debug!(
            "Rendered dashboard: {} of {} vehicles visible",
            dashboard.visible,
            dashboard.total
        );
        dashboard
    }

    pub fn chart(&self, id: ChartId) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.id == id)
    }
}
