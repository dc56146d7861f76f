//! Declarative chart specifications.
//!
//! A [`ChartSpec`] carries everything a rendering layer needs (kind, data,
//! encoding) and nothing else. The desktop UI draws them with `egui_plot`, the
//! web page hands the JSON form to Plotly.js.

pub mod aggregate;

use serde::Serialize;

use crate::color::{ColorScale, Rgb};

/// Identifies one of the seven dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    TypeFuelComposition,
    StatusFuelDistribution,
    TopCompanies,
    WheelchairAccess,
    AgeDistribution,
    TopMakes,
    TopModels,
}

impl ChartId {
    /// Panels in display order.
    pub const ALL: [ChartId; 7] = [
        ChartId::TypeFuelComposition,
        ChartId::StatusFuelDistribution,
        ChartId::TopCompanies,
        ChartId::WheelchairAccess,
        ChartId::AgeDistribution,
        ChartId::TopMakes,
        ChartId::TopModels,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub title: String,
    #[serde(flatten)]
    pub kind: ChartKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartKind {
    Treemap(Hierarchy),
    Sunburst(Hierarchy),
    Bar(BarSeries),
    Pie(PieSeries),
    Histogram(HistogramSeries),
}

impl ChartSpec {
    /// Number of plotted data points. Zero means an empty chart.
    pub fn point_count(&self) -> usize {
        match &self.kind {
            ChartKind::Treemap(h) | ChartKind::Sunburst(h) => h.nodes.len(),
            ChartKind::Bar(b) => b.bars.len(),
            ChartKind::Pie(p) => p.slices.len(),
            ChartKind::Histogram(h) => h.bins.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}

// ---------------------------------------------------------------------------
// Hierarchy (treemap / sunburst)
// ---------------------------------------------------------------------------

/// Path counts over two or more categorical levels. Parents precede their
/// children and carry the sum of their children's values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hierarchy {
    pub levels: Vec<String>,
    pub nodes: Vec<HierarchyNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    /// `/`-joined path, e.g. `Taxi/Gasoline`. Each label is escaped first
    /// (`%` as `%25`, `/` as `%2F`) so ids are unique; `label` stays raw.
    pub id: String,
    pub label: String,
    pub parent: Option<String>,
    pub value: usize,
    pub depth: usize,
}

impl Hierarchy {
    pub fn roots(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter().filter(|n| n.parent.is_none())
    }

    pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a HierarchyNode> {
        self.nodes
            .iter()
            .filter(move |n| n.parent.as_deref() == Some(parent))
    }

    /// Sum of the root values, i.e. the number of counted records.
    pub fn total(&self) -> usize {
        self.roots().map(|n| n.value).sum()
    }
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub orientation: Orientation,
    pub category_axis: String,
    pub value_axis: String,
    /// Ranked, largest first.
    pub bars: Vec<Bar>,
    /// Present when bars are coloured by their count.
    pub color_scale: Option<ColorScale>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub count: usize,
    pub color: Option<Rgb>,
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSeries {
    /// Inner radius as a fraction of the outer radius (0 for a full pie).
    pub hole: f64,
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub axis: String,
    pub bins: Vec<Bin>,
}

/// Half-open `[start, end)`; the last bin of a series is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}
