use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{BarChart, GridMark, Legend, Plot, PlotPoint, PlotUi, Polygon, Text};

use crate::charts::{BarSeries, ChartId, ChartKind, ChartSpec, Hierarchy, HistogramSeries, Orientation, PieSeries};
use crate::color::{generate_palette, lighten, Rgb};
use crate::dashboard::Dashboard;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;
const EMPTY_MESSAGE: &str = "No vehicles match the current filters";
const DEFAULT_BAR: Color32 = Color32::from_rgb(0x63, 0x6e, 0xfa);
/// Angular step used to break ring segments into convex pieces.
const ARC_STEP: f64 = TAU / 120.0;

fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the seven charts and the insights panel.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    let dashboard = &state.dashboard;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new("Interactive Dashboard for Fleet Management Insights").italics());
            ui.add_space(8.0);

            chart_row(
                ui,
                dashboard,
                &[ChartId::TypeFuelComposition, ChartId::StatusFuelDistribution],
            );
            chart_row(
                ui,
                dashboard,
                &[
                    ChartId::TopCompanies,
                    ChartId::WheelchairAccess,
                    ChartId::AgeDistribution,
                ],
            );
            chart_row(ui, dashboard, &[ChartId::TopMakes, ChartId::TopModels]);

            insights_panel(ui, &dashboard.highlights);
        });
}

fn chart_row(ui: &mut Ui, dashboard: &Dashboard, ids: &[ChartId]) {
    ui.columns(ids.len(), |columns: &mut [Ui]| {
        for (column, id) in columns.iter_mut().zip(ids) {
            if let Some(spec) = dashboard.chart(*id) {
                chart_panel(column, spec);
            }
        }
    });
    ui.add_space(8.0);
}

fn chart_panel(ui: &mut Ui, spec: &ChartSpec) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.strong(&spec.title);

        if spec.is_empty() {
            let size = egui::vec2(ui.available_width(), CHART_HEIGHT);
            ui.allocate_ui(size, |ui: &mut Ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.weak(EMPTY_MESSAGE);
                });
            });
            return;
        }

        let plot_id = format!("{:?}", spec.id);
        match &spec.kind {
            ChartKind::Treemap(h) => treemap_plot(ui, &plot_id, h),
            ChartKind::Sunburst(h) => sunburst_plot(ui, &plot_id, h),
            ChartKind::Bar(series) => bar_plot(ui, &plot_id, series),
            ChartKind::Pie(pie) => pie_plot(ui, &plot_id, pie),
            ChartKind::Histogram(hist) => histogram_plot(ui, &plot_id, hist),
        }
    });
}

fn insights_panel(ui: &mut Ui, lines: &[String]) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong("Key Insights:");
        if lines.is_empty() {
            ui.weak("No insights for the current filters.");
        }
        for line in lines {
            ui.label(format!("• {line}"));
        }
    });
}

// ---------------------------------------------------------------------------
// Bars and histogram
// ---------------------------------------------------------------------------

/// Axis formatter that prints category labels at integer positions.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

fn fixed_plot(id: &str) -> Plot {
    Plot::new(id.to_string())
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

fn bar_plot(ui: &mut Ui, id: &str, series: &BarSeries) {
    let n = series.bars.len();
    let horizontal = series.orientation == Orientation::Horizontal;

    // Horizontal charts put the largest bar on top.
    let position = |rank: usize| if horizontal { (n - 1 - rank) as f64 } else { rank as f64 };

    let mut labels = vec![String::new(); n];
    let bars: Vec<egui_plot::Bar> = series
        .bars
        .iter()
        .enumerate()
        .map(|(rank, bar)| {
            let pos = position(rank);
            labels[pos as usize] = bar.label.clone();
            egui_plot::Bar::new(pos, bar.count as f64)
                .name(&bar.label)
                .width(0.7)
                .fill(bar.color.map(to_color32).unwrap_or(DEFAULT_BAR))
        })
        .collect();

    let mut chart = BarChart::new(bars).name(&series.value_axis);
    if horizontal {
        chart = chart.horizontal();
    }

    let plot = fixed_plot(id).show_grid([!horizontal, horizontal]);
    let plot = if horizontal {
        plot.x_axis_label(series.value_axis.as_str())
            .y_axis_label(series.category_axis.as_str())
            .y_axis_formatter(category_formatter(labels))
    } else {
        plot.x_axis_label(series.category_axis.as_str())
            .y_axis_label(series.value_axis.as_str())
            .x_axis_formatter(category_formatter(labels))
    };

    plot.show(ui, |plot_ui: &mut PlotUi| {
        plot_ui.bar_chart(chart);
    });

    if let Some(scale) = series.color_scale {
        ui.horizontal(|ui: &mut Ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.small(format!("{:.0} ", scale.min));
            for c in scale.legend(24) {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(6.0, 10.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 0.0, to_color32(c));
            }
            ui.small(format!(" {:.0}", scale.max));
        });
    }
}

fn histogram_plot(ui: &mut Ui, id: &str, hist: &HistogramSeries) {
    let bars: Vec<egui_plot::Bar> = hist
        .bins
        .iter()
        .map(|bin| {
            egui_plot::Bar::new((bin.start + bin.end) / 2.0, bin.count as f64)
                .width(bin.end - bin.start)
                .name(format!("{:.1} – {:.1}", bin.start, bin.end))
                .fill(DEFAULT_BAR)
        })
        .collect();

    fixed_plot(id)
        .x_axis_label(hist.axis.as_str())
        .y_axis_label("count")
        .show(ui, |plot_ui: &mut PlotUi| {
            plot_ui.bar_chart(BarChart::new(bars).name("count"));
        });
}

// ---------------------------------------------------------------------------
// Pie, sunburst, treemap – drawn as filled polygons
// ---------------------------------------------------------------------------

fn shape_plot(id: &str) -> Plot {
    fixed_plot(id)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .legend(Legend::default())
}

/// A ring segment between radii `r0..r1` and angles `a0..a1`, split into
/// convex quads so each piece fills correctly.
fn ring_segment(r0: f64, r1: f64, a0: f64, a1: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = (((a1 - a0) / ARC_STEP).ceil() as usize).max(1);
    let da = (a1 - a0) / steps as f64;
    let point = |r: f64, a: f64| [r * a.cos(), r * a.sin()];
    (0..steps)
        .map(|i| {
            let s = a0 + i as f64 * da;
            let e = s + da;
            vec![point(r0, s), point(r1, s), point(r1, e), point(r0, e)]
        })
        .collect()
}

fn draw_segment(plot_ui: &mut PlotUi, name: &str, fill: Color32, pieces: Vec<Vec<[f64; 2]>>) {
    for piece in pieces {
        plot_ui.polygon(
            Polygon::new(piece)
                .name(name)
                .fill_color(fill)
                .stroke(Stroke::new(0.5, fill)),
        );
    }
}

/// Angles start at twelve o'clock and run clockwise.
fn angle(fraction: f64) -> f64 {
    TAU / 4.0 - fraction * TAU
}

fn label_at(plot_ui: &mut PlotUi, r: f64, a: f64, text: String) {
    plot_ui.text(Text::new(PlotPoint::new(r * a.cos(), r * a.sin()), RichText::new(text).small()));
}

fn pie_plot(ui: &mut Ui, id: &str, pie: &PieSeries) {
    let colours = generate_palette(pie.slices.len());
    shape_plot(id).show(ui, |plot_ui: &mut PlotUi| {
        let mut start = 0.0;
        for (slice, colour) in pie.slices.iter().zip(&colours) {
            let end = start + slice.fraction;
            let (a0, a1) = (angle(end), angle(start));
            draw_segment(
                plot_ui,
                &slice.label,
                to_color32(*colour),
                ring_segment(pie.hole, 1.0, a0, a1),
            );
            label_at(
                plot_ui,
                (1.0 + pie.hole) / 2.0,
                (a0 + a1) / 2.0,
                format!("{:.1}%", slice.fraction * 100.0),
            );
            start = end;
        }
    });
}

fn sunburst_plot(ui: &mut Ui, id: &str, h: &Hierarchy) {
    let total = h.total() as f64;
    let roots: Vec<_> = h.roots().collect();
    let colours = generate_palette(roots.len());

    shape_plot(id).show(ui, |plot_ui: &mut PlotUi| {
        let mut start = 0.0;
        for (root, colour) in roots.iter().zip(&colours) {
            let span = root.value as f64 / total;
            draw_segment(
                plot_ui,
                &root.label,
                to_color32(*colour),
                ring_segment(0.15, 0.55, angle(start + span), angle(start)),
            );
            label_at(plot_ui, 0.35, angle(start + span / 2.0), root.label.clone());

            let mut child_start = start;
            for (i, child) in h.children(&root.id).enumerate() {
                let child_span = child.value as f64 / total;
                let fill = lighten(*colour, 0.2 + 0.15 * (i % 4) as f32);
                draw_segment(
                    plot_ui,
                    &root.label,
                    to_color32(fill),
                    ring_segment(0.55, 1.0, angle(child_start + child_span), angle(child_start)),
                );
                if child_span > 0.03 {
                    label_at(
                        plot_ui,
                        0.78,
                        angle(child_start + child_span / 2.0),
                        child.label.clone(),
                    );
                }
                child_start += child_span;
            }
            start += span;
        }
    });
}

/// Slice-and-dice layout: roots split the width, children split their
/// root's height.
fn treemap_plot(ui: &mut Ui, id: &str, h: &Hierarchy) {
    let total = h.total() as f64;
    let roots: Vec<_> = h.roots().collect();
    let colours = generate_palette(roots.len());
    let rect = |x0: f64, y0: f64, x1: f64, y1: f64| vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]];

    fixed_plot(id)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .include_x(0.0)
        .include_x(1.0)
        .include_y(0.0)
        .include_y(1.0)
        .legend(Legend::default())
        .show(ui, |plot_ui: &mut PlotUi| {
            let mut x = 0.0;
            for (root, colour) in roots.iter().zip(&colours) {
                let w = root.value as f64 / total;
                let mut y = 1.0;
                for (i, child) in h.children(&root.id).enumerate() {
                    let ch = child.value as f64 / root.value as f64;
                    let fill = lighten(*colour, 0.1 * (i % 5) as f32);
                    plot_ui.polygon(
                        Polygon::new(rect(x, y - ch, x + w, y))
                            .name(&root.label)
                            .fill_color(to_color32(fill))
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                    if w > 0.05 && ch > 0.08 {
                        plot_ui.text(Text::new(
                            PlotPoint::new(x + w / 2.0, y - ch / 2.0),
                            RichText::new(format!("{}\n{}\n{}", root.label, child.label, child.value)).small(),
                        ));
                    }
                    y -= ch;
                }
                x += w;
            }
        });
}
