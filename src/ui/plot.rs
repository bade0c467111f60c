use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

use crate::data::stats::Histogram;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Diagnostic plots (central panel)
// ---------------------------------------------------------------------------

/// Render the 2×2 grid of diagnostic plots in the central panel.
pub fn diagnostic_plots(ui: &mut Ui, state: &AppState) {
    let (Some(analysis), Some(histogram)) = (&state.analysis, &state.histogram) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view frame statistics  (File → Open…)");
        });
        return;
    };

    let render = &analysis.render;
    let colors = &state.colors;
    let markers = state.show_markers;

    let frames: Vec<f64> = render.frames.iter().map(|&f| f as f64).collect();

    // Leave room for the two title rows.
    let height = (ui.available_height() / 2.0 - 28.0).max(120.0);

    ui.columns(2, |cols: &mut [Ui]| {
        series_plot(
            &mut cols[0],
            &SeriesSpec {
                id: "angle_vs_time",
                title: "Slip Angle Over Time",
                x_label: "Absolute Time (s)",
                y_label: "Slip Angle (deg)",
                color: colors.angle_vs_time,
            },
            &render.t_absolute,
            &render.cleaned_angles,
            markers,
            height,
        );
        series_plot(
            &mut cols[1],
            &SeriesSpec {
                id: "angle_vs_frame",
                title: "Slip Angle vs. Frame",
                x_label: "Frame",
                y_label: "Slip Angle (deg)",
                color: colors.angle_vs_frame,
            },
            &frames,
            &render.cleaned_angles,
            markers,
            height,
        );
    });

    ui.columns(2, |cols: &mut [Ui]| {
        histogram_plot(&mut cols[0], histogram, colors.histogram, height);
        series_plot(
            &mut cols[1],
            &SeriesSpec {
                id: "delta_vs_frame",
                title: "Frame Processing Time (Δt)",
                x_label: "Frame",
                y_label: "Processing Time (s)",
                color: colors.delta_vs_frame,
            },
            &frames,
            render.deltas.values(),
            markers,
            height,
        );
    });
}

struct SeriesSpec {
    id: &'static str,
    title: &'static str,
    x_label: &'static str,
    y_label: &'static str,
    color: Color32,
}

/// Line plot of `y` against `x`, optionally with point markers.
fn series_plot(ui: &mut Ui, spec: &SeriesSpec, x: &[f64], y: &[f64], markers: bool, height: f32) {
    ui.strong(spec.title);

    let points: Vec<[f64; 2]> = x.iter().zip(y).map(|(&xi, &yi)| [xi, yi]).collect();

    Plot::new(spec.id)
        .height(height)
        .x_axis_label(spec.x_label)
        .y_axis_label(spec.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if markers {
                plot_ui.points(
                    Points::new(PlotPoints::new(points.clone()))
                        .color(spec.color)
                        .radius(2.5),
                );
            }
            plot_ui.line(
                Line::new(PlotPoints::new(points))
                    .color(spec.color)
                    .width(1.5),
            );
        });
}

/// Bar chart of the delta-time histogram.
fn histogram_plot(ui: &mut Ui, histogram: &Histogram, color: Color32, height: f32) {
    ui.strong("Distribution of Frame Processing Times");

    let width = histogram.bin_width();
    let bars: Vec<Bar> = histogram
        .bars()
        .map(|(center, count)| Bar::new(center, count as f64).width(width))
        .collect();

    Plot::new("delta_histogram")
        .height(height)
        .x_axis_label("Frame Processing Time (s)")
        .y_axis_label("Count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}
