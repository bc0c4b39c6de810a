use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::CategoryColors;
use crate::data::chart::{ChartKind, Distribution, ScatterData};

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

pub fn scatter_plot(ui: &mut Ui, data: &ScatterData) {
    ui.heading(format!("{} vs {}", data.y_name, data.x_name));

    Plot::new("scatter_plot")
        .x_axis_label(data.x_name.clone())
        .y_axis_label(data.y_name.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let points: PlotPoints = data.points.clone().into();
            plot_ui.points(
                Points::new(points)
                    .radius(3.0)
                    .color(Color32::LIGHT_BLUE)
                    .name(&data.y_name),
            );
        });
}

// ---------------------------------------------------------------------------
// Distribution charts
// ---------------------------------------------------------------------------

pub fn distribution_chart(ui: &mut Ui, kind: ChartKind, data: &Distribution) {
    ui.heading(format!("Distribution of {}", data.column));
    match kind {
        ChartKind::Pie => pie_chart(ui, data),
        _ => bar_chart(ui, data),
    }
}

fn bar_chart(ui: &mut Ui, data: &Distribution) {
    let colors = CategoryColors::new(data.counts.iter().map(|(l, _)| l.as_str()));
    let bars: Vec<Bar> = data
        .counts
        .iter()
        .enumerate()
        .map(|(i, (label, n))| {
            Bar::new(i as f64, *n as f64)
                .name(label)
                .fill(colors.at(i))
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = data.counts.iter().map(|(l, _)| l.clone()).collect();
    Plot::new("bar_chart")
        .legend(Legend::default())
        .y_axis_label("Count")
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() < 1e-6 && i >= 0.0 {
                labels.get(i as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&data.column));
        });
}

/// Number of segments used to approximate a full circle.
const PIE_SEGMENTS: usize = 180;

fn pie_chart(ui: &mut Ui, data: &Distribution) {
    let colors = CategoryColors::new(data.counts.iter().map(|(l, _)| l.as_str()));
    let labels = data.percent_labels();
    let total = data.total() as f64;

    Plot::new("pie_chart")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for (i, ((_, n), label)) in data.counts.iter().zip(&labels).enumerate() {
                let sweep = *n as f64 / total * TAU;
                let steps = ((sweep / TAU) * PIE_SEGMENTS as f64).ceil().max(1.0) as usize;

                let mut outline = vec![[0.0, 0.0]];
                for s in 0..=steps {
                    let angle = start + sweep * s as f64 / steps as f64;
                    outline.push([angle.cos(), angle.sin()]);
                }
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(outline))
                        .fill_color(colors.at(i))
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(label),
                );

                let mid = start + sweep / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                    RichText::new(label).color(Color32::BLACK),
                ));
                start += sweep;
            }
        });
}
