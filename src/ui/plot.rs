use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::chart::{ChartKind, ChartSpec, Field};
use crate::color::SeriesColors;
use crate::data::model::Dataset;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Chart rendering
// ---------------------------------------------------------------------------

/// Draw a chart, or `placeholder` when there is no chart for the current choice.
pub fn chart_view(ui: &mut Ui, spec: Option<&ChartSpec>, dataset: &Dataset, placeholder: &str) {
    let Some(spec) = spec else {
        ui.add_space(8.0);
        ui.weak(placeholder);
        return;
    };

    ui.strong(&spec.title);
    if spec.is_empty() {
        ui.add_space(8.0);
        ui.weak("No sales match this selection.");
        return;
    }

    match spec.kind {
        ChartKind::Scatter => scatter(ui, spec, dataset),
        ChartKind::Histogram => histogram(ui, spec, dataset),
    }
}

fn scatter(ui: &mut Ui, spec: &ChartSpec, dataset: &Dataset) {
    let y_field = spec.y.unwrap_or(Field::SellingPrice);
    let colors = SeriesColors::for_chart(spec, dataset);

    // One series per colour category so the legend lists each.
    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for &i in &spec.rows {
        let rec = dataset.record(i);
        let (Some(x), Some(y)) = (spec.x.number(rec), y_field.number(rec)) else {
            continue;
        };
        let key = spec
            .color
            .as_ref()
            .map(|c| c.field().key(rec))
            .unwrap_or_default();
        series.entry(key).or_default().push([x, y]);
    }

    Plot::new(spec.view)
        .legend(Legend::default())
        .x_axis_label(spec.x.label())
        .y_axis_label(y_field.label())
        .height(CHART_HEIGHT)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (key, pts) in series {
                let color = colors
                    .as_ref()
                    .map(|c| c.color_for(&key))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let points: PlotPoints = pts.into_iter().collect();
                plot_ui.points(Points::new(points).name(&key).color(color).radius(2.5));
            }
        });
}

fn histogram(ui: &mut Ui, spec: &ChartSpec, dataset: &Dataset) {
    let counts = spec.category_counts(dataset);
    let labels: Vec<String> = counts.iter().map(|(label, _)| label.clone()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (label, n))| Bar::new(i as f64, *n as f64).name(label).width(0.8))
        .collect();

    Plot::new(spec.view)
        .x_axis_label(spec.x.label())
        .y_axis_label("count")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(spec.x.label())
                    .color(Color32::from_rgb(99, 110, 250)),
            );
        });
}
