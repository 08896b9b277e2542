use std::path::Path;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, Ui};

use crate::chart::export_json;
use crate::data::filter::YearSpan;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dropdown helper
// ---------------------------------------------------------------------------

/// A combo box over `(value, label)` options plus a leading "none" entry.
///
/// Returns `Some(new_choice)` when the user picked something this frame.
fn choice(
    ui: &mut Ui,
    id: &str,
    placeholder: &str,
    current: Option<&str>,
    options: &[(String, String)],
) -> Option<Option<String>> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or(placeholder))
        .width(200.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), placeholder).clicked() {
                picked = Some(None);
            }
            for (value, label) in options {
                if ui
                    .selectable_label(current == Some(value.as_str()), label)
                    .clicked()
                {
                    picked = Some(Some(value.clone()));
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// Left side panel – profit/loss filters
// ---------------------------------------------------------------------------

/// Render the left filter panel driving the profit/loss scatter.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ui.strong("Make");
    let current = state.selections.make.clone();
    if let Some(make) = choice(ui, "make", "Any make", current.as_deref(), &state.make_options) {
        state.set_make(make.as_deref());
    }

    ui.strong("Model");
    let current = state.selections.model.clone();
    if let Some(model) = choice(ui, "model", "Any model", current.as_deref(), &state.model_options) {
        state.set_model(model.as_deref());
    }
    ui.separator();

    ui.strong("Year");
    let (Some(bounds), Some(span)) = (state.year_bounds.clone(), state.selections.years) else {
        ui.label("No years for this selection.");
        return;
    };

    let (mut lo, mut hi) = (span.min, span.max);
    ui.add(egui::Slider::new(&mut lo, bounds.min..=bounds.max).text("from"));
    ui.add(egui::Slider::new(&mut hi, bounds.min..=bounds.max).text("to"));
    if (lo, hi) != (span.min, span.max) {
        state.set_years(YearSpan::new(lo, hi));
    }

    // Tick labels, highlighting the selected span.
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (year, label) in &bounds.marks {
            let text = RichText::new(label).small();
            if span.contains(*year) {
                ui.label(text.strong());
            } else {
                ui.label(text.weak());
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Per-section controls (central panel)
// ---------------------------------------------------------------------------

pub fn odometer_controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let current = state.selections.odometer_make.clone();
        if let Some(make) = choice(ui, "odometer_make", "Choose a make", current.as_deref(), &state.make_options) {
            state.set_odometer_make(make.as_deref());
        }
        let current = state.selections.odometer_model.clone();
        if let Some(model) = choice(
            ui,
            "odometer_model",
            "Choose a model",
            current.as_deref(),
            &state.odometer_model_options,
        ) {
            state.set_odometer_model(model.as_deref());
        }
    });
}

pub fn month_controls(ui: &mut Ui, state: &mut AppState) {
    let current = state.selections.month_make.clone();
    if let Some(make) = choice(ui, "month_make", "Choose a make", current.as_deref(), &state.make_options) {
        state.set_month_make(make.as_deref());
    }
}

pub fn body_controls(ui: &mut Ui, state: &mut AppState) {
    let current = state.selections.body_make.clone();
    if let Some(make) = choice(ui, "body_make", "Choose a make", current.as_deref(), &state.make_options) {
        state.set_body_make(make.as_deref());
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} sales loaded, {} in the profit/loss view",
            state.dataset.len(),
            state.profit_chart.rows.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().weak_text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Export dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart specifications")
        .set_file_name("charts.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match write_export(&path, state) {
            Ok(count) => {
                log::info!("Exported {count} charts to {}", path.display());
                state.status_message = Some(format!("Exported {count} charts"));
            }
            Err(e) => {
                log::error!("Failed to export charts: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn write_export(path: &Path, state: &AppState) -> anyhow::Result<usize> {
    let charts = state.charts();
    let json = export_json(&charts, &state.dataset).context("serializing charts")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(charts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::sample_dataset;

    #[test]
    fn export_writes_every_visible_chart() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("charts.json");
        let mut state = AppState::new(sample_dataset());
        state.set_body_make(Some("Toyota"));
        state.settle();

        assert_eq!(write_export(&path, &state).unwrap(), 3);
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[2]["title"], "Frequency of Toyota Sales Based on Body Type");
        assert_eq!(value[2]["view"], "body_histogram");
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let state = AppState::new(sample_dataset());
        let err = write_export(&tmp.path().join("no/such/dir/charts.json"), &state).unwrap_err();
        assert!(format!("{err:#}").contains("writing"));
    }
}
