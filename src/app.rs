use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::model::Dataset;
use crate::state::AppState;
use crate::ui::{panels, plot};

pub const APP_TITLE: &str = "Car Salesman Information";
const SUBTITLE: &str = "The graphs below help car salesmen understand vehicle information \
                        when they are looking to sell a car";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CarLotApp {
    pub state: AppState,
}

impl CarLotApp {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for CarLotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: profit/loss filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard(ui, &mut self.state);
                });
        });

        // Resolve whatever the widgets changed, then draw the new charts.
        if self.state.is_dirty() {
            self.state.settle();
            ctx.request_repaint();
        }
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new(APP_TITLE).size(32.0).italics());
        ui.label(RichText::new(SUBTITLE).italics());
    });
    ui.separator();

    plot::chart_view(ui, Some(&state.profit_chart), &state.dataset, "No years to show.");
    ui.separator();

    ui.columns(2, |cols: &mut [Ui]| {
        panels::odometer_controls(&mut cols[0], state);
        let picked = state.selections.odometer_make.is_some() && state.selections.odometer_model.is_some();
        plot::chart_view(
            &mut cols[0],
            picked.then_some(&state.odometer_chart),
            &state.dataset,
            "Choose a make and model.",
        );

        panels::month_controls(&mut cols[1], state);
        plot::chart_view(
            &mut cols[1],
            state.month_chart.as_ref(),
            &state.dataset,
            "Choose a make to see sales by month.",
        );
    });
    ui.separator();

    panels::body_controls(ui, state);
    plot::chart_view(
        ui,
        state.body_chart.as_ref(),
        &state.dataset,
        "Choose a make to see sales by body type.",
    );
}
