use std::collections::BTreeSet;

use crate::chart::ChartSpec;
use crate::data::filter::{present, YearSpan};
use crate::data::model::Dataset;
use crate::data::options::{model_options, year_range, YearBounds};
use crate::views::{
    body_style_frequency, monthly_frequency, odometer_scatter, scatter_by_return, SelectionField,
    ViewId,
};

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// Current value of every selection widget. Empty strings are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selections {
    pub make: Option<String>,
    pub model: Option<String>,
    pub years: Option<YearSpan>,
    pub month_make: Option<String>,
    pub odometer_make: Option<String>,
    pub odometer_model: Option<String>,
    pub body_make: Option<String>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Cleaned dataset, fixed for the life of the process.
    pub dataset: Dataset,

    pub selections: Selections,

    /// Make choices shared by every make dropdown.
    pub make_options: Vec<(String, String)>,

    // Resolver outputs, refreshed by `settle`.
    pub model_options: Vec<(String, String)>,
    pub year_bounds: Option<YearBounds>,
    pub profit_chart: ChartSpec,
    pub month_chart: Option<ChartSpec>,
    pub odometer_model_options: Vec<(String, String)>,
    pub odometer_chart: ChartSpec,
    pub body_chart: Option<ChartSpec>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Selection inputs changed since the last `settle`.
    changed: BTreeSet<SelectionField>,
}

impl AppState {
    /// Resolve every view once for the initial, empty selection.
    pub fn new(dataset: Dataset) -> Self {
        let year_bounds = year_range(&dataset, None, None);
        let years = year_bounds.as_ref().map(YearBounds::span);
        let profit_chart = scatter_by_return(&dataset, None, None, years);
        let odometer_chart = odometer_scatter(&dataset, None, None);

        Self {
            selections: Selections {
                years,
                ..Selections::default()
            },
            make_options: dataset.make_options(),
            model_options: Vec::new(),
            year_bounds,
            profit_chart,
            month_chart: None,
            odometer_model_options: Vec::new(),
            odometer_chart,
            body_chart: None,
            status_message: None,
            changed: BTreeSet::new(),
            dataset,
        }
    }

    fn mark(&mut self, field: SelectionField) {
        self.changed.insert(field);
    }

    /// Whether any selection changed since the last `settle`.
    pub fn is_dirty(&self) -> bool {
        !self.changed.is_empty()
    }

    // -- Setters: record the change, resolve later in `settle` --

    pub fn set_make(&mut self, make: Option<&str>) {
        let make = present(make).map(str::to_string);
        if self.selections.make == make {
            return;
        }
        self.selections.make = make;
        self.mark(SelectionField::Make);

        let offered = model_options(&self.dataset, self.selections.make.as_deref());
        if let Some(model) = &self.selections.model {
            if !offered.iter().any(|(value, _)| value == model) {
                self.selections.model = None;
                self.mark(SelectionField::Model);
            }
        }
    }

    pub fn set_model(&mut self, model: Option<&str>) {
        let model = present(model).map(str::to_string);
        if self.selections.model == model {
            return;
        }
        self.selections.model = model;
        self.mark(SelectionField::Model);
    }

    pub fn set_years(&mut self, years: YearSpan) {
        if self.selections.years == Some(years) {
            return;
        }
        self.selections.years = Some(years);
        self.mark(SelectionField::Years);
    }

    pub fn set_month_make(&mut self, make: Option<&str>) {
        let make = present(make).map(str::to_string);
        if self.selections.month_make == make {
            return;
        }
        self.selections.month_make = make;
        self.mark(SelectionField::MonthMake);
    }

    pub fn set_odometer_make(&mut self, make: Option<&str>) {
        let make = present(make).map(str::to_string);
        if self.selections.odometer_make == make {
            return;
        }
        self.selections.odometer_make = make;
        self.mark(SelectionField::OdometerMake);

        let offered = model_options(&self.dataset, self.selections.odometer_make.as_deref());
        if let Some(model) = &self.selections.odometer_model {
            if !offered.iter().any(|(value, _)| value == model) {
                self.selections.odometer_model = None;
                self.mark(SelectionField::OdometerModel);
            }
        }
    }

    pub fn set_odometer_model(&mut self, model: Option<&str>) {
        let model = present(model).map(str::to_string);
        if self.selections.odometer_model == model {
            return;
        }
        self.selections.odometer_model = model;
        self.mark(SelectionField::OdometerModel);
    }

    pub fn set_body_make(&mut self, make: Option<&str>) {
        let make = present(make).map(str::to_string);
        if self.selections.body_make == make {
            return;
        }
        self.selections.body_make = make;
        self.mark(SelectionField::BodyMake);
    }

    // -- Resolution --

    /// Recompute every view subscribed to a changed input, in dependency
    /// order, and return the views that were refreshed.
    pub fn settle(&mut self) -> Vec<ViewId> {
        let mut refreshed = Vec::new();
        for view in ViewId::ALL {
            // `recompute` may mark more fields (the slider resets the years),
            // so re-check the set on every step.
            if self.changed.iter().any(|f| view.reads(*f)) {
                self.recompute(view);
                refreshed.push(view);
            }
        }
        self.changed.clear();
        refreshed
    }

    fn recompute(&mut self, view: ViewId) {
        let ds = &self.dataset;
        let sel = &self.selections;
        match view {
            ViewId::ModelOptions => {
                self.model_options = model_options(ds, sel.make.as_deref());
            }
            ViewId::YearSlider => {
                self.year_bounds = year_range(ds, sel.make.as_deref(), sel.model.as_deref());
                let years = self.year_bounds.as_ref().map(YearBounds::span);
                if self.selections.years != years {
                    self.selections.years = years;
                    self.changed.insert(SelectionField::Years);
                }
            }
            ViewId::ProfitScatter => {
                self.profit_chart =
                    scatter_by_return(ds, sel.make.as_deref(), sel.model.as_deref(), sel.years);
            }
            ViewId::MonthHistogram => {
                self.month_chart = monthly_frequency(ds, sel.month_make.as_deref());
            }
            ViewId::OdometerModelOptions => {
                self.odometer_model_options = model_options(ds, sel.odometer_make.as_deref());
            }
            ViewId::OdometerScatter => {
                self.odometer_chart =
                    odometer_scatter(ds, sel.odometer_make.as_deref(), sel.odometer_model.as_deref());
            }
            ViewId::BodyHistogram => {
                self.body_chart = body_style_frequency(ds, sel.body_make.as_deref());
            }
        }
        log::debug!("Recomputed {view:?}");
    }

    /// Every chart currently on screen.
    pub fn charts(&self) -> Vec<&ChartSpec> {
        let mut charts = vec![&self.profit_chart];
        charts.extend(self.month_chart.as_ref());
        charts.push(&self.odometer_chart);
        charts.extend(self.body_chart.as_ref());
        charts
    }
}
