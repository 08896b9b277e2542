//! Chart resolvers and the table of which selection inputs each one reads.
//!
//! Every resolver is a pure function of the [`Dataset`] and the selection
//! values it subscribes to. [`crate::state::AppState`] uses
//! [`ViewId::subscriptions`] to recompute only what a change touches.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::chart::{ChartKind, ChartSpec, ColorEncoding, Field};
use crate::data::filter::{filtered_indices, present, Selection, YearSpan};
use crate::data::model::{Dataset, ReturnLabel};

pub const PROFIT_SCATTER_TITLE: &str = "View Car Year, Make, and Model Profit/Loss";
pub const ODOMETER_SCATTER_TITLE: &str = "Selling Price Compared to Odometer";

// ---------------------------------------------------------------------------
// Reactive wiring
// ---------------------------------------------------------------------------

/// One independent selection input on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SelectionField {
    /// Make choice above the profit/loss scatter.
    Make,
    /// Model choice above the profit/loss scatter.
    Model,
    /// Year range slider.
    Years,
    MonthMake,
    OdometerMake,
    OdometerModel,
    BodyMake,
}

/// One resolver output.
///
/// `ALL` is listed in dependency order: the year slider can rewrite the year
/// range, which the profit scatter then reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewId {
    ModelOptions,
    YearSlider,
    ProfitScatter,
    MonthHistogram,
    OdometerModelOptions,
    OdometerScatter,
    BodyHistogram,
}

impl ViewId {
    pub const ALL: [ViewId; 7] = [
        ViewId::ModelOptions,
        ViewId::YearSlider,
        ViewId::ProfitScatter,
        ViewId::MonthHistogram,
        ViewId::OdometerModelOptions,
        ViewId::OdometerScatter,
        ViewId::BodyHistogram,
    ];

    pub fn subscriptions(&self) -> &'static [SelectionField] {
        use SelectionField::*;
        match self {
            ViewId::ModelOptions => &[Make],
            ViewId::YearSlider => &[Make, Model],
            ViewId::ProfitScatter => &[Make, Model, Years],
            ViewId::MonthHistogram => &[MonthMake],
            ViewId::OdometerModelOptions => &[OdometerMake],
            ViewId::OdometerScatter => &[OdometerMake, OdometerModel],
            ViewId::BodyHistogram => &[BodyMake],
        }
    }

    pub fn reads(&self, field: SelectionField) -> bool {
        self.subscriptions().contains(&field)
    }
}

// ---------------------------------------------------------------------------
// Resolvers
// ---------------------------------------------------------------------------

/// `profit` → green, `loss` → red.
pub fn return_color_map() -> BTreeMap<String, String> {
    BTreeMap::from([
        (ReturnLabel::Profit.to_string(), "green".to_string()),
        (ReturnLabel::Loss.to_string(), "red".to_string()),
    ])
}

/// MMR against selling price, coloured by profit/loss.
///
/// Make and model narrow the rows only when present; with neither, the chart
/// covers every row in the year range. `years: None` keeps all years.
pub fn scatter_by_return(
    dataset: &Dataset,
    make: Option<&str>,
    model: Option<&str>,
    years: Option<YearSpan>,
) -> ChartSpec {
    let selection = Selection::new(make, model, years);
    ChartSpec {
        view: ViewId::ProfitScatter,
        kind: ChartKind::Scatter,
        rows: filtered_indices(dataset, &selection),
        x: Field::Mmr,
        y: Some(Field::SellingPrice),
        color: Some(ColorEncoding::Discrete {
            field: Field::Return,
            map: return_color_map(),
        }),
        title: PROFIT_SCATTER_TITLE.to_string(),
    }
}

fn make_histogram(
    dataset: &Dataset,
    view: ViewId,
    make: Option<&str>,
    x: Field,
    what: &str,
) -> Option<ChartSpec> {
    let make = present(make)?;
    let selection = Selection::new(Some(make), None, None);
    Some(ChartSpec {
        view,
        kind: ChartKind::Histogram,
        rows: filtered_indices(dataset, &selection),
        x,
        y: None,
        color: None,
        title: format!("Frequency of {make} Sales Based on {what}"),
    })
}

/// Sales per month for one make; `None` until a make is chosen.
pub fn monthly_frequency(dataset: &Dataset, make: Option<&str>) -> Option<ChartSpec> {
    make_histogram(dataset, ViewId::MonthHistogram, make, Field::Month, "Month")
}

/// Sales per body style for one make; `None` until a make is chosen.
pub fn body_style_frequency(dataset: &Dataset, make: Option<&str>) -> Option<ChartSpec> {
    make_histogram(dataset, ViewId::BodyHistogram, make, Field::Body, "Body Type")
}

/// Odometer against selling price for one make and model, coloured by year.
///
/// This view is per model: unless both make and model are chosen the chart
/// has no rows.
pub fn odometer_scatter(dataset: &Dataset, make: Option<&str>, model: Option<&str>) -> ChartSpec {
    let rows = match (present(make), present(model)) {
        (Some(make), Some(model)) => {
            filtered_indices(dataset, &Selection::new(Some(make), Some(model), None))
        }
        _ => Vec::new(),
    };
    ChartSpec {
        view: ViewId::OdometerScatter,
        kind: ChartKind::Scatter,
        rows,
        x: Field::Odometer,
        y: Some(Field::SellingPrice),
        color: Some(ColorEncoding::Continuous { field: Field::Year }),
        title: ODOMETER_SCATTER_TITLE.to_string(),
    }
}
