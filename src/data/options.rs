use std::collections::{BTreeMap, BTreeSet};

use super::filter::{filtered_indices, present, Selection, YearSpan};
use super::model::Dataset;

/// Distinct models sold under `make`, sorted.
///
/// An absent or empty make yields an empty set rather than matching every row.
pub fn models_for(dataset: &Dataset, make: Option<&str>) -> BTreeSet<String> {
    let Some(make) = present(make) else {
        return BTreeSet::new();
    };
    dataset
        .records()
        .iter()
        .filter(|r| r.make == make)
        .map(|r| r.model.clone())
        .collect()
}

/// [`models_for`] as `(value, label)` pairs for a dropdown.
pub fn model_options(dataset: &Dataset, make: Option<&str>) -> Vec<(String, String)> {
    models_for(dataset, make)
        .into_iter()
        .map(|m| (m.clone(), m))
        .collect()
}

/// Slider bounds plus one tick label per year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
    pub marks: BTreeMap<i32, String>,
}

impl YearBounds {
    pub fn span(&self) -> YearSpan {
        YearSpan::new(self.min, self.max)
    }
}

/// Year bounds for the current make/model choice.
///
/// Filters by make and model when both are given, by make alone when only the
/// make is given, and not at all otherwise. `None` when nothing matches.
pub fn year_range(dataset: &Dataset, make: Option<&str>, model: Option<&str>) -> Option<YearBounds> {
    let selection = match (present(make), present(model)) {
        (Some(make), Some(model)) => Selection::new(Some(make), Some(model), None),
        (Some(make), None) => Selection::new(Some(make), None, None),
        _ => Selection::default(),
    };

    let years = filtered_indices(dataset, &selection)
        .into_iter()
        .map(|i| dataset.record(i).year);
    let (min, max) = years.fold(None, |acc: Option<(i32, i32)>, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    })?;

    let marks = (min..=max).map(|y| (y, y.to_string())).collect();
    Some(YearBounds { min, max, marks })
}
