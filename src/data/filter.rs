use serde::Serialize;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Selection – one user interaction's worth of filter inputs
// ---------------------------------------------------------------------------

/// Inclusive year interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSpan {
    pub min: i32,
    pub max: i32,
}

impl YearSpan {
    /// Build a span, swapping the ends if they arrive reversed.
    pub fn new(a: i32, b: i32) -> Self {
        YearSpan {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// Make / model / year filter. Every field is optional and an absent field
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub make: Option<String>,
    pub model: Option<String>,
    pub years: Option<YearSpan>,
}

impl Selection {
    pub fn new(make: Option<&str>, model: Option<&str>, years: Option<YearSpan>) -> Self {
        Selection {
            make: present(make).map(str::to_string),
            model: present(model).map(str::to_string),
            years,
        }
    }

    /// Apply every present predicate in turn. Make and model compare exactly,
    /// case-sensitive.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(make) = &self.make {
            if record.make != *make {
                return false;
            }
        }
        if let Some(model) = &self.model {
            if record.model != *model {
                return false;
            }
        }
        if let Some(years) = &self.years {
            if !years.contains(record.year) {
                return false;
            }
        }
        true
    }
}

/// Treat an empty string the same as no choice at all.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Return indices of records that pass the selection, in dataset order.
pub fn filtered_indices(dataset: &Dataset, selection: &Selection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::sample_dataset;

    #[test]
    fn empty_selection_matches_everything() {
        let ds = sample_dataset();
        let idx = filtered_indices(&ds, &Selection::default());
        assert_eq!(idx, (0..ds.len()).collect::<Vec<_>>());
    }

    #[test]
    fn empty_strings_are_absent() {
        let sel = Selection::new(Some(""), Some(""), None);
        assert_eq!(sel, Selection::default());
    }

    #[test]
    fn predicates_compose() {
        let ds = sample_dataset();
        let sel = Selection::new(Some("Toyota"), Some("Camry"), Some(YearSpan::new(2016, 2016)));
        assert_eq!(filtered_indices(&ds, &sel), [1]);

        let model_only = Selection::new(None, Some("Civic"), None);
        assert_eq!(filtered_indices(&ds, &model_only), [2]);
    }

    #[test]
    fn make_match_is_case_sensitive() {
        let ds = sample_dataset();
        let sel = Selection::new(Some("toyota"), None, None);
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn year_span_is_inclusive_and_ordered() {
        let span = YearSpan::new(2016, 2014);
        assert_eq!(span, YearSpan { min: 2014, max: 2016 });
        assert!(span.contains(2014));
        assert!(span.contains(2016));
        assert!(!span.contains(2017));
    }
}
