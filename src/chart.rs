use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{Dataset, Record};
use crate::views::ViewId;

// ---------------------------------------------------------------------------
// Fields a chart can put on an axis or encode as colour
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Mmr,
    #[serde(rename = "sellingprice")]
    SellingPrice,
    Odometer,
    Year,
    Month,
    Body,
    Return,
}

/// A single cell read off a record for plotting.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl Field {
    /// Axis label, the same name the source file uses.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Mmr => "mmr",
            Field::SellingPrice => "sellingprice",
            Field::Odometer => "odometer",
            Field::Year => "year",
            Field::Month => "month",
            Field::Body => "body",
            Field::Return => "return",
        }
    }

    pub fn value(&self, record: &Record) -> FieldValue {
        match self {
            Field::Mmr => FieldValue::Number(record.mmr),
            Field::SellingPrice => FieldValue::Number(record.selling_price),
            Field::Odometer => FieldValue::Number(record.odometer),
            Field::Year => FieldValue::Number(record.year as f64),
            Field::Month => FieldValue::Text(record.month.to_string()),
            Field::Body => FieldValue::Text(record.body.clone()),
            Field::Return => FieldValue::Text(record.return_label.to_string()),
        }
    }

    /// Category key: the text itself, or the number's display form.
    pub fn key(&self, record: &Record) -> String {
        match self.value(record) {
            FieldValue::Text(s) => s,
            FieldValue::Number(v) => v.to_string(),
        }
    }

    /// Numeric reading, `None` for categorical fields.
    pub fn number(&self, record: &Record) -> Option<f64> {
        match self.value(record) {
            FieldValue::Number(v) => Some(v),
            FieldValue::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ChartSpec – what to draw, handed to the renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Histogram,
}

/// How points are coloured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColorEncoding {
    /// Category value → named colour (e.g. `"profit"` → `"green"`).
    Discrete {
        field: Field,
        map: BTreeMap<String, String>,
    },
    /// Numeric field mapped onto a colour ramp.
    Continuous { field: Field },
}

impl ColorEncoding {
    pub fn field(&self) -> Field {
        match self {
            ColorEncoding::Discrete { field, .. } | ColorEncoding::Continuous { field } => *field,
        }
    }
}

/// Declarative chart: kind, axes, colour encoding, title and the rows it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub view: ViewId,
    pub kind: ChartKind,
    /// Indices into the [`Dataset`], in dataset order.
    #[serde(skip)]
    pub rows: Vec<usize>,
    pub x: Field,
    pub y: Option<Field>,
    pub color: Option<ColorEncoding>,
    pub title: String,
}

impl ChartSpec {
    /// No rows matched; render the empty state.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bin counts for a histogram over a categorical `x`.
    ///
    /// Months come out in calendar order; other categories in the order they
    /// first appear.
    pub fn category_counts(&self, dataset: &Dataset) -> Vec<(String, usize)> {
        if self.x == Field::Month {
            let mut counts: BTreeMap<_, usize> = BTreeMap::new();
            for &i in &self.rows {
                *counts.entry(dataset.record(i).month).or_default() += 1;
            }
            return counts.into_iter().map(|(m, n)| (m.to_string(), n)).collect();
        }

        let mut counts: Vec<(String, usize)> = Vec::new();
        for &i in &self.rows {
            let key = self.x.key(dataset.record(i));
            match counts.iter_mut().find(|(k, _)| *k == key) {
                Some((_, n)) => *n += 1,
                None => counts.push((key, 1)),
            }
        }
        counts
    }
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChartExport<'a> {
    #[serde(flatten)]
    spec: &'a ChartSpec,
    rows: Vec<&'a Record>,
}

/// Pretty JSON for a set of charts with their rows materialised.
pub fn export_json(charts: &[&ChartSpec], dataset: &Dataset) -> serde_json::Result<String> {
    let exports: Vec<ChartExport<'_>> = charts
        .iter()
        .map(|&spec| ChartExport {
            spec,
            rows: spec.rows.iter().map(|&i| dataset.record(i)).collect(),
        })
        .collect();
    serde_json::to_string_pretty(&exports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::sample_dataset;

    fn histogram(x: Field, rows: Vec<usize>) -> ChartSpec {
        ChartSpec {
            view: ViewId::MonthHistogram,
            kind: ChartKind::Histogram,
            rows,
            x,
            y: None,
            color: None,
            title: "t".to_string(),
        }
    }

    #[test]
    fn month_counts_follow_calendar() {
        let ds = sample_dataset();
        let spec = histogram(Field::Month, (0..ds.len()).collect());
        assert_eq!(
            spec.category_counts(&ds),
            [
                ("Jan".to_string(), 2),
                ("Feb".to_string(), 1),
                ("Jun".to_string(), 1),
                ("Dec".to_string(), 2)
            ]
        );
    }

    #[test]
    fn body_counts_keep_first_seen_order() {
        let ds = sample_dataset();
        let spec = histogram(Field::Body, vec![3, 0, 1, 4]);
        assert_eq!(
            spec.category_counts(&ds),
            [
                ("SUV".to_string(), 1),
                ("Sedan".to_string(), 2),
                ("Coupe".to_string(), 1)
            ]
        );
    }

    #[test]
    fn field_values() {
        let ds = sample_dataset();
        let rec = ds.record(0);
        assert_eq!(Field::Mmr.number(rec), Some(10000.0));
        assert_eq!(Field::Year.number(rec), Some(2015.0));
        assert_eq!(Field::Return.value(rec), FieldValue::Text("profit".to_string()));
        assert_eq!(Field::Body.number(rec), None);
        assert_eq!(Field::Year.key(rec), "2015");
    }

    #[test]
    fn export_includes_rows_and_encoding() {
        let ds = sample_dataset();
        let mut map = BTreeMap::new();
        map.insert("profit".to_string(), "green".to_string());
        let spec = ChartSpec {
            view: ViewId::ProfitScatter,
            kind: ChartKind::Scatter,
            rows: vec![0, 2],
            x: Field::Mmr,
            y: Some(Field::SellingPrice),
            color: Some(ColorEncoding::Discrete {
                field: Field::Return,
                map,
            }),
            title: "Scatter".to_string(),
        };

        let json = export_json(&[&spec], &ds).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let chart = &value[0];
        assert_eq!(chart["kind"], "scatter");
        assert_eq!(chart["x"], "mmr");
        assert_eq!(chart["y"], "sellingprice");
        assert_eq!(chart["color"]["type"], "discrete");
        assert_eq!(chart["color"]["map"]["profit"], "green");
        assert_eq!(chart["rows"].as_array().unwrap().len(), 2);
        assert_eq!(chart["rows"][1]["make"], "Honda");
        assert_eq!(chart["rows"][1]["return"], "loss");

        // Every row can be looked up by the chart's own field keys.
        for row in chart["rows"].as_array().unwrap() {
            for key in ["x", "y"] {
                let field = chart[key].as_str().unwrap();
                assert!(!row[field].is_null(), "row has no '{field}'");
            }
            assert!(!row[chart["color"]["field"].as_str().unwrap()].is_null());
            assert!(row["saledate"].is_string());
        }
    }
}
