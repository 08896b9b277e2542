use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// ReturnLabel – derived profit/loss classification
// ---------------------------------------------------------------------------

/// Whether a sale beat the reference market price (MMR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnLabel {
    Profit,
    Loss,
}

impl ReturnLabel {
    /// `Profit` only when the selling price is strictly above MMR; a tie is a loss.
    pub fn classify(selling_price: f64, mmr: f64) -> Self {
        if selling_price > mmr {
            ReturnLabel::Profit
        } else {
            ReturnLabel::Loss
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnLabel::Profit => "profit",
            ReturnLabel::Loss => "loss",
        }
    }
}

impl fmt::Display for ReturnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SaleMonth – month token pulled out of the free-text sale date
// ---------------------------------------------------------------------------

/// Calendar month of a sale. Ordered by calendar, displayed as `Jan`..`Dec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SaleMonth {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl SaleMonth {
    pub const ALL: [SaleMonth; 12] = [
        SaleMonth::Jan,
        SaleMonth::Feb,
        SaleMonth::Mar,
        SaleMonth::Apr,
        SaleMonth::May,
        SaleMonth::Jun,
        SaleMonth::Jul,
        SaleMonth::Aug,
        SaleMonth::Sep,
        SaleMonth::Oct,
        SaleMonth::Nov,
        SaleMonth::Dec,
    ];

    const FULL_NAMES: [&'static str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];

    pub fn abbrev(&self) -> &'static str {
        match self {
            SaleMonth::Jan => "Jan",
            SaleMonth::Feb => "Feb",
            SaleMonth::Mar => "Mar",
            SaleMonth::Apr => "Apr",
            SaleMonth::May => "May",
            SaleMonth::Jun => "Jun",
            SaleMonth::Jul => "Jul",
            SaleMonth::Aug => "Aug",
            SaleMonth::Sep => "Sep",
            SaleMonth::Oct => "Oct",
            SaleMonth::Nov => "Nov",
            SaleMonth::Dec => "Dec",
        }
    }

    /// Parse a month name: three-letter abbreviation or full English name,
    /// case-insensitive.
    pub fn from_name(token: &str) -> Option<Self> {
        let lower = token.to_ascii_lowercase();
        Self::ALL
            .iter()
            .zip(Self::FULL_NAMES)
            .find(|(m, full)| lower == m.abbrev().to_ascii_lowercase() || lower == *full)
            .map(|(m, _)| *m)
    }

    /// Extract the month from a sale date shaped like
    /// `Tue Dec 16 2014 12:30:00 GMT-0800 (PST)`.
    ///
    /// The month must be the second whitespace-separated token. Anything else
    /// returns `None` rather than guessing.
    pub fn from_sale_date(sale_date: &str) -> Option<Self> {
        sale_date
            .split_whitespace()
            .nth(1)
            .and_then(Self::from_name)
    }
}

impl fmt::Display for SaleMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

// ---------------------------------------------------------------------------
// Record – one cleaned row of the sales file
// ---------------------------------------------------------------------------

/// One vehicle sale after cleaning. No field is ever missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Miles.
    pub odometer: f64,
    pub body: String,
    /// Reference market price at time of sale.
    pub mmr: f64,
    #[serde(rename = "sellingprice")]
    pub selling_price: f64,
    #[serde(rename = "saledate")]
    pub sale_date: String,
    #[serde(rename = "return")]
    pub return_label: ReturnLabel,
    pub month: SaleMonth,
    /// Remaining source columns (trim, transmission, state, ...) kept as text.
    pub extras: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Dataset – the full cleaned table
// ---------------------------------------------------------------------------

/// The cleaned, immutable table every resolver reads from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    /// Sorted distinct makes.
    makes: Vec<String>,
}

impl Dataset {
    /// Build the make index from already-cleaned records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let makes: BTreeSet<&str> = records.iter().map(|r| r.make.as_str()).collect();
        let makes = makes.into_iter().map(str::to_string).collect();
        Dataset { records, makes }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, idx: usize) -> &Record {
        &self.records[idx]
    }

    pub fn makes(&self) -> &[String] {
        &self.makes
    }

    /// Make choices as `(value, label)` pairs.
    pub fn make_options(&self) -> Vec<(String, String)> {
        self.makes.iter().map(|m| (m.clone(), m.clone())).collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Test fixture
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::too_many_arguments)]
pub(crate) fn record(
    make: &str,
    model: &str,
    year: i32,
    odometer: f64,
    body: &str,
    mmr: f64,
    selling_price: f64,
    sale_date: &str,
) -> Record {
    Record {
        make: make.to_string(),
        model: model.to_string(),
        year,
        odometer,
        body: body.to_string(),
        mmr,
        selling_price,
        sale_date: sale_date.to_string(),
        return_label: ReturnLabel::classify(selling_price, mmr),
        month: SaleMonth::from_sale_date(sale_date).expect("fixture date"),
        extras: BTreeMap::new(),
    }
}

/// Small dataset shared by the unit tests across modules.
#[cfg(test)]
pub(crate) fn sample_dataset() -> Dataset {
    Dataset::from_records(vec![
        record("Toyota", "Camry", 2015, 30000.0, "Sedan", 10000.0, 12000.0, "Tue Dec 16 2014 12:30:00 GMT-0800 (PST)"),
        record("Toyota", "Camry", 2016, 22000.0, "Sedan", 9000.0, 8000.0, "Wed Jan 14 2015 04:30:00 GMT-0800 (PST)"),
        record("Honda", "Civic", 2015, 41000.0, "Sedan", 8000.0, 8000.0, "Thu Jan 15 2015 04:30:00 GMT-0800 (PST)"),
        record("Toyota", "RAV4", 2012, 80500.0, "SUV", 11000.0, 11500.0, "Tue Feb 03 2015 02:00:00 GMT-0800 (PST)"),
        record("Honda", "Accord", 2010, 120000.0, "Coupe", 5000.0, 4200.0, "Tue Dec 16 2014 12:30:00 GMT-0800 (PST)"),
        record("Ford", "F-150", 2014, 65000.0, "Crew Cab", 21000.0, 23000.0, "Wed Jun 03 2015 03:00:00 GMT-0700 (PDT)"),
    ])
}
