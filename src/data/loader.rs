use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use super::model::{Dataset, Record, ReturnLabel, SaleMonth};
use crate::error::{DataError, Result};

/// Unique identifier column, dropped on load.
pub const ID_COLUMN: &str = "vin";

/// Columns the file must carry. Anything else is kept as a text extra.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    ID_COLUMN,
    "make",
    "model",
    "year",
    "odometer",
    "body",
    "mmr",
    "sellingprice",
    "saledate",
];

/// Cell spellings treated as missing, on top of the empty string. Matched
/// exactly; a cell of spaces is a value.
const NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Extract `member` from the zip `archive` into `extract_dir`, then load and
/// clean it.
///
/// Writes the extracted file to disk; call once during startup.
pub fn prepare(archive: &Path, extract_dir: &Path, member: &str) -> Result<Dataset> {
    let csv_path = extract_archive(archive, extract_dir, member)?;
    load_csv(&csv_path)
}

/// Unpack the whole archive into `extract_dir` and return the path of `member`.
pub fn extract_archive(archive: &Path, extract_dir: &Path, member: &str) -> Result<PathBuf> {
    let file = File::open(archive).map_err(|source| DataError::Load {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip = ZipArchive::new(file)?;

    if !zip.file_names().any(|name| name == member) {
        return Err(DataError::MissingMember {
            archive: archive.to_path_buf(),
            member: member.to_string(),
        });
    }

    zip.extract(extract_dir)?;
    log::debug!(
        "Extracted {} entries from {} into {}",
        zip.len(),
        archive.display(),
        extract_dir.display()
    );
    Ok(extract_dir.join(member))
}

/// Load an already-extracted CSV file.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| DataError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(file)
}

// ---------------------------------------------------------------------------
// CSV parsing and cleaning
// ---------------------------------------------------------------------------

/// Column positions resolved from the header row.
struct Columns {
    id: usize,
    make: usize,
    model: usize,
    year: usize,
    odometer: usize,
    body: usize,
    mmr: usize,
    selling_price: usize,
    sale_date: usize,
    extras: Vec<(usize, String)>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == **col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DataError::Schema { missing });
        }

        // Present by the check above.
        let pos = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
        let extras = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !REQUIRED_COLUMNS.contains(h))
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        Ok(Columns {
            id: pos(ID_COLUMN),
            make: pos("make"),
            model: pos("model"),
            year: pos("year"),
            odometer: pos("odometer"),
            body: pos("body"),
            mmr: pos("mmr"),
            selling_price: pos("sellingprice"),
            sale_date: pos("saledate"),
            extras,
        })
    }
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_VALUES.contains(&cell)
}

fn parse_number(cell: &str, line: u64, column: &'static str) -> Result<f64> {
    cell.trim().parse::<f64>().map_err(|_| DataError::Malformed {
        line,
        column,
        value: cell.to_string(),
    })
}

/// Years may be written as `2015` or, after a float round-trip, `2015.0`.
fn parse_year(cell: &str, line: u64) -> Result<i32> {
    let trimmed = cell.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Ok(year);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.abs() < i32::MAX as f64 => Ok(v as i32),
        _ => Err(DataError::Malformed {
            line,
            column: "year",
            value: cell.to_string(),
        }),
    }
}

/// Parse the sales table, dropping the id column and every row with a missing
/// cell, then derive the return label and sale month.
///
/// A row shorter than the header is missing its trailing cells and is dropped
/// like any other incomplete row. A longer row is an error.
pub fn read_records<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers()?.clone();
    let cols = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        if row.len() > headers.len() {
            return Err(DataError::RowLength {
                line,
                expected: headers.len(),
                found: row.len(),
            });
        }
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let has_missing = row.len() < headers.len()
            || (0..headers.len())
            .filter(|&i| i != cols.id)
            .any(|i| is_missing(cell(i)));
        if has_missing {
            dropped += 1;
            continue;
        }

        let mmr = parse_number(cell(cols.mmr), line, "mmr")?;
        let selling_price = parse_number(cell(cols.selling_price), line, "sellingprice")?;
        let sale_date = cell(cols.sale_date).trim().to_string();
        let month = SaleMonth::from_sale_date(&sale_date).ok_or_else(|| DataError::DateFormat {
            line,
            value: sale_date.clone(),
        })?;

        let extras: BTreeMap<String, String> = cols
            .extras
            .iter()
            .map(|(i, name)| (name.clone(), cell(*i).to_string()))
            .collect();

        records.push(Record {
            make: cell(cols.make).to_string(),
            model: cell(cols.model).to_string(),
            year: parse_year(cell(cols.year), line)?,
            odometer: parse_number(cell(cols.odometer), line, "odometer")?,
            body: cell(cols.body).to_string(),
            mmr,
            selling_price,
            sale_date,
            return_label: ReturnLabel::classify(selling_price, mmr),
            month,
            extras,
        });
    }

    let dataset = Dataset::from_records(records);
    log::info!(
        "Prepared {} records ({} dropped for missing values, {} makes)",
        dataset.len(),
        dropped,
        dataset.makes().len()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "year,make,model,trim,body,transmission,vin,state,odometer,mmr,sellingprice,saledate";

    fn csv_of(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    fn example_csv() -> String {
        csv_of(&[
            "2015,Toyota,Camry,LE,Sedan,automatic,vin1,ca,30000,10000,12000,Tue Dec 16 2014 12:30:00 GMT-0800 (PST)",
            "2016,Toyota,Camry,SE,Sedan,automatic,vin2,ca,22000,9000,8000,Wed Jan 14 2015 04:30:00 GMT-0800 (PST)",
            "2015,Honda,Civic,EX,Sedan,manual,vin3,tx,41000,8000,8000,Thu Jan 15 2015 04:30:00 GMT-0800 (PST)",
        ])
    }

    #[test]
    fn end_to_end_example_labels() {
        let ds = read_records(example_csv().as_bytes()).unwrap();
        let labels: Vec<ReturnLabel> = ds.records().iter().map(|r| r.return_label).collect();
        assert_eq!(labels, [ReturnLabel::Profit, ReturnLabel::Loss, ReturnLabel::Loss]);
        assert_eq!(ds.records()[0].month, SaleMonth::Dec);
        assert_eq!(ds.records()[1].month, SaleMonth::Jan);
    }

    #[test]
    fn id_column_is_dropped_and_extras_kept() {
        let ds = read_records(example_csv().as_bytes()).unwrap();
        let first = &ds.records()[0];
        assert!(!first.extras.contains_key(ID_COLUMN));
        assert_eq!(first.extras.get("trim").map(String::as_str), Some("LE"));
        assert_eq!(first.extras.get("state").map(String::as_str), Some("ca"));
        assert_eq!(first.extras.len(), 3);
    }

    #[test]
    fn rows_with_any_missing_cell_are_dropped() {
        let text = csv_of(&[
            "2015,Toyota,Camry,LE,Sedan,automatic,vin1,ca,30000,10000,12000,Tue Dec 16 2014 12:30:00 GMT-0800 (PST)",
            // missing body
            "2015,Toyota,Camry,LE,,automatic,vin2,ca,30000,10000,12000,Tue Dec 16 2014 12:30:00 GMT-0800 (PST)",
            // NA in an extra column still drops the row
            "2015,Toyota,Camry,LE,Sedan,NA,vin3,ca,30000,10000,12000,Tue Dec 16 2014 12:30:00 GMT-0800 (PST)",
            // missing mmr
            "2015,Toyota,Camry,LE,Sedan,automatic,vin4,ca,30000,,12000,Tue Dec 16 2014 12:30:00 GMT-0800 (PST)",
        ]);
        let ds = read_records(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn short_rows_are_dropped() {
        let text = csv_of(&[
            "2015,Toyota,Camry,LE,Sedan,automatic,vin1,ca,30000,10000,12000,Tue Dec 16 2014 12:30:00 GMT-0800 (PST)",
            // no saledate cell at all
            "2016,Toyota,Camry,SE,Sedan,automatic,vin2,ca,22000,9000,8000",
        ]);
        let ds = read_records(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].year, 2015);
    }

    #[test]
    fn long_rows_are_rejected() {
        let text = csv_of(&[
            "2015,Toyota,Camry,LE,Sedan,automatic,vin1,ca,30000,10000,12000,Tue Dec 16 2014 12:30:00 GMT-0800 (PST),extra",
        ]);
        match read_records(text.as_bytes()) {
            Err(DataError::RowLength { line, expected, found }) => {
                assert_eq!((line, expected, found), (2, 12, 13));
            }
            other => panic!("expected row length error, got {other:?}"),
        }
    }

    #[test]
    fn na_spellings_match_the_usual_set() {
        for na in ["", "NA", "<NA>", "#N/A N/A", "-nan", "1.#QNAN", "-1.#IND", "null"] {
            assert!(is_missing(na), "{na:?}");
        }
        for value in [" ", "Na", "none", "0"] {
            assert!(!is_missing(value), "{value:?}");
        }
    }

    #[test]
    fn missing_id_value_does_not_drop_row() {
        let text = csv_of(&[
            "2015,Toyota,Camry,LE,Sedan,automatic,,ca,30000,10000,12000,Tue Dec 16 2014 12:30:00 GMT-0800 (PST)",
        ]);
        let ds = read_records(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn absent_columns_are_a_schema_error() {
        let text = "year,make,model,vin,odometer,mmr\n2015,Toyota,Camry,v,1,2\n";
        match read_records(text.as_bytes()) {
            Err(DataError::Schema { missing }) => {
                assert_eq!(missing, ["body", "sellingprice", "saledate"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_price_is_malformed() {
        let text = csv_of(&[
            "2015,Toyota,Camry,LE,Sedan,automatic,vin1,ca,30000,lots,12000,Tue Dec 16 2014 12:30:00 GMT-0800 (PST)",
        ]);
        match read_records(text.as_bytes()) {
            Err(DataError::Malformed { column, line, .. }) => {
                assert_eq!(column, "mmr");
                assert_eq!(line, 2);
            }
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn unexpected_date_format_fails_loudly() {
        let text = csv_of(&[
            "2015,Toyota,Camry,LE,Sedan,automatic,vin1,ca,30000,10000,12000,2014-12-16",
        ]);
        assert!(matches!(
            read_records(text.as_bytes()),
            Err(DataError::DateFormat { .. })
        ));
    }

    #[test]
    fn float_years_are_accepted() {
        assert_eq!(parse_year("2015.0", 2).unwrap(), 2015);
        assert!(parse_year("2015.5", 2).is_err());
    }

    fn write_archive(dir: &Path, member: &str, contents: &str) -> PathBuf {
        let zip_path = dir.join("car_prices.zip");
        let file = File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(member, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
        writer.finish().unwrap();
        zip_path
    }

    #[test]
    fn prepare_extracts_and_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(tmp.path(), "car_prices.csv", &example_csv());
        let out = tmp.path().join("out");

        let ds = prepare(&archive, &out, "car_prices.csv").unwrap();
        assert_eq!(ds.len(), 3);
        assert!(out.join("car_prices.csv").exists());
    }

    #[test]
    fn missing_archive_is_a_load_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = prepare(&tmp.path().join("nope.zip"), tmp.path(), "car_prices.csv").unwrap_err();
        assert!(matches!(err, DataError::Load { .. }));
    }

    #[test]
    fn missing_member_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(tmp.path(), "other.csv", &example_csv());
        let err = prepare(&archive, tmp.path(), "car_prices.csv").unwrap_err();
        assert!(matches!(err, DataError::MissingMember { .. }));
    }

    #[test]
    fn garbage_archive_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("car_prices.zip");
        std::fs::write(&archive, b"not a zip").unwrap();
        let err = prepare(&archive, tmp.path(), "car_prices.csv").unwrap_err();
        assert!(matches!(err, DataError::Archive(_)));
    }
}
