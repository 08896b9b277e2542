//! Write a synthetic `car_prices.zip` so the explorer can run without the
//! real auction export.

use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;

const HEADER: [&str; 16] = [
    "year",
    "make",
    "model",
    "trim",
    "body",
    "transmission",
    "vin",
    "state",
    "condition",
    "odometer",
    "color",
    "interior",
    "seller",
    "mmr",
    "sellingprice",
    "saledate",
];

/// (make, model, body, new price)
const CATALOG: [(&str, &str, &str, f64); 12] = [
    ("Toyota", "Camry", "Sedan", 26000.0),
    ("Toyota", "RAV4", "SUV", 29000.0),
    ("Toyota", "Tacoma", "Crew Cab", 33000.0),
    ("Honda", "Civic", "Sedan", 22000.0),
    ("Honda", "Accord", "Coupe", 27000.0),
    ("Honda", "CR-V", "SUV", 28000.0),
    ("Ford", "F-150", "SuperCrew", 38000.0),
    ("Ford", "Fusion", "Sedan", 24000.0),
    ("Ford", "Escape", "SUV", 26000.0),
    ("Chevrolet", "Malibu", "Sedan", 23000.0),
    ("Chevrolet", "Silverado 1500", "Crew Cab", 39000.0),
    ("Nissan", "Altima", "Sedan", 24500.0),
];

const STATES: [&str; 6] = ["ca", "tx", "fl", "pa", "ga", "oh"];
const COLORS: [&str; 5] = ["black", "white", "silver", "gray", "blue"];
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// splitmix64; deterministic so the sample is reproducible.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

/// Day of week (0 = Sunday) by Sakamoto's method.
fn weekday(year: i32, month: usize, day: u32) -> usize {
    const OFFSETS: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let y = if month < 3 { year - 1 } else { year };
    let w = y + y / 4 - y / 100 + y / 400 + OFFSETS[month - 1] + day as i32;
    w.rem_euclid(7) as usize
}

fn sale_date(rng: &mut Rng) -> String {
    let year = 2014 + rng.below(2) as i32;
    let month = 1 + rng.below(12);
    let day = 1 + rng.below(28) as u32;
    let hour = 1 + rng.below(12);
    format!(
        "{} {} {day:02} {year} {hour:02}:30:00 GMT-0800 (PST)",
        WEEKDAYS[weekday(year, month, day)],
        MONTHS[month - 1]
    )
}

fn main() -> Result<()> {
    let mut rng = Rng(42);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    let n_rows = 2000;
    for row in 0..n_rows {
        let (make, model, body, new_price) = CATALOG[rng.below(CATALOG.len())];
        let year = 2000 + rng.below(16) as i32;
        let age = (2015 - year) as f64;
        let odometer = (age * 12_000.0 * (0.6 + 0.8 * rng.unit())).round().max(5.0);
        let mmr = (new_price * 0.85_f64.powf(age) - odometer * 0.02).max(500.0).round();
        let selling_price = (mmr * (0.85 + 0.3 * rng.unit()) / 25.0).round() * 25.0;

        // Roughly 2% of rows lose a cell, like the real export.
        let body = if rng.below(50) == 0 { "" } else { body };

        writer.write_record([
            year.to_string(),
            make.to_string(),
            model.to_string(),
            "Base".to_string(),
            body.to_string(),
            "automatic".to_string(),
            format!("sample{row:06}"),
            rng.pick(&STATES).to_string(),
            (10 + rng.below(40)).to_string(),
            odometer.to_string(),
            rng.pick(&COLORS).to_string(),
            "black".to_string(),
            format!("{} dealer", make.to_lowercase()),
            mmr.to_string(),
            selling_price.to_string(),
            sale_date(&mut rng),
        ])?;
    }
    let csv_bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {e}"))?;

    let output_path = "car_prices.zip";
    let file = File::create(output_path).with_context(|| format!("creating {output_path}"))?;
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("car_prices.csv", SimpleFileOptions::default())?;
    zip.write_all(&csv_bytes)?;
    zip.finish()?;

    println!("Wrote {n_rows} sales to {output_path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_matches_calendar() {
        // 16 Dec 2014 was a Tuesday.
        assert_eq!(WEEKDAYS[weekday(2014, 12, 16)], "Tue");
        assert_eq!(WEEKDAYS[weekday(2015, 1, 1)], "Thu");
    }

    #[test]
    fn sale_dates_put_the_month_second() {
        let mut rng = Rng(7);
        for _ in 0..50 {
            let date = sale_date(&mut rng);
            let month = date.split_whitespace().nth(1).unwrap();
            assert!(MONTHS.contains(&month), "{date}");
        }
    }
}
