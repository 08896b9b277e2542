use std::path::PathBuf;

use clap::Parser;

/// Explore used-car sale records: profit/loss against market price, monthly
/// and body-style sales, and price against mileage.
#[derive(Parser, Debug)]
#[command(name = "car-lot-explorer", version, about)]
pub struct Cli {
    /// Zip archive holding the sales CSV
    #[arg(long, default_value = "car_prices.zip")]
    pub archive: PathBuf,

    /// Directory to extract the archive into [default: current directory]
    #[arg(long)]
    pub extract_dir: Option<PathBuf>,

    /// Name of the CSV member inside the archive
    #[arg(long, default_value = "car_prices.csv")]
    pub csv_name: String,
}

impl Cli {
    pub fn extract_dir(&self) -> std::io::Result<PathBuf> {
        match &self.extract_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_packaged_file() {
        let cli = Cli::parse_from(["car-lot-explorer"]);
        assert_eq!(cli.archive, PathBuf::from("car_prices.zip"));
        assert_eq!(cli.csv_name, "car_prices.csv");
        assert!(cli.extract_dir.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "car-lot-explorer",
            "--archive",
            "/data/sales.zip",
            "--extract-dir",
            "/tmp/sales",
            "--csv-name",
            "sales.csv",
        ]);
        assert_eq!(cli.archive, PathBuf::from("/data/sales.zip"));
        assert_eq!(cli.extract_dir().unwrap(), PathBuf::from("/tmp/sales"));
        assert_eq!(cli.csv_name, "sales.csv");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
