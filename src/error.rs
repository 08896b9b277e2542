use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning the raw archive into a [`Dataset`].
///
/// All of these are fatal at startup. Empty filter results are not errors and
/// never show up here.
///
/// [`Dataset`]: crate::data::model::Dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("cannot read {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive {} has no member named '{member}'", .archive.display())]
    MissingMember { archive: PathBuf, member: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("line {line}: column '{column}' has non-numeric value '{value}'")]
    Malformed {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: expected at most {expected} fields, found {found}")]
    RowLength {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: sale date '{value}' has no month name in its second token")]
    DateFormat { line: u64, value: String },
}

pub type Result<T> = std::result::Result<T, DataError>;
