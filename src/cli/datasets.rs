use std::fmt::Display;

use crate::datasets::{nsmc, Columns, CorpusConfig};

/// The unique string token for an arbitrary tab-separated corpus
pub static TSV: &str = "tsv";

/// The Dataset enum
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Dataset {
    /// Naver Sentiment Movie Corpus
    Nsmc,

    /// A `label \t text` corpus given by explicit file paths
    Tsv,
}

impl TryFrom<&str> for Dataset {
    type Error = DatasetError;

    /// Try to convert a string to a Dataset
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase() {
            name if name == nsmc::DATASET => Ok(Dataset::Nsmc),
            name if name == TSV => Ok(Dataset::Tsv),
            _ => Err(Self::Error::Unknown(value.to_string())),
        }
    }
}

impl Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dataset::Nsmc => nsmc::DATASET,
            Dataset::Tsv => TSV,
        };

        write!(f, "{}", name)
    }
}

/// The corpus layout chosen on the command line. Columns are zero-based and default to
/// `label \t text`.
pub fn corpus_config(
    text_col: Option<usize>,
    label_col: Option<usize>,
    has_headers: bool,
) -> CorpusConfig {
    let defaults = Columns::LABEL_FIRST;

    CorpusConfig::new()
        .with_columns(Columns {
            text: text_col.unwrap_or(defaults.text),
            label: label_col.unwrap_or(defaults.label),
            aspect: None,
        })
        .with_has_headers(has_headers)
}

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// No dataset found for the given string
    #[error("no dataset found for {0}")]
    Unknown(String),
}
