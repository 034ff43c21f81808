//! Tab-separated review corpus loading

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use burn::data::dataset::{self, InMemDataset};
use csv::{StringRecord, StringRecordsIntoIter};
use log::{debug, warn};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

use super::review::{Aspect, LabeledExample, ReviewRecord, Sentiment};

/// What to do with a line that cannot be parsed
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLines {
    /// Stop at the first malformed line with a parse error
    #[default]
    Fail,

    /// Log a warning and move on to the next line
    Skip,
}

/// Zero-based field positions within a corpus line
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    /// The review text field
    pub text: usize,

    /// The `0`/`1` label field
    pub label: usize,

    /// An optional per-line aspect term field
    pub aspect: Option<usize>,
}

impl Columns {
    /// `label \t text`
    pub const LABEL_FIRST: Columns = Columns {
        text: 1,
        label: 0,
        aspect: None,
    };

    /// `text \t label`
    pub const TEXT_FIRST: Columns = Columns {
        text: 0,
        label: 1,
        aspect: None,
    };

    /// Set the aspect field
    pub fn with_aspect(mut self, aspect: usize) -> Self {
        self.aspect = Some(aspect);
        self
    }

    /// The minimum number of fields a line needs
    fn required_fields(&self) -> usize {
        let last = self.text.max(self.label).max(self.aspect.unwrap_or(0));

        last + 1
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::LABEL_FIRST
    }
}

/// Corpus layout and parsing policy
#[derive(burn::config::Config, Debug)]
pub struct CorpusConfig {
    /// Field layout
    #[config(default = "Columns::LABEL_FIRST")]
    pub columns: Columns,

    /// Whether the first line is a header to discard
    #[config(default = false)]
    pub has_headers: bool,

    /// Malformed line policy
    #[config(default = "MalformedLines::Fail")]
    pub malformed: MalformedLines,
}

/// A parsed corpus line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// The review record
    pub record: ReviewRecord,

    /// The aspect term from the line, if the corpus has an aspect column
    pub aspect: Option<Aspect>,
}

/// A tab-separated review corpus on disk
#[derive(Clone, Debug)]
pub struct Corpus {
    path: PathBuf,
    config: CorpusConfig,
}

impl Corpus {
    /// Point at a corpus file, failing if it does not exist
    pub fn open(path: impl AsRef<Path>, config: CorpusConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.is_file() {
            return Err(Error::FileNotFound(path));
        }

        Ok(Self { path, config })
    }

    /// The corpus file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The corpus layout
    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Start a fresh pass over the corpus rows, in file order
    pub fn rows(&self) -> Result<Rows> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound(self.path.clone()),
            _ => Error::Io(e),
        })?;

        let reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(self.config.has_headers)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        Ok(Rows {
            path: self.path.clone(),
            columns: self.config.columns,
            malformed: self.config.malformed,
            inner: reader.into_records(),
            done: false,
        })
    }

    /// Start a fresh pass over the review records, in file order
    pub fn records(&self) -> Result<impl Iterator<Item = Result<ReviewRecord>>> {
        Ok(self.rows()?.map(|row| row.map(|row| row.record)))
    }

    /// Read every review record
    pub fn load(&self) -> Result<Vec<ReviewRecord>> {
        self.records()?.collect()
    }

    /// Read every line as a labeled example, using the line's aspect field when present
    pub fn examples(&self, default_aspect: &Aspect) -> Result<Vec<LabeledExample>> {
        self.rows()?
            .map(|row| {
                row.map(|Row { record, aspect }| {
                    let aspect = aspect.unwrap_or_else(|| default_aspect.clone());

                    LabeledExample::from_record(record, aspect)
                })
            })
            .collect()
    }
}

/// A lazy pass over a corpus file
pub struct Rows {
    path: PathBuf,
    columns: Columns,
    malformed: MalformedLines,
    inner: StringRecordsIntoIter<File>,
    done: bool,
}

impl Rows {
    fn parse_error(&self, line: u64, reason: impl Into<String>) -> Error {
        Error::Parse {
            path: self.path.clone(),
            line,
            reason: reason.into(),
        }
    }

    fn parse(&self, fields: &StringRecord) -> Result<Row> {
        let line = fields.position().map(|p| p.line()).unwrap_or_default();

        let required = self.columns.required_fields();
        if fields.len() < required {
            return Err(self.parse_error(
                line,
                format!(
                    "expected at least {} tab-separated fields, found {}",
                    required,
                    fields.len()
                ),
            ));
        }

        let label = &fields[self.columns.label];
        let label = Sentiment::from_label(label)
            .ok_or_else(|| self.parse_error(line, format!("unknown label '{}'", label)))?;

        let record = ReviewRecord::new(&fields[self.columns.text], label)
            .map_err(|_| self.parse_error(line, "empty review text"))?;

        let aspect = match self.columns.aspect {
            Some(index) => Some(
                Aspect::new(&fields[index])
                    .map_err(|_| self.parse_error(line, "empty aspect term"))?,
            ),
            None => None,
        };

        Ok(Row { record, aspect })
    }
}

impl Iterator for Rows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let fields = match self.inner.next()? {
                Ok(fields) => fields,
                Err(err) if err.is_io_error() => {
                    self.done = true;

                    let error = match err.into_kind() {
                        csv::ErrorKind::Io(e) => Error::Io(e),
                        kind => Error::Io(std::io::Error::other(format!("{:?}", kind))),
                    };

                    return Some(Err(error));
                }
                Err(err) => {
                    let line = err.position().map(|p| p.line()).unwrap_or_default();
                    let error = self.parse_error(line, err.to_string());

                    if self.malformed == MalformedLines::Skip {
                        warn!("Skipping malformed line: {}", error);
                        continue;
                    }

                    self.done = true;
                    return Some(Err(error));
                }
            };

            match self.parse(&fields) {
                Ok(row) => return Some(Ok(row)),
                Err(error) if self.malformed == MalformedLines::Skip => {
                    warn!("Skipping malformed line: {}", error);
                }
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

/// Shuffle with a fixed seed and split into (train, test) partitions
pub fn split<T>(mut items: Vec<T>, train_ratio: f64, seed: u64) -> Result<(Vec<T>, Vec<T>)> {
    if !(0.0..=1.0).contains(&train_ratio) {
        return Err(Error::InvalidSplit(train_ratio));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let total = items.len();
    let split_at = ((total as f64) * train_ratio).round() as usize;
    let test = items.split_off(split_at.min(total));

    debug!("Corpus split: {} train, {} test", items.len(), test.len());

    Ok((items, test))
}

/// An in-memory dataset of labeled examples
pub struct ExampleDataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<LabeledExample>,
}

impl ExampleDataset {
    /// Wrap a list of examples
    pub fn new(examples: Vec<LabeledExample>) -> Self {
        Self {
            dataset: InMemDataset::new(examples),
        }
    }

    /// Load every line of a corpus as an example
    pub fn from_corpus(corpus: &Corpus, default_aspect: &Aspect) -> Result<Self> {
        Ok(Self::new(corpus.examples(default_aspect)?))
    }
}

impl dataset::Dataset<LabeledExample> for ExampleDataset {
    fn get(&self, index: usize) -> Option<LabeledExample> {
        self.dataset.get(index)
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }
}
