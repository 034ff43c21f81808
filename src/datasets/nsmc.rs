use burn::data::dataset::{self, Dataset as _};
use log::info;

use crate::Result;

use super::{Aspect, Columns, Corpus, CorpusConfig, ExampleDataset, LabeledExample, LoadableDataset};

/// The name of the NSMC dataset
pub static DATASET: &str = "nsmc";

/// NSMC files are `id \t document \t label` with a header line
pub fn corpus_config() -> CorpusConfig {
    CorpusConfig::new()
        .with_columns(Columns {
            text: 1,
            label: 2,
            aspect: None,
        })
        .with_has_headers(true)
}

/// The corpus file for a mode (either "train" or "test")
pub fn corpus_path(data_dir: &str, mode: &str) -> String {
    format!("{}/datasets/{}/ratings_{}.txt", data_dir, DATASET, mode)
}

/// Struct for the NSMC dataset
pub struct Dataset {
    /// Underlying example dataset
    dataset: ExampleDataset,
}

/// Implement the Dataset trait for the NSMC dataset
impl dataset::Dataset<LabeledExample> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<LabeledExample> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

impl LoadableDataset for Dataset {
    /// Constructs the dataset for a mode (either "train" or "test")
    fn load(data_dir: &str, mode: &str, aspect: &Aspect) -> Result<Self> {
        let corpus = Corpus::open(corpus_path(data_dir, mode), corpus_config())?;
        let dataset = ExampleDataset::from_corpus(&corpus, aspect)?;

        info!("Loaded {} {} reviews from {}", dataset.len(), mode, DATASET);

        Ok(Self { dataset })
    }
}
