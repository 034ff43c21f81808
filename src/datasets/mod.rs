use crate::Result;

/// Review records, aspects, and labeled examples
pub mod review;

/// Tab-separated corpus loading
pub mod corpus;

/// The Naver Sentiment Movie Corpus
pub mod nsmc;

pub use corpus::{split, Columns, Corpus, CorpusConfig, ExampleDataset, MalformedLines};
pub use review::{Aspect, LabeledExample, ReviewRecord, Sentiment};

/// A dataset which can be loaded from a data directory for a mode (either "train" or "test")
pub trait LoadableDataset: burn::data::dataset::Dataset<LabeledExample> {
    /// Load the dataset, labeling every review with the given aspect unless the corpus has its own
    fn load(data_dir: &str, mode: &str, aspect: &Aspect) -> Result<Self>
    where
        Self: std::marker::Sized;
}
