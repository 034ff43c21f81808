/// Training and corpus configuration
pub mod config;

/// Tokenization of (review, aspect) pairs
pub mod encoder;

/// Batcher
pub mod batcher;

/// Checkpoint persistence
pub mod checkpoint;

/// The model interface handle
pub mod classifier;

/// Training
pub mod training;

pub use batcher::Batcher;
pub use classifier::{Classifier, Evaluation, Prediction};
pub use config::TrainingConfig;
pub use encoder::{Encoded, PairEncoder};
pub use training::train;

/// The unique string token that identifies this pipeline
pub static PIPELINE: &str = "aspect-sentiment";

/// The location of trained artifacts for a model under a data directory
pub fn artifact_dir(data_dir: &str, model_name: &str) -> String {
    format!("{}/{}/{}", data_dir, PIPELINE, model_name)
}
