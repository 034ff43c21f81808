/// BERT for Aspect-Based Sentiment Analysis Configuration
pub mod config;

/// BERT for Aspect-Based Sentiment Analysis
pub mod model;

/// Training routine
pub mod train;

pub use config::Config;
pub use model::{Model, ModelRecord};
