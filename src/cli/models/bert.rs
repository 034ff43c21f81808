/// Model Variants
/// --------------

/// The base model type
pub static MODEL_TYPE: &str = "bert";

/// bert-base-multilingual-cased
pub static MULTILINGUAL_CASED: &str = "bert-base-multilingual-cased";

/// bert-base-multilingual-uncased
pub static MULTILINGUAL_UNCASED: &str = "bert-base-multilingual-uncased";

/// All available BERT models
pub static ALL_MODELS: &[&str; 2] = &[MULTILINGUAL_CASED, MULTILINGUAL_UNCASED];

/// Aspect-Based Sentiment Analysis
/// -------------------------------

/// The default model to use, covering Korean reviews
pub static DEFAULT_ASPECT_SENTIMENT_MODEL: &str = MULTILINGUAL_CASED;
