use std::path::PathBuf;

/// Errors raised while loading corpora, checkpoints, and running the classifier
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The corpus or checkpoint path does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A corpus line could not be turned into a review record
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        /// The corpus file
        path: PathBuf,
        /// 1-based line number
        line: u64,
        /// What was wrong with the line
        reason: String,
    },

    /// The checkpoint is missing pieces or does not match the expected architecture
    #[error("invalid checkpoint: {0}")]
    Checkpoint(String),

    /// Review text must not be empty
    #[error("review text is empty")]
    EmptyText,

    /// Aspect terms must not be empty
    #[error("aspect term is empty")]
    EmptyAspect,

    /// The train/test split ratio was outside of [0, 1]
    #[error("split ratio must be within [0, 1], got {0}")]
    InvalidSplit(f64),

    /// Tokenization failed
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Downloading from the Hugging Face Hub failed
    #[error("download failed: {0}")]
    Download(String),

    /// Pass-through I/O failures
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

impl From<tokenizers::Error> for Error {
    fn from(value: tokenizers::Error) -> Self {
        Error::Tokenizer(value.to_string())
    }
}

impl From<hf_hub::api::tokio::ApiError> for Error {
    fn from(value: hf_hub::api::tokio::ApiError) -> Self {
        Error::Download(value.to_string())
    }
}
