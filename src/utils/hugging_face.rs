use std::path::PathBuf;

use hf_hub::api::tokio;
use log::info;

use crate::Result;

/// Local paths to the files of a pretrained model
#[derive(Clone, Debug)]
pub struct PretrainedFiles {
    /// The Hugging Face `config.json`
    pub config: PathBuf,

    /// The `model.safetensors` weights
    pub weights: PathBuf,

    /// The `tokenizer.json` definition
    pub tokenizer: PathBuf,
}

/// Download model config, weights and tokenizer from Hugging Face Hub
/// If file exists in cache, it will not be downloaded again
// NOTE: Modified from the built-in function to work within an already-async context
pub async fn download_hf_model(model_name: &str) -> Result<PretrainedFiles> {
    let api = tokio::Api::new()?;
    let repo = api.model(model_name.to_string());

    info!("Fetching {} from the Hugging Face Hub...", model_name);

    let weights = repo.get("model.safetensors").await?;
    let config = repo.get("config.json").await?;
    let tokenizer = repo.get("tokenizer.json").await?;

    Ok(PretrainedFiles {
        config,
        weights,
        tokenizer,
    })
}
