use std::{collections::HashMap, path::Path};

use bert_burn::{
    loader::{
        load_embeddings_from_safetensors, load_encoder_from_safetensors,
        load_pooler_from_safetensors,
    },
    model::{BertModelConfig, BertModelRecord},
};
use burn::tensor::backend::Backend;
use candle_core::{safetensors, Device};

use crate::{Error, Result};

/// Load pretrained BERT weights from a Hugging Face safetensors file
pub fn from_safetensors<B: Backend>(
    file_path: &Path,
    device: &B::Device,
    config: &BertModelConfig,
) -> Result<BertModelRecord<B>> {
    if !file_path.is_file() {
        return Err(Error::FileNotFound(file_path.to_path_buf()));
    }

    let model_name = config.model_type.as_str();

    let weights = safetensors::load(file_path, &Device::Cpu).map_err(|e| {
        Error::Checkpoint(format!(
            "unable to read weights from {}: {}",
            file_path.display(),
            e
        ))
    })?;

    // Weights are stored in a HashMap<String, Tensor>
    // For each layer, it will either be prefixed with "encoder.layer.", "embeddings." or "pooler."
    let mut encoder_layers: HashMap<String, candle_core::Tensor> = HashMap::new();
    let mut embeddings_layers: HashMap<String, candle_core::Tensor> = HashMap::new();
    let mut pooler_layers: HashMap<String, candle_core::Tensor> = HashMap::new();

    let prefix = format!("{}.", model_name);

    for (key, value) in weights.iter() {
        // If model name prefix present in keys, remove it to load keys consistently
        // across variants (bert-base, roberta-base etc.)
        let key_without_prefix = key.replace(&prefix, "");

        if key_without_prefix.starts_with("encoder.layer.") {
            encoder_layers.insert(key_without_prefix, value.clone());
        } else if key_without_prefix.starts_with("embeddings.") {
            embeddings_layers.insert(key_without_prefix, value.clone());
        } else if key_without_prefix.starts_with("pooler.") {
            pooler_layers.insert(key_without_prefix, value.clone());
        }
    }

    if embeddings_layers.is_empty() || encoder_layers.is_empty() || pooler_layers.is_empty() {
        return Err(Error::Checkpoint(format!(
            "{} does not contain complete {} embedding, encoder and pooler weights",
            file_path.display(),
            model_name
        )));
    }

    let embeddings = load_embeddings_from_safetensors(embeddings_layers, device);
    let encoder = load_encoder_from_safetensors(encoder_layers, device);

    let pooler = load_pooler_from_safetensors(pooler_layers, device);

    Ok(BertModelRecord {
        embeddings,
        encoder,
        pooler: Some(pooler),
    })
}
