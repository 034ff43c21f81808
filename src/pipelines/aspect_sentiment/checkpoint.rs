//! An artifact directory holds `config.json`, the model record written by
//! `CompactRecorder`, and `tokenizer.json`.

use std::{fs, path::Path};

use burn::{
    config::Config as _,
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::Backend,
};
use log::info;
use tokenizers::Tokenizer;

use crate::{
    models::bert::aspect_sentiment::{Config, Model, ModelRecord},
    Error, Result,
};

/// The model configuration file
pub static CONFIG_FILE: &str = "config.json";

/// The model record file, without the extension added by the recorder
pub static MODEL_FILE: &str = "model";

/// The tokenizer definition file
pub static TOKENIZER_FILE: &str = "tokenizer.json";

/// Everything needed to rebuild a classifier
pub struct Checkpoint<B: Backend> {
    /// The model configuration, as saved
    pub config: Config,

    /// The model, with dropout disabled
    pub model: Model<B>,

    /// The tokenizer the model was trained with
    pub tokenizer: Tokenizer,
}

/// Write the configuration, weights, and tokenizer to an artifact directory
pub fn save<B: Backend>(
    artifact_dir: &Path,
    config: &Config,
    model: &Model<B>,
    tokenizer: &Tokenizer,
) -> Result<()> {
    fs::create_dir_all(artifact_dir)?;

    config.save(artifact_dir.join(CONFIG_FILE))?;

    CompactRecorder::new()
        .record(model.clone().into_record(), artifact_dir.join(MODEL_FILE))
        .map_err(|e| Error::Checkpoint(format!("unable to save model weights: {}", e)))?;

    tokenizer.save(artifact_dir.join(TOKENIZER_FILE), false)?;

    info!("Saved checkpoint to {}", artifact_dir.display());

    Ok(())
}

/// Read a checkpoint back from an artifact directory
pub fn load<B: Backend>(artifact_dir: &Path, device: &B::Device) -> Result<Checkpoint<B>> {
    if !artifact_dir.is_dir() {
        return Err(Error::Checkpoint(format!(
            "no checkpoint found at {}",
            artifact_dir.display()
        )));
    }

    // Load experiment configuration
    let config = Config::load(artifact_dir.join(CONFIG_FILE))
        .map_err(|e| Error::Checkpoint(format!("unable to load config file: {}", e)))?;

    config.validate()?;

    let tokenizer = Tokenizer::from_file(artifact_dir.join(TOKENIZER_FILE))
        .map_err(|e| Error::Checkpoint(format!("unable to load tokenizer: {}", e)))?;

    // Load trained model weights
    info!("Loading weights from {}...", artifact_dir.display());

    let record: ModelRecord<B> = CompactRecorder::new()
        .load(artifact_dir.join(MODEL_FILE), device)
        .map_err(|e| Error::Checkpoint(format!("unable to load trained model weights: {}", e)))?;

    check_vocab(&config, &tokenizer)?;
    check_record(&config, &record)?;

    let model = config.for_inference().init::<B>(device).load_record(record);

    let [d_input, d_output] = model.output.weight.val().dims();
    if d_input != config.bert.hidden_size || d_output != config.n_classes() {
        return Err(Error::Checkpoint(format!(
            "classification head is [{}, {}], expected [{}, {}]",
            d_input,
            d_output,
            config.bert.hidden_size,
            config.n_classes()
        )));
    }

    Ok(Checkpoint {
        config,
        model,
        tokenizer,
    })
}

/// The tokenizer must not produce ids beyond the embedding table
pub(super) fn check_vocab(config: &Config, tokenizer: &Tokenizer) -> Result<()> {
    let vocab_size = tokenizer.get_vocab_size(true);

    if vocab_size > config.bert.vocab_size {
        return Err(Error::Checkpoint(format!(
            "tokenizer has {} tokens, but the model only embeds {}",
            vocab_size, config.bert.vocab_size
        )));
    }

    Ok(())
}

/// Stored weights must match the configured architecture, since loading a record silently
/// drops surplus layers
fn check_record<B: Backend>(config: &Config, record: &ModelRecord<B>) -> Result<()> {
    let layers = record.bert.encoder.layers.len();

    if layers != config.bert.num_hidden_layers {
        return Err(Error::Checkpoint(format!(
            "weights hold {} encoder layers, config declares {}",
            layers, config.bert.num_hidden_layers
        )));
    }

    let [rows, _] = record.bert.embeddings.word_embeddings.weight.val().dims();

    if rows != config.bert.vocab_size {
        return Err(Error::Checkpoint(format!(
            "weights embed {} tokens, config declares {}",
            rows, config.bert.vocab_size
        )));
    }

    Ok(())
}
