//! Adapt Bert to the Aspect-Based Sentiment Analysis pipeline

use std::{collections::BTreeMap, path::Path};

use bert_burn::model::BertModelConfig;
use burn::{
    config::Config as _,
    nn::{DropoutConfig, LinearConfig},
    tensor::backend::Backend,
};

use crate::{datasets::Sentiment, utils::classes::invert_map, Error, Result};

use super::Model;

/// The Model Configuration
#[derive(burn::config::Config, Debug)]
pub struct Config {
    /// The base BERT config
    pub bert: BertModelConfig,

    /// A map from class ids to class name labels
    pub id2label: BTreeMap<usize, String>,

    /// Dropout rate before the classification head
    #[config(default = 0.5)]
    pub classifier_dropout: f64,

    /// Maximum tokenized length of a (review, aspect) pair
    #[config(default = 64)]
    pub max_seq_len: usize,
}

impl Config {
    /// Create a configuration for the two sentiment classes
    pub fn new_with_sentiments(bert: BertModelConfig) -> Self {
        let id2label = Sentiment::ALL
            .iter()
            .map(|sentiment| (sentiment.class_id(), sentiment.as_str().to_string()))
            .collect();

        Config::new(bert, id2label)
    }

    /// Load a pretrained Hugging Face model configuration
    pub fn load_pretrained(config_file: impl AsRef<Path>) -> Result<Self> {
        let path = config_file.as_ref();

        let mut bert = BertModelConfig::load(path).map_err(|e| {
            Error::Checkpoint(format!(
                "unable to load Hugging Face config file {}: {}",
                path.display(),
                e
            ))
        })?;

        // Enable the pooling layer for sequence classification
        bert.with_pooling_layer = Some(true);

        Ok(Self::new_with_sentiments(bert))
    }

    /// A reverse map from class name labels to class ids
    pub fn label2id(&self) -> BTreeMap<String, usize> {
        invert_map(self.id2label.clone())
    }

    /// Total number of classes
    pub fn n_classes(&self) -> usize {
        self.id2label.len()
    }

    /// The sentiment for a class id
    pub fn sentiment(&self, class_id: usize) -> Option<Sentiment> {
        let label = self.id2label.get(&class_id)?;

        Sentiment::ALL
            .into_iter()
            .find(|sentiment| sentiment.as_str() == label)
    }

    /// Check that the label map is exactly the two sentiments
    pub fn validate(&self) -> Result<()> {
        if self.n_classes() != Sentiment::ALL.len() {
            return Err(Error::Checkpoint(format!(
                "expected {} sentiment classes, found {}",
                Sentiment::ALL.len(),
                self.n_classes()
            )));
        }

        for sentiment in Sentiment::ALL {
            if self.sentiment(sentiment.class_id()) != Some(sentiment) {
                return Err(Error::Checkpoint(format!(
                    "class {} is not labeled '{}'",
                    sentiment.class_id(),
                    sentiment
                )));
            }
        }

        Ok(())
    }

    /// A copy with every dropout disabled, for deterministic inference
    pub fn for_inference(&self) -> Self {
        let mut config = self.clone();

        config.bert.hidden_dropout_prob = 0.0;
        config.classifier_dropout = 0.0;

        config
    }

    /// Initializes a Bert model with default weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        let bert = self.bert.init(device);

        let n_classes = self.n_classes();

        let dropout = DropoutConfig::new(self.classifier_dropout).init();

        let output = LinearConfig::new(self.bert.hidden_size, n_classes).init(device);

        Model {
            bert,
            dropout,
            output,
            n_classes,
        }
    }
}
