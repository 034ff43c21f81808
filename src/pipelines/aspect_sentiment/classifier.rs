use std::{borrow::Cow, path::Path};

use burn::{
    data::dataset::Dataset,
    module::{AutodiffModule, Module},
    tensor::backend::{AutodiffBackend, Backend},
};
use log::info;
use tokenizers::Tokenizer;

use crate::{
    datasets::{Aspect, LabeledExample, Sentiment},
    models::bert::{
        aspect_sentiment::{Config, Model},
        loader,
    },
    utils::{
        classes::argmax_rows,
        hugging_face::{download_hf_model, PretrainedFiles},
        tensors,
    },
    Error, Result,
};

use super::{checkpoint, training, Batcher, PairEncoder, TrainingConfig};

/// A sentiment prediction for one (review, aspect) pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    /// The predicted sentiment
    pub sentiment: Sentiment,

    /// Softmax scores indexed by sentiment class id
    pub scores: [f32; 2],
}

impl Prediction {
    /// The score of the predicted sentiment
    pub fn confidence(&self) -> f32 {
        self.scores[self.sentiment.class_id()]
    }
}

/// The results of running the classifier over a labeled dataset
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// Predictions in dataset order
    pub predictions: Vec<Prediction>,

    /// Share of predictions matching the labeled sentiment
    pub accuracy: f64,
}

/// A handle owning a loaded ABSA model and its tokenizer
pub struct Classifier<B: Backend> {
    pub(super) model: Model<B>,
    pub(super) config: Config,
    pub(super) encoder: PairEncoder,
    pub(super) batcher: Batcher<B>,
}

impl<B: Backend> Classifier<B> {
    /// Wrap a model, checking that its labels are the two sentiments and that the tokenizer
    /// fits its embeddings
    pub fn new(model: Model<B>, config: Config, tokenizer: Tokenizer, device: B::Device) -> Result<Self> {
        config.validate()?;
        checkpoint::check_vocab(&config, &tokenizer)?;

        let encoder = PairEncoder::new(tokenizer, config.max_seq_len)?;
        let batcher = Batcher::new(&config, device);

        Ok(Self {
            model,
            config,
            encoder,
            batcher,
        })
    }

    /// Download a pretrained encoder from the Hugging Face Hub and add a fresh classification head
    pub async fn from_pretrained(
        model_name: &str,
        training: &TrainingConfig,
        device: &B::Device,
    ) -> Result<Self> {
        let files = download_hf_model(model_name).await?;

        Self::from_files(&files, training, device)
    }

    /// Build from locally available pretrained files
    pub fn from_files(
        files: &PretrainedFiles,
        training: &TrainingConfig,
        device: &B::Device,
    ) -> Result<Self> {
        let mut config = Config::load_pretrained(&files.config)?
            .with_classifier_dropout(training.classifier_dropout);

        config.bert.hidden_dropout_prob = training.hidden_dropout_prob;
        config.max_seq_len = training
            .max_seq_len
            .min(config.bert.max_position_embeddings);

        let record = loader::from_safetensors::<B>(&files.weights, device, &config.bert)?;

        let mut model = config.init::<B>(device);
        model.bert = model.bert.load_record(record);

        let tokenizer = Tokenizer::from_file(&files.tokenizer)?;

        Self::new(model, config, tokenizer, device.clone())
    }

    /// Load a trained checkpoint from an artifact directory
    pub fn load(artifact_dir: impl AsRef<Path>, device: &B::Device) -> Result<Self> {
        let checkpoint::Checkpoint {
            config,
            model,
            tokenizer,
        } = checkpoint::load::<B>(artifact_dir.as_ref(), device)?;

        Self::new(model, config, tokenizer, device.clone())
    }

    /// Save a checkpoint to an artifact directory
    pub fn save(&self, artifact_dir: impl AsRef<Path>) -> Result<()> {
        checkpoint::save(
            artifact_dir.as_ref(),
            &self.config,
            &self.model,
            self.encoder.tokenizer(),
        )
    }

    /// The model configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying model
    pub fn model(&self) -> &Model<B> {
        &self.model
    }

    /// The pair encoder
    pub fn encoder(&self) -> &PairEncoder {
        &self.encoder
    }

    /// The device computation runs on
    pub fn device(&self) -> &B::Device {
        &self.batcher.device
    }

    /// Predict the sentiment of a review toward an aspect
    pub fn predict(&self, text: &str, aspect: &str) -> Result<Sentiment> {
        Ok(self.predict_scores(text, aspect)?.sentiment)
    }

    /// Predict the sentiment of a review toward an aspect, with class scores
    pub fn predict_scores(&self, text: &str, aspect: &str) -> Result<Prediction> {
        let mut predictions = self.predict_batch(&[(text, aspect)])?;

        predictions.pop().ok_or(Error::EmptyText)
    }

    /// Predict a batch of (review, aspect) pairs
    pub fn predict_batch(&self, inputs: &[(&str, &str)]) -> Result<Vec<Prediction>> {
        let token_ids_list = inputs
            .iter()
            .map(|(text, aspect)| self.encoder.encode(text, &Aspect::new(aspect)?))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.infer(&self.inference_model(), token_ids_list))
    }

    /// Run the classifier over a labeled dataset, reporting accuracy
    pub fn evaluate<D: Dataset<LabeledExample>>(
        &self,
        dataset: &D,
        batch_size: usize,
        log_interval: usize,
    ) -> Result<Evaluation> {
        let total = dataset.len();
        let batch_size = batch_size.max(1);

        let model = self.inference_model();

        let mut predictions = Vec::with_capacity(total);
        let mut correct = 0;

        for (batch_id, start) in (0..total).step_by(batch_size).enumerate() {
            let examples: Vec<LabeledExample> = (start..(start + batch_size).min(total))
                .filter_map(|index| dataset.get(index))
                .collect();

            let token_ids_list = examples
                .iter()
                .map(|example| self.encoder.encode(example.text(), &example.aspect))
                .collect::<Result<Vec<_>>>()?;

            for (example, prediction) in examples.iter().zip(self.infer(&model, token_ids_list)) {
                if prediction.sentiment == example.sentiment {
                    correct += 1;
                }

                predictions.push(prediction);
            }

            if log_interval > 0 && batch_id % log_interval == 0 {
                info!(
                    "Predict {:.2}%",
                    predictions.len() as f64 / total as f64 * 100.0
                );
            }
        }

        let accuracy = if predictions.is_empty() {
            0.0
        } else {
            correct as f64 / predictions.len() as f64
        };

        Ok(Evaluation {
            predictions,
            accuracy,
        })
    }

    /// The model used for predictions, with every dropout disabled
    ///
    /// Autodiff backends keep dropout active, so trainable handles predict with a copy of
    /// their weights built from the inference configuration.
    fn inference_model(&self) -> Cow<'_, Model<B>> {
        if !B::ad_enabled() {
            return Cow::Borrowed(&self.model);
        }

        let model = self
            .config
            .for_inference()
            .init::<B>(self.device())
            .load_record(self.model.clone().into_record())
            .no_grad();

        Cow::Owned(model)
    }

    fn infer(&self, model: &Model<B>, token_ids_list: Vec<Vec<usize>>) -> Vec<Prediction> {
        if token_ids_list.is_empty() {
            return Vec::new();
        }

        let n_classes = self.config.n_classes();

        let batch = self.batcher.infer(token_ids_list);
        let scores = tensors::to_vec(model.infer(batch));

        scores
            .chunks(n_classes)
            .zip(argmax_rows(&scores, n_classes))
            .filter_map(|(row, class_id)| {
                let sentiment = self.config.sentiment(class_id)?;

                Some(Prediction {
                    sentiment,
                    scores: [row[0], row[1]],
                })
            })
            .collect()
    }
}

impl<B: AutodiffBackend> Classifier<B> {
    /// Update the parameters by training on the given examples, then save a checkpoint to
    /// the artifact directory
    pub fn train<D: Dataset<LabeledExample>>(
        &mut self,
        dataset_train: D,
        dataset_test: D,
        config: &TrainingConfig,
        artifact_dir: &str,
        use_tui: bool,
    ) -> anyhow::Result<()> {
        training::train(self, dataset_train, dataset_test, config, artifact_dir, use_tui)
    }

    /// A copy on the inner backend, with autodiff and dropout disabled
    pub fn valid(&self) -> Classifier<B::InnerBackend> {
        Classifier {
            model: self.model.valid(),
            config: self.config.clone(),
            encoder: self.encoder.clone(),
            batcher: Batcher::new(&self.config, self.batcher.device.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use burn::tensor::backend::Backend as _;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        datasets::{ExampleDataset, ReviewRecord},
        test_utils::{self, TestBackend},
    };

    fn classifier() -> Classifier<TestBackend> {
        TestBackend::seed(3);

        let device = Default::default();
        let config = test_utils::config();
        let model = config.init::<TestBackend>(&device);

        Classifier::new(model, config, test_utils::tokenizer(), device).unwrap()
    }

    #[test]
    fn test_predictions_are_repeatable() {
        let classifier = classifier();

        let first = classifier.predict_scores("great acting", "acting").unwrap();
        let second = classifier.predict_scores("great acting", "acting").unwrap();

        assert_eq!(first, second);
        assert_eq!(
            classifier.predict("great acting", "acting").unwrap(),
            first.sentiment
        );
        assert!((first.scores[0] + first.scores[1] - 1.0).abs() < 1e-4);
        assert!(first.confidence() >= 0.5);
    }

    #[test]
    fn test_batch_matches_single_predictions() {
        let classifier = classifier();

        let batch = classifier
            .predict_batch(&[("great acting", "acting"), ("boring plot", "plot")])
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch[1].sentiment,
            classifier.predict("boring plot", "plot").unwrap()
        );
    }

    #[test]
    fn test_rejects_empty_inputs() {
        let classifier = classifier();

        assert!(matches!(
            classifier.predict(" ", "acting"),
            Err(Error::EmptyText)
        ));
        assert!(matches!(
            classifier.predict("great acting", ""),
            Err(Error::EmptyAspect)
        ));
        assert!(classifier.predict_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_evaluate() {
        let classifier = classifier();
        let examples: Vec<LabeledExample> = [
            ("great acting", Sentiment::Positive),
            ("boring plot", Sentiment::Negative),
            ("fun movie", Sentiment::Positive),
        ]
        .into_iter()
        .map(|(text, label)| {
            LabeledExample::from_record(
                ReviewRecord::new(text, label).unwrap(),
                Aspect::new("movie").unwrap(),
            )
        })
        .collect();

        let evaluation = classifier
            .evaluate(&ExampleDataset::new(examples.clone()), 2, 1)
            .unwrap();

        let correct = evaluation
            .predictions
            .iter()
            .zip(&examples)
            .filter(|(prediction, example)| prediction.sentiment == example.sentiment)
            .count();

        assert_eq!(evaluation.predictions.len(), 3);
        assert_eq!(evaluation.accuracy, correct as f64 / 3.0);
    }

    #[test]
    fn test_rejects_foreign_label_maps() {
        let device = Default::default();
        let mut config = test_utils::config();
        config.id2label.insert(2, "neutral".to_string());
        let model = config.init::<TestBackend>(&device);

        let result = Classifier::new(model, config, test_utils::tokenizer(), device);

        assert!(matches!(result, Err(Error::Checkpoint(_))));
    }

    #[test]
    fn test_trainable_handles_predict_without_dropout() {
        type TrainBackend = burn::backend::Autodiff<TestBackend>;
        TrainBackend::seed(8);

        let device = Default::default();
        let mut config = test_utils::config().with_classifier_dropout(0.5);
        config.bert.hidden_dropout_prob = 0.5;
        let model = config.init::<TrainBackend>(&device);

        let classifier =
            Classifier::new(model, config, test_utils::tokenizer(), device).unwrap();

        let first = classifier.predict_scores("great acting", "acting").unwrap();
        for _ in 0..10 {
            assert_eq!(
                classifier.predict_scores("great acting", "acting").unwrap(),
                first
            );
        }

        let valid = classifier.valid().predict_scores("great acting", "acting").unwrap();
        assert_eq!(valid.sentiment, first.sentiment);
        assert!((valid.scores[0] - first.scores[0]).abs() < 1e-5);
    }

    #[test]
    fn test_long_reviews_depend_on_the_aspect() {
        TestBackend::seed(6);

        let device = Default::default();
        let config = test_utils::config().with_max_seq_len(6);
        let model = config.init::<TestBackend>(&device);
        let classifier = Classifier::new(model, config, test_utils::tokenizer(), device).unwrap();

        let text = "great movie fun plot dull acting boring";
        let acting = classifier.predict_scores(text, "acting").unwrap();
        let plot = classifier.predict_scores(text, "plot").unwrap();

        assert_ne!(acting.scores, plot.scores);
    }
}
