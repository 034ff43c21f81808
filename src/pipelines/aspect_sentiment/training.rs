use burn::{
    config::Config as _,
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    grad_clipping::GradientClippingConfig,
    optim::AdamWConfig,
    record::CompactRecorder,
    tensor::backend::AutodiffBackend,
    train::{
        metric::{AccuracyMetric, LearningRateMetric, LossMetric},
        LearnerBuilder,
    },
};
use log::info;

use crate::{datasets::LabeledExample, utils::renderer};

use super::{Batcher, Classifier, TrainingConfig};

/// Train the classifier in place, then save a checkpoint to the artifact directory
///
/// Parameters are replaced only once fitting completes. A failure while saving leaves the
/// trained parameters in memory without a checkpoint on disk.
pub fn train<B, D>(
    classifier: &mut Classifier<B>,
    dataset_train: D, // Training dataset
    dataset_test: D,  // Testing dataset
    config: &TrainingConfig,
    artifact_dir: &str, // Directory to save model and config files
    use_tui: bool,
) -> anyhow::Result<()>
where
    B: AutodiffBackend,
    D: Dataset<LabeledExample>,
{
    let device = classifier.device().clone();

    // Tokenize up front so that batching cannot fail mid-epoch
    let train = classifier.encoder.encode_dataset(&dataset_train)?;
    let test = classifier.encoder.encode_dataset(&dataset_test)?;

    let n_train = train.len();
    if n_train == 0 {
        return Err(anyhow!("The training set is empty"));
    }

    info!(
        "Training on {} examples, validating on {}",
        n_train,
        test.len()
    );

    if config.freeze_encoder {
        info!("Freezing the pretrained encoder");
    }

    let model = classifier
        .model
        .clone()
        .with_frozen_encoder(config.freeze_encoder);

    // Initialize batchers for training and testing data
    let batcher_train = Batcher::<B>::new(&classifier.config, device.clone());
    let batcher_test = Batcher::<B::InnerBackend>::new(&classifier.config, device.clone());

    // Initialize data loaders for training and testing data
    let dataloader_train = DataLoaderBuilder::new(batcher_train)
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .num_workers(config.num_workers)
        .build(train);

    let dataloader_test = DataLoaderBuilder::new(batcher_test)
        .batch_size(config.batch_size * 2)
        .num_workers(config.num_workers)
        .build(test);

    // Initialize optimizer
    let optimizer = AdamWConfig::new()
        .with_epsilon(config.adam_epsilon)
        .with_grad_clipping(Some(GradientClippingConfig::Norm(config.max_grad_norm)))
        .init();

    // Initialize learning rate scheduler
    let lr_scheduler = config.lr_scheduler(classifier.config.bert.hidden_size, n_train);

    // Initialize learner
    let mut builder = LearnerBuilder::new(artifact_dir)
        .metric_train_numeric(AccuracyMetric::new())
        .metric_valid_numeric(AccuracyMetric::new())
        .metric_train_numeric(LossMetric::new())
        .metric_valid_numeric(LossMetric::new())
        .metric_train_numeric(LearningRateMetric::new())
        .with_file_checkpointer(CompactRecorder::new())
        .devices(vec![device])
        .num_epochs(config.num_epochs)
        .summary();

    if !use_tui {
        builder = builder.renderer(renderer::Simple::new());
    }

    let learner = builder.build(model, optimizer, lr_scheduler);

    // Train the model
    classifier.model = learner.fit(dataloader_train, dataloader_test);

    // Save the configurations and the trained model
    classifier.save(artifact_dir)?;

    config
        .save(format!("{artifact_dir}/training.json"))
        .map_err(|e| anyhow!("Unable to save training config: {}", e))?;

    Ok(())
}
