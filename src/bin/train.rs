//! Command line tool to fine-tune the aspect sentiment classifier

use anyhow::anyhow;
use burn::{
    backend::{libtorch::LibTorchDevice, Autodiff, LibTorch},
    config::Config as _,
    data::dataset::Dataset as ItemDataset,
    tensor::backend::Backend,
};
use burn_absa::{
    cli::{
        datasets::{corpus_config, Dataset},
        models::Model,
    },
    datasets::{
        nsmc, split, Aspect, Corpus, ExampleDataset, LabeledExample, LoadableDataset,
    },
    pipelines::aspect_sentiment::{artifact_dir, Classifier, TrainingConfig},
};
use log::info;
use pico_args::Arguments;

type TrainBackend = Autodiff<LibTorch>;

/// Share of a single TSV corpus kept for training when no test file is given
const TRAIN_RATIO: f64 = 0.8;

const HELP: &str = "\
Usage: train DATASET [OPTIONS]

Arguments:
  DATASET              The dataset to use ('nsmc' or 'tsv')

Options:
  -h, --help           Print help
  -m, --model          The model to use (defaults to 'bert-base-multilingual-cased')
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  -n, --num-epochs     Number of epochs to train for
  -b, --batch-size     Batch size
  -a, --aspect         The aspect assigned to every review (defaults to '영화')
  -c, --config         A training config JSON file to start from
  --train-file         The 'label \\t text' training corpus (required for 'tsv')
  --test-file          The 'label \\t text' test corpus (split from the training file if absent)
  --text-col           Zero-based review text column of the 'tsv' files (defaults to 1)
  --label-col          Zero-based label column of the 'tsv' files (defaults to 0)
  --has-headers        Discard the first line of the 'tsv' files
  --cpu                Train on the CPU instead of the first CUDA device
  --no-tui             Disable TUI
";

#[derive(Debug)]
struct Args {
    dataset: String,
    model: Option<String>,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    data_dir: Option<String>,
    aspect: Option<String>,
    config: Option<String>,
    train_file: Option<String>,
    test_file: Option<String>,
    text_col: Option<usize>,
    label_col: Option<usize>,
    has_headers: bool,
    cpu: bool,
    use_tui: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            model: pargs.opt_value_from_str(["-m", "--model"])?,
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            aspect: pargs.opt_value_from_str(["-a", "--aspect"])?,
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            train_file: pargs.opt_value_from_str("--train-file")?,
            test_file: pargs.opt_value_from_str("--test-file")?,
            text_col: pargs.opt_value_from_str("--text-col")?,
            label_col: pargs.opt_value_from_str("--label-col")?,
            has_headers: pargs.contains("--has-headers"),
            cpu: pargs.contains("--cpu"),
            use_tui: !(pargs.contains("--no-tui")),
            dataset: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: DATASET"),
                _ => anyhow!("{}", e),
            })?,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        Ok(Some(args))
    }

    /// Start from the config file or the defaults, then apply command line overrides
    fn training_config(&self, model: &Model) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::load(path)
                .map_err(|e| anyhow!("Unable to load training config {}: {}", path, e))?,
            None => TrainingConfig::new(),
        };

        if self.model.is_some() || self.config.is_none() {
            config.model_name = model.to_string();
        }

        if let Some(num_epochs) = self.num_epochs {
            config.num_epochs = num_epochs;
        }

        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }

        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.to_string();
        }

        if let Some(aspect) = &self.aspect {
            config.default_aspect = aspect.to_string();
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let output = Args::parse()?;

    let Some(args) = output else {
        print!("{}", HELP);

        return Ok(());
    };

    let dataset = Dataset::try_from(args.dataset.as_str())?;

    let model = match &args.model {
        Some(model) => Model::try_from(model.as_str())?,
        None => Model::default(),
    };

    let config = args.training_config(&model)?;
    let aspect = Aspect::new(&config.default_aspect)?;

    let device = if args.cpu {
        LibTorchDevice::Cpu
    } else {
        LibTorchDevice::Cuda(0)
    };

    TrainBackend::seed(config.seed);

    info!("Training {} on {} for aspect '{}'", config.model_name, dataset, aspect);

    let mut classifier =
        Classifier::<TrainBackend>::from_pretrained(&config.model_name, &config, &device).await?;

    let artifact_dir = artifact_dir(&config.data_dir, &config.model_name);

    match dataset {
        Dataset::Nsmc => {
            let train = nsmc::Dataset::load(&config.data_dir, "train", &aspect)?;
            let test = nsmc::Dataset::load(&config.data_dir, "test", &aspect)?;

            fit(&mut classifier, train, test, &config, &artifact_dir, args.use_tui)
        }
        Dataset::Tsv => {
            let train_file = args
                .train_file
                .as_deref()
                .ok_or_else(|| anyhow!("The 'tsv' dataset requires --train-file"))?;

            let layout = corpus_config(args.text_col, args.label_col, args.has_headers);
            let train_corpus = Corpus::open(train_file, layout.clone())?;

            let (train, test) = match &args.test_file {
                Some(test_file) => {
                    let test_corpus = Corpus::open(test_file, layout)?;

                    (
                        ExampleDataset::from_corpus(&train_corpus, &aspect)?,
                        ExampleDataset::from_corpus(&test_corpus, &aspect)?,
                    )
                }
                None => {
                    let examples = train_corpus.examples(&aspect)?;
                    let (train, test) = split(examples, TRAIN_RATIO, config.seed)?;

                    (ExampleDataset::new(train), ExampleDataset::new(test))
                }
            };

            fit(&mut classifier, train, test, &config, &artifact_dir, args.use_tui)
        }
    }
}

/// Train, then report the accuracy on the test set without autodiff
fn fit<D: ItemDataset<LabeledExample>>(
    classifier: &mut Classifier<TrainBackend>,
    train: D,
    test: D,
    config: &TrainingConfig,
    artifact_dir: &str,
    use_tui: bool,
) -> anyhow::Result<()> {
    info!("{} training / {} test examples", train.len(), test.len());

    // The learner consumes the test split, so keep a copy for the final evaluation
    let test_examples: Vec<_> = test.iter().collect();

    classifier.train(train, test, config, artifact_dir, use_tui)?;

    let evaluation = classifier.valid().evaluate(
        &ExampleDataset::new(test_examples),
        config.batch_size,
        config.log_interval,
    )?;

    info!(
        "Test accuracy: {:.2}% ({} reviews)",
        evaluation.accuracy * 100.0,
        evaluation.predictions.len()
    );

    println!("Saved model to {}", artifact_dir);
    println!("Test accuracy: {:.4}", evaluation.accuracy);

    Ok(())
}
