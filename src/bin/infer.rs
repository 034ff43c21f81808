//! Command line tool to classify the sentiment of reviews toward an aspect

use anyhow::{anyhow, Result};
use burn::backend::{libtorch::LibTorchDevice, LibTorch};
use burn_absa::{
    cli::{datasets::corpus_config, models::Model},
    datasets::{Aspect, Corpus, ExampleDataset},
    pipelines::aspect_sentiment::{artifact_dir, Classifier, Prediction},
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: infer [OPTIONS] TEXT...
       infer [OPTIONS] --corpus FILE

Arguments:
  TEXT                 One or more review texts to classify

Options:
  -h, --help           Print help
  -a, --aspect         The aspect to classify the sentiment toward (required)
  -m, --model          The model the artifacts were trained from (defaults to 'bert-base-multilingual-cased')
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  --artifact-dir       The trained model directory (defaults to DATA_DIR/aspect-sentiment/MODEL)
  --scores             Print the class probabilities along with the sentiment
  --cpu                Run on the CPU instead of the first CUDA device

Corpus scoring:
  --corpus             A labeled corpus to score, printing the accuracy
  --text-col           Zero-based review text column (defaults to 1)
  --label-col          Zero-based label column (defaults to 0)
  --has-headers        Discard the first line of the corpus
  -b, --batch-size     Inference batch size (defaults to 64)
  --show               Print every prediction along with its label
";

const DEFAULT_BATCH_SIZE: usize = 64;

const LOG_INTERVAL: usize = 100;

#[derive(Debug)]
struct Args {
    /// The aspect term
    aspect: String,

    /// The model the artifacts were trained from
    model: Option<String>,

    /// The top-level data directory
    data_dir: Option<String>,

    /// An explicit artifact directory
    artifact_dir: Option<String>,

    /// Print class probabilities
    scores: bool,

    /// Run on the CPU
    cpu: bool,

    /// A labeled corpus to score instead of the given texts
    corpus: Option<String>,

    /// Corpus text column
    text_col: Option<usize>,

    /// Corpus label column
    label_col: Option<usize>,

    /// Whether the corpus starts with a header line
    has_headers: bool,

    /// Corpus inference batch size
    batch_size: usize,

    /// Print every corpus prediction
    show: bool,

    /// The review texts
    texts: Vec<String>,
}

impl Args {
    fn parse() -> Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let aspect = pargs
            .opt_value_from_str(["-a", "--aspect"])?
            .ok_or_else(|| anyhow!("Missing required option: --aspect"))?;

        let mut args = Args {
            aspect,
            model: pargs.opt_value_from_str(["-m", "--model"])?,
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            artifact_dir: pargs.opt_value_from_str("--artifact-dir")?,
            scores: pargs.contains("--scores"),
            cpu: pargs.contains("--cpu"),
            corpus: pargs.opt_value_from_str("--corpus")?,
            text_col: pargs.opt_value_from_str("--text-col")?,
            label_col: pargs.opt_value_from_str("--label-col")?,
            has_headers: pargs.contains("--has-headers"),
            batch_size: pargs
                .opt_value_from_str(["-b", "--batch-size"])?
                .unwrap_or(DEFAULT_BATCH_SIZE),
            show: pargs.contains("--show"),
            texts: Vec::new(),
        };

        for text in pargs.finish() {
            let text = text
                .into_string()
                .map_err(|text| anyhow!("Review text is not valid UTF-8: {:?}", text))?;

            args.texts.push(text);
        }

        match (&args.corpus, args.texts.is_empty()) {
            (None, true) => return Err(anyhow!("Missing required argument: TEXT")),
            (Some(_), false) => return Err(anyhow!("Give either TEXT or --corpus, not both")),
            _ => {}
        }

        Ok(Some(args))
    }

    fn artifact_dir(&self) -> Result<String> {
        if let Some(dir) = &self.artifact_dir {
            return Ok(dir.clone());
        }

        let model = match &self.model {
            Some(model) => Model::try_from(model.as_str())?,
            None => Model::default(),
        };

        let data_dir = self.data_dir.as_deref().unwrap_or("data");

        Ok(artifact_dir(data_dir, model.name()))
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let device = if args.cpu {
        LibTorchDevice::Cpu
    } else {
        LibTorchDevice::Cuda(0)
    };

    let artifact_dir = args.artifact_dir()?;
    let classifier = Classifier::<LibTorch>::load(&artifact_dir, &device)
        .map_err(|e| anyhow!("Unable to load the model from {}: {}", artifact_dir, e))?;

    match &args.corpus {
        Some(corpus) => score_corpus(&classifier, corpus, &args),
        None => classify_texts(&classifier, &args),
    }
}

fn print_prediction(text: &str, prediction: &Prediction, scores: bool) {
    if scores {
        println!(
            "{}\t{}\tnegative={:.4}\tpositive={:.4}",
            prediction.sentiment, text, prediction.scores[0], prediction.scores[1]
        );
    } else {
        println!("{}\t{}", prediction.sentiment, text);
    }
}

fn classify_texts(classifier: &Classifier<LibTorch>, args: &Args) -> Result<()> {
    let inputs: Vec<(&str, &str)> = args
        .texts
        .iter()
        .map(|text| (text.as_str(), args.aspect.as_str()))
        .collect();

    let predictions = classifier.predict_batch(&inputs)?;

    for (text, prediction) in args.texts.iter().zip(&predictions) {
        print_prediction(text, prediction, args.scores);
    }

    Ok(())
}

/// Score a labeled corpus, reporting the share of reviews classified correctly
fn score_corpus(classifier: &Classifier<LibTorch>, path: &str, args: &Args) -> Result<()> {
    let aspect = Aspect::new(&args.aspect)?;
    let layout = corpus_config(args.text_col, args.label_col, args.has_headers);

    let examples = Corpus::open(path, layout)?.examples(&aspect)?;
    let dataset = ExampleDataset::new(examples.clone());

    let evaluation = classifier.evaluate(&dataset, args.batch_size, LOG_INTERVAL)?;

    if args.show {
        for (example, prediction) in examples.iter().zip(&evaluation.predictions) {
            print!("{}\t", example.sentiment);
            print_prediction(example.text(), prediction, args.scores);
        }
    }

    println!(
        "Accuracy: {:.4} ({} reviews)",
        evaluation.accuracy,
        evaluation.predictions.len()
    );

    Ok(())
}
