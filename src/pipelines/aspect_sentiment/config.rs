use burn::{
    lr_scheduler::noam::{NoamLrScheduler, NoamLrSchedulerConfig},
    LearningRate,
};

/// Define configuration struct for the experiment
#[derive(burn::config::Config, Debug)]
pub struct TrainingConfig {
    /// Batch size
    #[config(default = 64)]
    pub batch_size: usize,

    /// Number of epochs
    #[config(default = 5)]
    pub num_epochs: usize,

    /// Maximum tokenized length of a (review, aspect) pair
    #[config(default = 64)]
    pub max_seq_len: usize,

    /// Adam epsilon
    #[config(default = 1e-8)]
    pub adam_epsilon: f32,

    /// Peak learning rate, reached at the end of warmup
    #[config(default = 5e-5)]
    pub learning_rate: LearningRate,

    /// Dropout rate inside the encoder
    #[config(default = 0.1)]
    pub hidden_dropout_prob: f64,

    /// Dropout rate before the classification head
    #[config(default = 0.5)]
    pub classifier_dropout: f64,

    /// Share of the total steps spent warming up the learning rate
    #[config(default = 0.2)]
    pub warmup_ratio: f64,

    /// Gradient norm clipping threshold
    #[config(default = 1.0)]
    pub max_grad_norm: f32,

    /// How many batches between evaluation progress logs
    #[config(default = 100)]
    pub log_interval: usize,

    /// Seed for weight initialization and shuffling
    #[config(default = 42)]
    pub seed: u64,

    /// Data loader worker threads
    #[config(default = 4)]
    pub num_workers: usize,

    /// Train only the classification head, keeping the pretrained encoder fixed
    #[config(default = false)]
    pub freeze_encoder: bool,

    /// The aspect assigned to reviews when the corpus has no aspect column
    #[config(default = "\"영화\".to_string()")]
    pub default_aspect: String,

    /// The location of the top-level data directory
    #[config(default = "\"data\".to_string()")]
    pub data_dir: String,

    /// Model name (e.g., "bert-base-multilingual-cased")
    #[config(default = "\"bert-base-multilingual-cased\".to_string()")]
    pub model_name: String,
}

impl TrainingConfig {
    /// Total optimizer steps for a training set of the given size
    pub fn total_steps(&self, train_len: usize) -> usize {
        let batch_size = self.batch_size.max(1);

        train_len.div_ceil(batch_size) * self.num_epochs
    }

    /// Learning rate warmup steps for a training set of the given size
    pub fn warmup_steps(&self, train_len: usize) -> usize {
        let steps = (self.total_steps(train_len) as f64 * self.warmup_ratio) as usize;

        steps.max(1)
    }

    /// A Noam schedule that warms up to `learning_rate` and then decays with the inverse
    /// square root of the step
    ///
    /// Noam scales its base rate by `(model_size * warmup_steps)^-0.5` at the peak, so the
    /// base rate is raised by the same factor.
    pub fn lr_scheduler(&self, model_size: usize, train_len: usize) -> NoamLrScheduler {
        let warmup_steps = self.warmup_steps(train_len);
        let scale = ((model_size.max(1) * warmup_steps) as f64).sqrt();

        NoamLrSchedulerConfig::new(self.learning_rate * scale)
            .with_warmup_steps(warmup_steps)
            .with_model_size(model_size.max(1))
            .init()
    }
}
