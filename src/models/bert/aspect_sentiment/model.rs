use bert_burn::{
    data::BertInferenceBatch,
    model::{BertModel, BertModelOutput},
};
use burn::{
    module::{Module, ModuleMapper, ParamId},
    nn::{loss::CrossEntropyLossConfig, Dropout, Linear},
    tensor::{activation::softmax, backend::Backend, Tensor},
    train::ClassificationOutput,
};
use derive_new::new;

use crate::pipelines::aspect_sentiment::batcher;

/// BERT for Aspect-Based Sentiment Analysis
#[derive(Module, Debug, new)]
pub struct Model<B: Backend> {
    /// The base BERT model
    pub bert: BertModel<B>,

    /// Dropout applied to the pooled output
    pub dropout: Dropout,

    /// Linear layer for sentiment classification
    pub output: Linear<B>,

    /// Total number of classes
    pub n_classes: usize,
}

/// Marks every float parameter as trainable
struct RequireGrad;

impl<B: Backend> ModuleMapper<B> for RequireGrad {
    fn map_float<const D: usize>(&mut self, _id: &ParamId, tensor: Tensor<B, D>) -> Tensor<B, D> {
        tensor.set_require_grad(true)
    }
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Freeze or unfreeze the pretrained encoder. The classification head stays trainable.
    pub fn with_frozen_encoder(mut self, frozen: bool) -> Self {
        self.bert = if frozen {
            self.bert.no_grad()
        } else {
            self.bert.map(&mut RequireGrad)
        };

        self
    }

    /// Class scores before softmax: [batch_size, n_classes]
    fn logits(&self, input: batcher::Infer<B>) -> Tensor<B, 2> {
        let [batch_size, _seq_length] = input.tokens.dims();

        let BertModelOutput {
            pooled_output,
            hidden_states,
        } = self.bert.forward(BertInferenceBatch {
            tokens: input.tokens,
            mask_pad: input.mask_pad,
        });

        let pooled = self.dropout.forward(pooled_output.unwrap_or(hidden_states));

        self.output
            .forward(pooled)
            .slice([0..batch_size, 0..1])
            .reshape([batch_size, self.n_classes])
    }

    /// Defines forward pass for training
    pub fn forward(&self, item: batcher::Train<B>) -> ClassificationOutput<B> {
        let device = &self.bert.devices()[0];

        let targets = item.targets.to_device(device);

        let output = self.logits(item.input);

        let loss = CrossEntropyLossConfig::new()
            .init(&output.device())
            .forward(output.clone(), targets.clone());

        ClassificationOutput {
            loss,
            output,
            targets,
        }
    }

    /// Defines forward pass for inference, returning softmax scores per class
    pub fn infer(&self, input: batcher::Infer<B>) -> Tensor<B, 2> {
        softmax(self.logits(input), 1)
    }
}
