use burn::{
    data::dataloader,
    nn::attention::generate_padding_mask,
    tensor::{backend::Backend, Bool, Int, Tensor},
};
use derive_new::new;

use crate::{models::bert::aspect_sentiment::Config, utils::tensors};

use super::Encoded;

/// An inference batch of (review, aspect) pairs
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// Tokenized pairs as 2D tensor: [batch_size, max_seq_length]
    pub tokens: Tensor<B, 2, Int>,

    /// Padding mask for the tokenized pairs containing booleans for padding locations
    pub mask_pad: Tensor<B, 2, Bool>,
}

/// A training batch of (review, aspect) pairs
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// Bert Model input
    pub input: Infer<B>,

    /// Sentiment class ids for the batch
    pub targets: Tensor<B, 1, Int>,
}

/// Struct for batching encoded (review, aspect) pairs
#[derive(Clone, Debug)]
pub struct Batcher<B: Backend> {
    /// Maximum sequence length for tokenized text
    pub max_seq_length: usize,

    /// ID of the padding token
    pub pad_token_id: usize,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(config: &Config, device: B::Device) -> Self {
        Self {
            max_seq_length: config.max_seq_len,
            pad_token_id: config.bert.pad_token_id,
            device,
        }
    }

    /// Pads token id lists into an inference batch, truncating to the max sequence length
    pub fn infer(&self, token_ids_list: Vec<Vec<usize>>) -> Infer<B> {
        let padding = generate_padding_mask(
            self.pad_token_id,
            token_ids_list,
            Some(self.max_seq_length),
            &self.device,
        );

        Infer {
            tokens: padding.tensor,
            mask_pad: padding.mask,
        }
    }
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<Vec<usize>, Infer<B>> for Batcher<B> {
    fn batch(&self, items: Vec<Vec<usize>>) -> Infer<B> {
        self.infer(items)
    }
}

/// Implement Batcher trait for Batcher struct for training
impl<B: Backend> dataloader::batcher::Batcher<Encoded, Train<B>> for Batcher<B> {
    /// Collects encoded examples into a training batch
    fn batch(&self, items: Vec<Encoded>) -> Train<B> {
        let class_ids: Vec<usize> = items.iter().map(|item| item.class_id).collect();
        let token_ids_list = items.into_iter().map(|item| item.token_ids).collect();

        Train {
            input: self.infer(token_ids_list),
            targets: tensors::class_ids(&class_ids, &self.device),
        }
    }
}
