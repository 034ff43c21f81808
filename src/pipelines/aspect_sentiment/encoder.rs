use burn::data::dataset::{Dataset, InMemDataset};
use derive_new::new;
use tokenizers::{Tokenizer, TruncationParams, TruncationStrategy};

use crate::{
    datasets::{Aspect, LabeledExample},
    Error, Result,
};

/// A labeled example after tokenization
#[derive(Clone, Debug, new)]
pub struct Encoded {
    /// Token ids of the (review, aspect) pair
    pub token_ids: Vec<usize>,

    /// Class id of the sentiment
    pub class_id: usize,
}

/// Tokenizes reviews paired with the aspect in question
#[derive(Clone)]
pub struct PairEncoder {
    tokenizer: Tokenizer,
    max_seq_len: usize,
}

impl PairEncoder {
    /// Wrap a tokenizer, limiting encoded pairs to `max_seq_len` tokens
    ///
    /// Only the review is shortened, so the aspect and both separators always survive.
    pub fn new(mut tokenizer: Tokenizer, max_seq_len: usize) -> Result<Self> {
        tokenizer.with_truncation(Some(TruncationParams {
            max_length: max_seq_len,
            strategy: TruncationStrategy::OnlyFirst,
            ..Default::default()
        }))?;

        Ok(Self {
            tokenizer,
            max_seq_len,
        })
    }

    /// The maximum number of tokens in an encoded pair
    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    /// The underlying tokenizer
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Encode a review and aspect as a sentence pair, with special tokens
    ///
    /// Fails with a tokenizer error when the aspect alone leaves no room for the review.
    pub fn encode(&self, text: &str, aspect: &Aspect) -> Result<Vec<usize>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }

        let encoding = self.tokenizer.encode((text, aspect.as_str()), true)?;

        Ok(encoding.get_ids().iter().map(|t| *t as usize).collect())
    }

    /// Encode a labeled example
    pub fn encode_example(&self, example: &LabeledExample) -> Result<Encoded> {
        let token_ids = self.encode(example.text(), &example.aspect)?;

        Ok(Encoded::new(token_ids, example.sentiment.class_id()))
    }

    /// Tokenize a whole dataset up front
    pub fn encode_dataset<D: Dataset<LabeledExample>>(
        &self,
        dataset: &D,
    ) -> Result<InMemDataset<Encoded>> {
        let items = dataset
            .iter()
            .map(|example| self.encode_example(&example))
            .collect::<Result<Vec<_>>>()?;

        Ok(InMemDataset::new(items))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        datasets::{ReviewRecord, Sentiment},
        test_utils,
    };

    #[test]
    fn test_encode_pair() {
        let encoder = PairEncoder::new(test_utils::tokenizer(), 16).unwrap();

        let ids = encoder
            .encode("great acting", &Aspect::new("acting").unwrap())
            .unwrap();

        // [CLS] great acting [SEP] acting [SEP]
        assert_eq!(ids, vec![2, 4, 6, 3, 6, 3]);
    }

    #[test]
    fn test_unknown_words() {
        let encoder = PairEncoder::new(test_utils::tokenizer(), 16).unwrap();

        let ids = encoder
            .encode("zzz", &Aspect::new("plot").unwrap())
            .unwrap();

        assert_eq!(ids, vec![2, 1, 3, 7, 3]);
    }

    #[test]
    fn test_blank_text() {
        let encoder = PairEncoder::new(test_utils::tokenizer(), 16).unwrap();

        let result = encoder.encode("  ", &Aspect::new("plot").unwrap());

        assert!(matches!(result, Err(Error::EmptyText)));
    }

    #[test]
    fn test_encode_example() {
        let encoder = PairEncoder::new(test_utils::tokenizer(), 16).unwrap();
        let example = LabeledExample::from_record(
            ReviewRecord::new("boring plot", Sentiment::Negative).unwrap(),
            Aspect::new("plot").unwrap(),
        );

        let encoded = encoder.encode_example(&example).unwrap();

        assert_eq!(encoded.class_id, 0);
        assert_eq!(encoded.token_ids, vec![2, 5, 7, 3, 7, 3]);
    }

    #[test]
    fn test_long_reviews_keep_the_aspect() {
        let encoder = PairEncoder::new(test_utils::tokenizer(), 6).unwrap();

        let acting = encoder
            .encode("great movie fun plot", &Aspect::new("acting").unwrap())
            .unwrap();
        let plot = encoder
            .encode("great movie fun plot", &Aspect::new("plot").unwrap())
            .unwrap();

        // [CLS] great movie [SEP] aspect [SEP]
        assert_eq!(acting, vec![2, 4, 8, 3, 6, 3]);
        assert_eq!(plot, vec![2, 4, 8, 3, 7, 3]);
        assert_ne!(acting, plot);
    }

    #[test]
    fn test_short_reviews_are_not_truncated() {
        let encoder = PairEncoder::new(test_utils::tokenizer(), 6).unwrap();

        let ids = encoder
            .encode("fun movie", &Aspect::new("plot").unwrap())
            .unwrap();

        assert_eq!(ids, vec![2, 9, 8, 3, 7, 3]);
        assert_eq!(encoder.max_seq_len(), 6);
    }
}
