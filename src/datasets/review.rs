use std::fmt::Display;

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The sentiment polarity of a review toward an aspect
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Corpus label `0`
    Negative,

    /// Corpus label `1`
    Positive,
}

impl Sentiment {
    /// Every sentiment, ordered by class id
    pub const ALL: [Sentiment; 2] = [Sentiment::Negative, Sentiment::Positive];

    /// The class id used by the classification head
    pub fn class_id(&self) -> usize {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Positive => 1,
        }
    }

    /// Map a class id back to a sentiment
    pub fn from_class_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    /// Parse a raw corpus label field
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(Sentiment::Negative),
            "1" => Some(Sentiment::Positive),
            _ => None,
        }
    }

    /// The class name label stored in model configs
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Positive => "positive",
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sub-topic of interest within a review, such as "acting" or "plot"
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Aspect(String);

impl Aspect {
    /// Create an aspect term, rejecting blank input
    pub fn new(term: impl AsRef<str>) -> Result<Self> {
        let term = term.as_ref().trim();

        if term.is_empty() {
            return Err(Error::EmptyAspect);
        }

        Ok(Self(term.to_string()))
    }

    /// The aspect term
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Aspect {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Aspect::new(value)
    }
}

/// One review parsed from the corpus
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    text: String,
    label: Sentiment,
}

impl ReviewRecord {
    /// Create a record, rejecting blank review text
    pub fn new(text: impl AsRef<str>, label: Sentiment) -> Result<Self> {
        let text = text.as_ref().trim();

        if text.is_empty() {
            return Err(Error::EmptyText);
        }

        Ok(Self {
            text: text.to_string(),
            label,
        })
    }

    /// The review text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The review-level sentiment label
    pub fn label(&self) -> Sentiment {
        self.label
    }
}

/// The unit consumed by training: a review, the aspect in question, and its sentiment
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, new)]
pub struct LabeledExample {
    /// The review
    pub record: ReviewRecord,

    /// The aspect the sentiment refers to
    pub aspect: Aspect,

    /// The sentiment toward the aspect
    pub sentiment: Sentiment,
}

impl LabeledExample {
    /// Label an aspect with the review-level sentiment
    pub fn from_record(record: ReviewRecord, aspect: Aspect) -> Self {
        let sentiment = record.label();

        Self::new(record, aspect, sentiment)
    }

    /// The review text
    pub fn text(&self) -> &str {
        self.record.text()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sentiment_labels() {
        assert_eq!(Sentiment::from_label("0"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_label(" 1 "), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_label("2"), None);
        assert_eq!(Sentiment::from_label("positive"), None);
    }

    #[test]
    fn test_sentiment_class_ids() {
        for sentiment in Sentiment::ALL {
            assert_eq!(Sentiment::from_class_id(sentiment.class_id()), Some(sentiment));
        }

        assert_eq!(Sentiment::from_class_id(2), None);
    }

    #[test]
    fn test_blank_aspect_is_rejected() {
        assert!(matches!(Aspect::new("   "), Err(Error::EmptyAspect)));
        assert_eq!(Aspect::new(" 연기 ").unwrap().as_str(), "연기");
    }

    #[test]
    fn test_blank_text_is_rejected() {
        assert!(matches!(
            ReviewRecord::new("\t", Sentiment::Positive),
            Err(Error::EmptyText)
        ));
    }

    #[test]
    fn test_example_takes_record_label() {
        let record = ReviewRecord::new("연기가 훌륭했다", Sentiment::Positive).unwrap();
        let example = LabeledExample::from_record(record, Aspect::new("acting").unwrap());

        assert_eq!(example.sentiment, Sentiment::Positive);
        assert_eq!(example.text(), "연기가 훌륭했다");
    }
}
