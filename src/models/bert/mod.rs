/// BERT for Aspect-Based Sentiment Analysis
pub mod aspect_sentiment;

/// Pretrained weight loading
pub mod loader;
