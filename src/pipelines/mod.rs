/// Aspect-Based Sentiment Analysis
pub mod aspect_sentiment;
