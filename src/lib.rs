//! # Burn ABSA
//!
//! Aspect-based sentiment analysis of movie reviews on top of a pretrained BERT encoder.
#![forbid(unsafe_code)]

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// Datasets
pub mod datasets;

/// Utilities
pub mod utils;

/// CLI indexes and utilities
pub mod cli;

/// Library errors
pub mod error;

pub use error::{Error, Result};

#[cfg(test)]
mod test_utils;

/// Error macros
#[macro_use]
extern crate anyhow;
