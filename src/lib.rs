//! # AutoDL Text
//!
//! A separable-convolution CNN baseline for AutoML-style text classification,
//! built on the Burn deep learning framework. Raw English or Chinese text is
//! vectorized into padded integer sequences, a lightweight sep-CNN is trained
//! with early stopping, and the fitted tokenizer, network configuration, and
//! weights persist as one bundle that inference reloads.
#![forbid(unsafe_code)]

/// The train/test lifecycle wrapper
pub mod automl;

/// Datasets
pub mod datasets;

/// Error taxonomy
pub mod errors;

/// Dataset metadata
pub mod metadata;

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// Text preprocessing
pub mod text;

/// Utilities
pub mod utils;

pub use errors::{Error, Result};
