/// The persisted artifact bundle shared by train and test
pub mod artifacts;

/// Batcher
pub mod batcher;

/// Inference
pub mod inference;

/// Text Classification Items
pub mod item;

/// Training
pub mod training;

pub use batcher::Batcher;
pub use inference::predict_classes;
pub use item::Item;
pub use training::train;
