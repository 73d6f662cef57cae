use async_trait::async_trait;

/// CSV-backed labeled text datasets
pub mod labeled;

/// A dataset which can be loaded from disk
#[async_trait]
pub trait LoadableDataset<I>: burn::data::dataset::Dataset<I> {
    /// Load the dataset from the given path
    async fn load(path: &str) -> std::io::Result<Self>
    where
        Self: std::marker::Sized;
}
