use async_trait::async_trait;
use burn::data::dataset::{self, InMemDataset};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{Error, Result},
    utils::classes,
};

use super::LoadableDataset;

/// One CSV row: the text plus an optional class index
///
/// Prediction inputs may omit the label column.
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Row {
    /// The text for classification
    pub text: String,

    /// The class index, when labeled
    #[serde(default)]
    pub label: Option<usize>,
}

/// A labeled text dataset read from a `text,label` CSV file
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Row>,
}

impl dataset::Dataset<Row> for Dataset {
    /// Returns a specific row from the dataset
    fn get(&self, index: usize) -> Option<Row> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

#[async_trait]
impl LoadableDataset<Row> for Dataset {
    async fn load(path: &str) -> std::io::Result<Self> {
        let reader = csv::ReaderBuilder::new();

        let dataset: InMemDataset<Row> = InMemDataset::from_csv(path, &reader)?;

        Ok(Self { dataset })
    }
}

impl Dataset {
    /// All texts, in file order
    pub fn texts(&self) -> Vec<String> {
        use dataset::Dataset as _;

        self.dataset.iter().map(|row| row.text).collect()
    }

    /// Number of classes implied by the highest label present
    pub fn class_count(&self) -> Result<usize> {
        use dataset::Dataset as _;

        self.dataset
            .iter()
            .filter_map(|row| row.label)
            .max()
            .map(|highest| highest + 1)
            .ok_or_else(|| Error::EmptyInput("no labeled rows in the dataset".to_string()))
    }

    /// Split into texts and a one-hot label matrix with `class_num` columns
    pub fn into_training_data(self, class_num: usize) -> Result<(Vec<String>, Vec<Vec<f32>>)> {
        use dataset::Dataset as _;

        let mut texts = Vec::with_capacity(self.dataset.len());
        let mut labels = Vec::with_capacity(self.dataset.len());

        for (index, row) in self.dataset.iter().enumerate() {
            let label = row.label.ok_or_else(|| {
                Error::EmptyInput(format!("row {index} has no label; training requires one"))
            })?;

            if label >= class_num {
                return Err(Error::ShapeMismatch(format!(
                    "row {index} has label {label}, outside {class_num} classes"
                )));
            }

            texts.push(row.text);
            labels.push(label);
        }

        let matrix = classes::one_hot(&labels, class_num);

        Ok((texts, matrix))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;

    use super::*;

    async fn dataset_from(content: &str, name: &str) -> Dataset {
        let path = std::env::temp_dir().join(format!("autodl-text-{name}-{}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();

        Dataset::load(path.to_str().unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn loads_rows_and_infers_class_count() {
        let dataset = dataset_from("text,label\ngood game,1\nbad game,0\nfine,2\n", "load").await;

        assert_eq!(dataset.texts().len(), 3);
        assert_eq!(dataset.class_count().unwrap(), 3);
    }

    #[tokio::test]
    async fn produces_one_hot_training_data() {
        let dataset = dataset_from("text,label\ngood game,1\nbad game,0\n", "one-hot").await;

        let (texts, labels) = dataset.into_training_data(2).unwrap();

        assert_eq!(texts, vec!["good game".to_string(), "bad game".to_string()]);
        assert_eq!(labels, vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
    }

    #[tokio::test]
    async fn rejects_labels_outside_the_class_range() {
        let dataset = dataset_from("text,label\ngood game,4\n", "range").await;

        let err = dataset.into_training_data(2).unwrap_err();

        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[tokio::test]
    async fn rejects_unlabeled_rows_for_training() {
        let dataset = dataset_from("text,label\ngood game,\n", "unlabeled").await;

        let err = dataset.into_training_data(2).unwrap_err();

        assert!(matches!(err, Error::EmptyInput(_)));
    }
}
