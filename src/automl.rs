use std::path::Path;

use burn::backend::{Autodiff, NdArray};

use crate::{
    errors::{Error, Result},
    metadata::Metadata,
    models::sep_cnn,
    pipelines::text_classification::{artifacts, predict_classes, training, Batcher, Item},
    text::{chinese, Vectorizer},
    utils::classes,
};

/// Backend used for training runs
pub type TrainBackend = Autodiff<NdArray>;

/// Backend used for inference
pub type InferBackend = NdArray;

/// A raw training dataset: texts plus a one-hot label matrix
pub type TrainDataset = (Vec<String>, Vec<Vec<f32>>);

/// The train/test lifecycle wrapper the challenge harness drives
///
/// Two states: untrained and done training. Training fits the vectorizer,
/// trains the network, and persists the artifact bundle; once done, further
/// `train` calls are no-ops. Testing reloads the bundle from the input
/// directory and turns predictions into a one-hot matrix.
pub struct Model {
    metadata: Metadata,
    train_output_dir: String,
    test_input_dir: String,
    training_config: training::Config,
    done_training: bool,
}

impl Model {
    /// Build an untrained wrapper over validated metadata
    pub fn new(metadata: Metadata, train_output_dir: &str, test_input_dir: &str) -> Self {
        Self {
            metadata,
            train_output_dir: train_output_dir.to_string(),
            test_input_dir: test_input_dir.to_string(),
            training_config: training::Config::new(),
            done_training: false,
        }
    }

    /// Override the training-loop configuration
    pub fn with_training_config(mut self, config: training::Config) -> Self {
        self.training_config = config;
        self
    }

    /// Whether the terminal training state has been reached
    pub fn done_training(&self) -> bool {
        self.done_training
    }

    /// Train the classifier and persist the artifact bundle
    ///
    /// The time budget is accepted for harness compatibility and logged,
    /// never enforced; the only stopping criteria are the epoch cap and
    /// early stopping.
    pub fn train(
        &mut self,
        train_dataset: TrainDataset,
        remaining_time_budget: Option<f64>,
    ) -> Result<()> {
        if self.done_training {
            log::info!("training already done, skipping");
            return Ok(());
        }

        if let Some(budget) = remaining_time_budget {
            log::info!("remaining time budget: {budget}s (not enforced)");
        }

        let (x_train, y_train) = train_dataset;
        self.check_training_shapes(&x_train, &y_train)?;

        let labels = classes::argmax_rows(&y_train);
        let texts = self.prepare_texts(x_train);

        let vectorizer = Vectorizer::fit(&texts)?;
        log::info!(
            "fitted vocabulary of {} tokens ({} features), sequence length {}",
            vectorizer.vocab_size(),
            vectorizer.num_features(),
            vectorizer.max_length(),
        );

        let model_config =
            sep_cnn::Config::new(vectorizer.num_features(), self.metadata.class_num());

        let items = texts
            .into_iter()
            .zip(labels)
            .map(|(text, label)| Item::new(text, label))
            .collect();

        let device = Default::default();
        let trained = training::train::<TrainBackend>(
            vec![device],
            items,
            vectorizer.clone(),
            model_config.clone(),
            self.training_config.clone(),
            &self.train_output_dir,
        )?;

        artifacts::save(
            Path::new(&self.train_output_dir),
            &model_config,
            &vectorizer,
            trained,
        )?;

        self.done_training = true;

        Ok(())
    }

    /// Predict a one-hot matrix for unseen text using the persisted bundle
    pub fn test(
        &self,
        x_test: &[String],
        remaining_time_budget: Option<f64>,
    ) -> Result<Vec<Vec<f32>>> {
        if let Some(budget) = remaining_time_budget {
            log::info!("remaining time budget: {budget}s (not enforced)");
        }

        if x_test.is_empty() {
            return Err(Error::EmptyInput("no test texts to predict".to_string()));
        }

        if x_test.len() != self.metadata.test_num() {
            return Err(Error::ShapeMismatch(format!(
                "{} test texts, but metadata declares {}",
                x_test.len(),
                self.metadata.test_num(),
            )));
        }

        let device = Default::default();
        let (bundle, model) =
            artifacts::load::<InferBackend>(Path::new(&self.test_input_dir), &device)?;

        let texts = self.prepare_texts(x_test.to_vec());

        let batcher = Batcher::<InferBackend>::new(bundle.vectorizer, device);
        let predicted = predict_classes(&model, &batcher, texts);

        Ok(classes::one_hot(&predicted, self.metadata.class_num()))
    }

    /// Segment texts when the dataset language calls for it
    fn prepare_texts(&self, texts: Vec<String>) -> Vec<String> {
        if self.metadata.is_chinese() {
            chinese::segment_all(&texts)
        } else {
            texts
        }
    }

    fn check_training_shapes(&self, x_train: &[String], y_train: &[Vec<f32>]) -> Result<()> {
        if x_train.is_empty() {
            return Err(Error::EmptyInput("no training texts".to_string()));
        }

        if x_train.len() != y_train.len() {
            return Err(Error::ShapeMismatch(format!(
                "{} training texts but {} label rows",
                x_train.len(),
                y_train.len(),
            )));
        }

        if x_train.len() != self.metadata.train_num() {
            return Err(Error::ShapeMismatch(format!(
                "{} training texts, but metadata declares {}",
                x_train.len(),
                self.metadata.train_num(),
            )));
        }

        if let Some(row) = y_train
            .iter()
            .find(|row| row.len() != self.metadata.class_num())
        {
            return Err(Error::ShapeMismatch(format!(
                "label row has {} columns, but metadata declares {} classes",
                row.len(),
                self.metadata.class_num(),
            )));
        }

        Ok(())
    }
}
