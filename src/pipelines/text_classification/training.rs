use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::InMemDataset},
    optim::AdamConfig,
    record::CompactRecorder,
    tensor::backend::AutodiffBackend,
    train::{
        metric::{
            store::{Aggregate, Direction, Split},
            AccuracyMetric, LossMetric,
        },
        LearnerBuilder, MetricEarlyStoppingStrategy, StoppingCondition,
    },
    LearningRate,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    errors::Error,
    models::sep_cnn,
    text::Vectorizer,
    utils::renderer,
};

use super::{Batcher, Item};

/// Training loop configuration
#[derive(burn::config::Config)]
pub struct Config {
    /// Batch size
    #[config(default = 32)]
    pub batch_size: usize,

    /// Upper bound on epochs; early stopping usually ends the run sooner
    #[config(default = 1000)]
    pub num_epochs: usize,

    /// Epochs without validation-loss improvement before stopping
    #[config(default = 10)]
    pub patience: usize,

    /// Adam learning rate
    #[config(default = 1e-3)]
    pub learning_rate: LearningRate,

    /// Fraction of training data held out for validation
    #[config(default = 0.2)]
    pub valid_split: f64,

    /// Seed for the validation split and batch shuffling
    #[config(default = 42)]
    pub seed: u64,
}

/// Train the classifier on pre-segmented items
///
/// Shuffles the items with the configured seed, holds out the validation
/// fraction, and drives Burn's learner with Adam, loss/accuracy metrics, and
/// early stopping on validation loss. Returns the trained network.
pub fn train<B: AutodiffBackend>(
    devices: Vec<B::Device>,
    mut items: Vec<Item>,
    vectorizer: Vectorizer,
    model_config: sep_cnn::Config,
    config: Config,
    artifact_dir: &str,
) -> crate::errors::Result<sep_cnn::SepCnn<B>> {
    let device = devices[0].clone();

    if model_config.feature_length(vectorizer.max_length()).is_none() {
        return Err(Error::Configuration(format!(
            "sequence length {} is too short for {} convolution blocks",
            vectorizer.max_length(),
            model_config.blocks,
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    items.shuffle(&mut rng);

    let num_valid = ((items.len() as f64) * config.valid_split).floor().max(1.0) as usize;
    if num_valid >= items.len() {
        return Err(Error::EmptyInput(format!(
            "{} examples are not enough to hold out a validation split",
            items.len()
        )));
    }
    let valid_items = items.split_off(items.len() - num_valid);

    log::info!(
        "training on {} examples, validating on {}",
        items.len(),
        valid_items.len()
    );

    let batcher_train = Batcher::<B>::new(vectorizer.clone(), device.clone());
    let batcher_valid = Batcher::<B::InnerBackend>::new(vectorizer, device.clone());

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    let dataloader_train = DataLoaderBuilder::new(batcher_train)
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .num_workers(workers)
        .build(InMemDataset::new(items));

    let dataloader_valid = DataLoaderBuilder::new(batcher_valid)
        .batch_size(config.batch_size)
        .num_workers(workers)
        .build(InMemDataset::new(valid_items));

    let optimizer = AdamConfig::new().init();

    let learner = LearnerBuilder::new(artifact_dir)
        .metric_train_numeric(AccuracyMetric::new())
        .metric_valid_numeric(AccuracyMetric::new())
        .metric_train_numeric(LossMetric::new())
        .metric_valid_numeric(LossMetric::new())
        .early_stopping(MetricEarlyStoppingStrategy::new::<LossMetric<B>>(
            Aggregate::Mean,
            Direction::Lowest,
            Split::Valid,
            StoppingCondition::NoImprovementSince {
                n_epochs: config.patience,
            },
        ))
        .with_file_checkpointer(CompactRecorder::new())
        .renderer(renderer::Quiet::new())
        .devices(devices)
        .num_epochs(config.num_epochs)
        .build(
            model_config.init(&device),
            optimizer,
            config.learning_rate,
        );

    Ok(learner.fit(dataloader_train, dataloader_valid))
}
