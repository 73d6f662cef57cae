use burn::{
    module::Module,
    nn::{
        loss::{BinaryCrossEntropyLossConfig, CrossEntropyLossConfig},
        pool::{AdaptiveAvgPool1d, AdaptiveAvgPool1dConfig, MaxPool1d, MaxPool1dConfig},
        Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig,
    },
    tensor::{
        activation::{relu, sigmoid, softmax},
        backend::{AutodiffBackend, Backend},
        Int, Tensor,
    },
    train::{ClassificationOutput, TrainOutput, TrainStep, ValidStep},
};

use crate::pipelines::text_classification::batcher::{Infer, Train};

use super::conv::{SeparableConv1d, SeparableConv1dConfig};

/// Configuration for the separable-convolution classifier
#[derive(burn::config::Config, Debug)]
pub struct Config {
    /// Embedding input dimension, from the fitted vocabulary
    pub num_features: usize,

    /// Total number of classes
    pub num_classes: usize,

    /// Number of convolution blocks
    #[config(default = 2)]
    pub blocks: usize,

    /// Base filter count; the two widest layers use twice this
    #[config(default = 64)]
    pub filters: usize,

    /// Depthwise kernel size
    #[config(default = 4)]
    pub kernel_size: usize,

    /// Dropout rate, applied inside blocks and before the output layer
    #[config(default = 0.5)]
    pub dropout: f64,

    /// Token embedding width
    #[config(default = 200)]
    pub embedding_dim: usize,
}

impl Config {
    /// Width of the output layer: one sigmoid unit for binary, `num_classes` otherwise
    pub fn output_units(&self) -> usize {
        if self.num_classes == 2 {
            1
        } else {
            self.num_classes
        }
    }

    /// Sequence length left after the convolution and pooling stages
    ///
    /// `None` means the stages would consume the whole sequence. Same
    /// padding keeps odd kernels length-preserving; even kernels lose one
    /// step per depthwise pass, and each block's max-pool divides by three.
    pub fn feature_length(&self, input_len: usize) -> Option<usize> {
        let conv_shrink = if self.kernel_size % 2 == 0 { 1 } else { 0 };

        let mut len = input_len;
        for _ in 0..self.blocks.saturating_sub(1) {
            len = len.checked_sub(2 * conv_shrink)?;
            len = len.checked_sub(3)? / 3 + 1;
        }
        len = len.checked_sub(2 * conv_shrink)?;

        if len == 0 {
            None
        } else {
            Some(len)
        }
    }

    /// Initialize the network with fresh weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> SepCnn<B> {
        let embedding = EmbeddingConfig::new(self.num_features, self.embedding_dim).init(device);

        let mut blocks = Vec::with_capacity(self.blocks.saturating_sub(1));
        let mut channels = self.embedding_dim;
        for _ in 0..self.blocks.saturating_sub(1) {
            blocks.push(ConvBlock {
                dropout: DropoutConfig::new(self.dropout).init(),
                conv1: SeparableConv1dConfig::new(channels, self.filters, self.kernel_size)
                    .init(device),
                conv2: SeparableConv1dConfig::new(self.filters, self.filters, self.kernel_size)
                    .init(device),
                pool: MaxPool1dConfig::new(3).with_stride(3).init(),
            });
            channels = self.filters;
        }

        let wide = self.filters * 2;

        SepCnn {
            embedding,
            blocks,
            conv_wide_1: SeparableConv1dConfig::new(channels, wide, self.kernel_size).init(device),
            conv_wide_2: SeparableConv1dConfig::new(wide, wide, self.kernel_size).init(device),
            pool: AdaptiveAvgPool1dConfig::new(1).init(),
            dropout: DropoutConfig::new(self.dropout).init(),
            output: LinearConfig::new(wide, self.output_units()).init(device),
            num_classes: self.num_classes,
        }
    }
}

/// One feature-extraction stage: dropout, two separable convolutions, max-pool
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    dropout: Dropout,
    conv1: SeparableConv1d<B>,
    conv2: SeparableConv1d<B>,
    pool: MaxPool1d,
}

impl<B: Backend> ConvBlock<B> {
    fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = self.dropout.forward(input);
        let x = relu(self.conv1.forward(x));
        let x = relu(self.conv2.forward(x));

        self.pool.forward(x)
    }
}

/// The separable-convolution text classifier
#[derive(Module, Debug)]
pub struct SepCnn<B: Backend> {
    embedding: Embedding<B>,
    blocks: Vec<ConvBlock<B>>,
    conv_wide_1: SeparableConv1d<B>,
    conv_wide_2: SeparableConv1d<B>,
    pool: AdaptiveAvgPool1d,
    dropout: Dropout,
    pub(crate) output: Linear<B>,
    num_classes: usize,
}

impl<B: Backend> SepCnn<B> {
    /// Raw classification logits for a batch of token ids
    pub fn forward_logits(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let embedded = self.embedding.forward(tokens);

        // Convolutions run over [batch, channels, length]
        let mut x = embedded.swap_dims(1, 2);
        for block in &self.blocks {
            x = block.forward(x);
        }
        let x = relu(self.conv_wide_1.forward(x));
        let x = relu(self.conv_wide_2.forward(x));

        let x = self.pool.forward(x).flatten::<2>(1, 2);
        let x = self.dropout.forward(x);

        self.output.forward(x)
    }

    /// Forward pass for training, with the loss matched to the output head
    pub fn forward(&self, item: Train<B>) -> ClassificationOutput<B> {
        let targets = item.targets;
        let logits = self.forward_logits(item.input.tokens);
        let device = logits.device();

        let loss = if self.num_classes == 2 {
            let scores: Tensor<B, 1> = logits.clone().squeeze(1);
            BinaryCrossEntropyLossConfig::new()
                .with_logits(true)
                .init(&device)
                .forward(scores, targets.clone())
        } else {
            CrossEntropyLossConfig::new()
                .init(&device)
                .forward(logits.clone(), targets.clone())
        };

        ClassificationOutput {
            loss,
            output: logits,
            targets,
        }
    }

    /// Forward pass for inference, returning per-class probabilities
    ///
    /// Binary models return a single sigmoid column; multi-class models a
    /// softmax row per example.
    pub fn infer(&self, input: Infer<B>) -> Tensor<B, 2> {
        let logits = self.forward_logits(input.tokens);

        if self.num_classes == 2 {
            sigmoid(logits)
        } else {
            softmax(logits, 1)
        }
    }
}

impl<B: AutodiffBackend> TrainStep<Train<B>, ClassificationOutput<B>> for SepCnn<B> {
    fn step(&self, item: Train<B>) -> TrainOutput<ClassificationOutput<B>> {
        let output = self.forward(item);
        let grads = output.loss.backward();

        TrainOutput::new(self, grads, output)
    }
}

impl<B: Backend> ValidStep<Train<B>, ClassificationOutput<B>> for SepCnn<B> {
    fn step(&self, item: Train<B>) -> ClassificationOutput<B> {
        self.forward(item)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    fn tokens(batch: usize, length: usize) -> Tensor<TestBackend, 2, Int> {
        Tensor::zeros([batch, length], &Default::default())
    }

    #[test]
    fn binary_head_has_one_unit() {
        let device = Default::default();
        let model = Config::new(100, 2).init::<TestBackend>(&device);

        assert_eq!(model.output.weight.val().dims(), [128, 1]);
        assert_eq!(model.forward_logits(tokens(2, 15)).dims(), [2, 1]);
    }

    #[test]
    fn multi_class_head_has_one_unit_per_class() {
        let device = Default::default();
        let model = Config::new(100, 5).init::<TestBackend>(&device);

        assert_eq!(model.output.weight.val().dims(), [128, 5]);
        assert_eq!(model.forward_logits(tokens(2, 15)).dims(), [2, 5]);
    }

    #[test]
    fn binary_probabilities_stay_in_the_unit_interval() {
        let device = Default::default();
        let model = Config::new(50, 2).init::<TestBackend>(&device);

        let probs = model.infer(Infer::new(tokens(3, 15)));

        assert_eq!(probs.dims(), [3, 1]);
        for p in probs.into_data().value {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn multi_class_probabilities_sum_to_one() {
        let device = Default::default();
        let model = Config::new(50, 3).init::<TestBackend>(&device);

        let probs = model.infer(Infer::new(tokens(2, 15)));

        let sums = probs.sum_dim(1).into_data().value;
        for sum in sums {
            assert!((sum - 1.0).abs() < 1e-5, "row sums to {sum}");
        }
    }

    #[test]
    fn losses_are_finite_for_both_heads() {
        let device = Default::default();

        for num_classes in [2, 4] {
            let model = Config::new(50, num_classes).init::<TestBackend>(&device);
            let batch = Train::new(
                Infer::new(tokens(2, 15)),
                Tensor::from_ints([0, 1], &device),
            );

            let output = model.forward(batch);
            let loss = output.loss.into_scalar();
            assert!(loss.is_finite(), "{num_classes} classes: loss {loss}");
        }
    }

    #[test]
    fn single_block_network_skips_pooling_stages() {
        let device = Default::default();
        let config = Config::new(40, 3).with_blocks(1);
        let model = config.init::<TestBackend>(&device);

        assert_eq!(config.feature_length(4), Some(2));
        assert_eq!(model.forward_logits(tokens(2, 4)).dims(), [2, 3]);
    }

    #[test]
    fn reports_sequences_the_stages_would_consume() {
        let config = Config::new(40, 3);

        // Two blocks: one pooled stage, then the two wider convolutions.
        assert_eq!(config.feature_length(15), Some(2));
        assert_eq!(config.feature_length(11), Some(1));
        assert_eq!(config.feature_length(10), None);

        // Odd kernels preserve length under same padding.
        let odd = Config::new(40, 3).with_kernel_size(3);
        assert_eq!(odd.feature_length(3), Some(1));
    }
}
