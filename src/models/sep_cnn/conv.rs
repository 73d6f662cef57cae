use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv1d, Conv1dConfig},
        Initializer, PaddingConfig1d,
    },
    tensor::{backend::Backend, Tensor},
};

/// Configuration for a separable 1D convolution
#[derive(Config)]
pub struct SeparableConv1dConfig {
    /// Input channel count
    pub channels_in: usize,

    /// Output channel count
    pub channels_out: usize,

    /// Depthwise kernel size
    pub kernel_size: usize,
}

impl SeparableConv1dConfig {
    /// Initialize the layer pair
    pub fn init<B: Backend>(&self, device: &B::Device) -> SeparableConv1d<B> {
        let depthwise = Conv1dConfig::new(self.channels_in, self.channels_in, self.kernel_size)
            .with_groups(self.channels_in)
            .with_padding(PaddingConfig1d::Same)
            .with_initializer(Initializer::Uniform {
                min: -0.05,
                max: 0.05,
            })
            .init(device);

        let pointwise = Conv1dConfig::new(self.channels_in, self.channels_out, 1).init(device);

        SeparableConv1d {
            depthwise,
            pointwise,
        }
    }
}

/// A separable 1D convolution
///
/// A depthwise convolution (one group per input channel) followed by a
/// pointwise 1x1 convolution, trading a full convolution's parameter count
/// for the same n-gram-style receptive field.
#[derive(Module, Debug)]
pub struct SeparableConv1d<B: Backend> {
    depthwise: Conv1d<B>,
    pointwise: Conv1d<B>,
}

impl<B: Backend> SeparableConv1d<B> {
    /// Apply both stages to a `[batch, channels, length]` tensor
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 3> {
        self.pointwise.forward(self.depthwise.forward(input))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    #[test]
    fn preserves_length_and_maps_channels_for_odd_kernels() {
        let device = Default::default();
        let conv = SeparableConv1dConfig::new(8, 16, 3).init::<TestBackend>(&device);

        let output = conv.forward(Tensor::zeros([2, 8, 10], &device));

        assert_eq!(output.dims(), [2, 16, 10]);
    }

    #[test]
    fn loses_one_step_per_even_kernel_pass() {
        let device = Default::default();
        let conv = SeparableConv1dConfig::new(8, 16, 4).init::<TestBackend>(&device);

        let output = conv.forward(Tensor::zeros([2, 8, 10], &device));

        assert_eq!(output.dims(), [2, 16, 9]);
    }
}
