use burn::{
    data::dataloader::batcher::Batcher as BatcherTrait,
    tensor::{backend::Backend, Tensor},
};

use crate::models::sep_cnn::SepCnn;

use super::Batcher;

/// Predict one class index per sample
pub fn predict_classes<B: Backend>(
    model: &SepCnn<B>,
    batcher: &Batcher<B>,
    samples: Vec<String>,
) -> Vec<usize> {
    let batch = batcher.batch(samples);

    classes_from_probabilities(model.infer(batch))
}

/// Reduce per-class probabilities to class indices
///
/// A single-column matrix is a binary sigmoid head: 0.5 and above means
/// class 1. Wider matrices reduce by row-wise argmax.
pub fn classes_from_probabilities<B: Backend>(probabilities: Tensor<B, 2>) -> Vec<usize> {
    let [batch_size, units] = probabilities.dims();

    if units == 1 {
        probabilities
            .into_data()
            .convert::<f32>()
            .value
            .into_iter()
            .map(|p| usize::from(p >= 0.5))
            .collect()
    } else {
        probabilities
            .argmax(1)
            .reshape([batch_size])
            .into_data()
            .convert::<i64>()
            .value
            .into_iter()
            .map(|index| index as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    #[test]
    fn thresholds_the_binary_column_at_one_half() {
        let device = Default::default();
        let probs = Tensor::<TestBackend, 2>::from_floats([[0.2], [0.5], [0.9]], &device);

        assert_eq!(classes_from_probabilities(probs), vec![0, 1, 1]);
    }

    #[test]
    fn takes_the_argmax_of_multi_class_rows() {
        let device = Default::default();
        let probs = Tensor::<TestBackend, 2>::from_floats(
            [[0.1, 0.8, 0.1], [0.7, 0.2, 0.1], [0.2, 0.3, 0.5]],
            &device,
        );

        assert_eq!(classes_from_probabilities(probs), vec![1, 0, 2]);
    }
}
