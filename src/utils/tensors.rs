use burn::tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor};

/// Pack integer sequences into a padded 2D tensor of token ids
///
/// Shorter sequences are left-padded with 0; longer ones keep their trailing
/// `seq_length` tokens. Both sides are PRE, matching the length contract
/// recorded by the vectorizer at fit time.
pub fn pad_sequences<B: Backend>(
    sequences: Vec<Vec<usize>>,
    seq_length: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let batch_size = sequences.len();

    let mut tensor = Tensor::zeros([batch_size, seq_length], device);

    for (index, mut tokens) in sequences.into_iter().enumerate() {
        if tokens.len() > seq_length {
            tokens = tokens.split_off(tokens.len() - seq_length);
        }

        if tokens.is_empty() {
            continue;
        }

        let len = tokens.len();
        tensor = tensor.slice_assign(
            [index..index + 1, seq_length - len..seq_length],
            Tensor::from_data(
                Data::new(
                    tokens.into_iter().map(|e| (e as i64).elem()).collect(),
                    Shape::new([1, len]),
                ),
                device,
            ),
        );
    }

    tensor
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    fn values(tensor: Tensor<TestBackend, 2, Int>) -> Vec<i64> {
        tensor.into_data().convert::<i64>().value
    }

    #[test]
    fn left_pads_short_sequences_with_zero() {
        let device = Default::default();

        let tensor = pad_sequences::<TestBackend>(vec![vec![5, 6], vec![7]], 3, &device);

        assert_eq!(tensor.dims(), [2, 3]);
        assert_eq!(values(tensor), vec![0, 5, 6, 0, 0, 7]);
    }

    #[test]
    fn truncates_long_sequences_from_the_front() {
        let device = Default::default();

        let tensor = pad_sequences::<TestBackend>(vec![vec![1, 2, 3, 4]], 3, &device);

        assert_eq!(values(tensor), vec![2, 3, 4]);
    }

    #[test]
    fn keeps_empty_sequences_all_padding() {
        let device = Default::default();

        let tensor = pad_sequences::<TestBackend>(vec![vec![], vec![9]], 2, &device);

        assert_eq!(values(tensor), vec![0, 0, 0, 9]);
    }
}
